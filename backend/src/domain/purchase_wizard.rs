//! # Carnet Purchase Wizard
//!
//! Five-step state machine driving a carnet purchase:
//!
//! ```text
//! City -> Hospital -> CarnetType -> Review -> Payment -> (completed)
//! ```
//!
//! Forward moves happen only by making the selection a step asks for.
//! Backward moves may target any earlier step and clear everything captured
//! at the steps after it. Each field belongs to the step that captures it:
//!
//! | Field               | Captured at  |
//! |---------------------|--------------|
//! | city                | City         |
//! | hospital            | Hospital     |
//! | carnet type         | CarnetType   |
//! | save default city   | Review       |
//! | payment method      | Payment      |
//!
//! A hospital can only be chosen from the hospitals of the selected city.
//! Every run carries an idempotency key so that completing the same run twice
//! can be detected by the carnet service.

use thiserror::Error;
use uuid::Uuid;

use super::catalog::CatalogProvider;
use super::models::catalog::{CarnetType, Hospital, PaymentMethod};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WizardStep {
    City,
    Hospital,
    CarnetType,
    Review,
    Payment,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum WizardError {
    #[error("Ville inconnue : {0}")]
    UnknownCity(String),
    #[error("Hôpital introuvable : {0}")]
    UnknownHospital(String),
    #[error("L'hôpital {hospital} ne se trouve pas à {city}")]
    HospitalOutsideCity { hospital: String, city: String },
    #[error("Type de carnet introuvable : {0}")]
    UnknownCarnetType(String),
    #[error("Moyen de paiement introuvable : {0}")]
    UnknownPaymentMethod(String),
    #[error("Veuillez d'abord choisir une ville")]
    CityRequired,
    #[error("Veuillez d'abord choisir un hôpital")]
    HospitalRequired,
    #[error("Veuillez d'abord choisir un type de carnet")]
    CarnetTypeRequired,
    #[error("Cette action n'est pas disponible à l'étape actuelle")]
    StepUnavailable { required: WizardStep, current: WizardStep },
    #[error("Impossible d'avancer à une étape non atteinte")]
    CannotSkipAhead { target: WizardStep, current: WizardStep },
    #[error("L'achat n'est pas prêt à être finalisé")]
    NotReady,
    #[error("Cette demande d'achat n'est plus valide")]
    StaleRequest,
}

/// Everything needed to issue a carnet once the wizard reached payment
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseOrder {
    pub city: String,
    pub hospital: Hospital,
    pub carnet_type: CarnetType,
    pub payment_method: PaymentMethod,
    pub save_default_city: bool,
    pub idempotency_key: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseWizard {
    step: WizardStep,
    city: Option<String>,
    hospital_id: Option<String>,
    carnet_type_id: Option<String>,
    payment_method_id: Option<String>,
    save_default_city: bool,
    idempotency_key: String,
}

impl Default for PurchaseWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl PurchaseWizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::City,
            city: None,
            hospital_id: None,
            carnet_type_id: None,
            payment_method_id: None,
            save_default_city: false,
            idempotency_key: Uuid::new_v4().to_string(),
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    pub fn hospital_id(&self) -> Option<&str> {
        self.hospital_id.as_deref()
    }

    pub fn carnet_type_id(&self) -> Option<&str> {
        self.carnet_type_id.as_deref()
    }

    pub fn payment_method_id(&self) -> Option<&str> {
        self.payment_method_id.as_deref()
    }

    pub fn save_default_city(&self) -> bool {
        self.save_default_city
    }

    pub fn idempotency_key(&self) -> &str {
        &self.idempotency_key
    }

    /// Choose the city. Allowed from any step; drops every later selection.
    pub fn select_city(&mut self, catalog: &dyn CatalogProvider, city: &str) -> Result<(), WizardError> {
        if !catalog.has_city(city) {
            return Err(WizardError::UnknownCity(city.to_string()));
        }

        self.clear_after(WizardStep::City);
        self.city = Some(city.to_string());
        self.step = WizardStep::Hospital;
        Ok(())
    }

    /// Choose a hospital of the selected city.
    pub fn select_hospital(
        &mut self,
        catalog: &dyn CatalogProvider,
        hospital_id: &str,
    ) -> Result<(), WizardError> {
        let city = self.city.clone().ok_or(WizardError::CityRequired)?;
        let hospital = catalog
            .find_hospital(hospital_id)
            .ok_or_else(|| WizardError::UnknownHospital(hospital_id.to_string()))?;
        if hospital.city != city {
            return Err(WizardError::HospitalOutsideCity {
                hospital: hospital.name,
                city,
            });
        }

        self.clear_after(WizardStep::Hospital);
        self.hospital_id = Some(hospital.id);
        self.step = WizardStep::CarnetType;
        Ok(())
    }

    /// Choose the carnet type; moves to the review step.
    pub fn select_carnet_type(
        &mut self,
        catalog: &dyn CatalogProvider,
        carnet_type_id: &str,
    ) -> Result<(), WizardError> {
        self.require_hospital()?;
        let carnet_type = catalog
            .find_carnet_type(carnet_type_id)
            .ok_or_else(|| WizardError::UnknownCarnetType(carnet_type_id.to_string()))?;

        self.clear_after(WizardStep::CarnetType);
        self.carnet_type_id = Some(carnet_type.id);
        self.step = WizardStep::Review;
        Ok(())
    }

    /// Opt in or out of remembering the city; available from review onwards.
    pub fn set_save_default_city(&mut self, save: bool) -> Result<(), WizardError> {
        self.require_step_at_least(WizardStep::Review)?;
        self.save_default_city = save;
        Ok(())
    }

    /// Leave the review step for payment.
    pub fn proceed_to_payment(&mut self) -> Result<(), WizardError> {
        self.require_carnet_type()?;
        self.require_step_at_least(WizardStep::Review)?;
        self.step = WizardStep::Payment;
        Ok(())
    }

    pub fn select_payment_method(
        &mut self,
        catalog: &dyn CatalogProvider,
        payment_method_id: &str,
    ) -> Result<(), WizardError> {
        self.require_step_at_least(WizardStep::Payment)?;
        let method = catalog
            .find_payment_method(payment_method_id)
            .ok_or_else(|| WizardError::UnknownPaymentMethod(payment_method_id.to_string()))?;
        self.payment_method_id = Some(method.id);
        Ok(())
    }

    /// Return to `target`, clearing what later steps captured.
    pub fn go_back(&mut self, target: WizardStep) -> Result<(), WizardError> {
        if target > self.step {
            return Err(WizardError::CannotSkipAhead {
                target,
                current: self.step,
            });
        }

        self.clear_after(target);
        self.step = target;
        Ok(())
    }

    /// Start over with a fresh idempotency key.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Resolve the selections into an order. Requires the payment step with a method chosen.
    pub fn order(&self, catalog: &dyn CatalogProvider) -> Result<PurchaseOrder, WizardError> {
        if self.step != WizardStep::Payment {
            return Err(WizardError::NotReady);
        }
        let (Some(city), Some(hospital_id), Some(carnet_type_id), Some(payment_method_id)) = (
            self.city.as_deref(),
            self.hospital_id.as_deref(),
            self.carnet_type_id.as_deref(),
            self.payment_method_id.as_deref(),
        ) else {
            return Err(WizardError::NotReady);
        };

        Ok(PurchaseOrder {
            city: city.to_string(),
            hospital: catalog
                .find_hospital(hospital_id)
                .ok_or_else(|| WizardError::UnknownHospital(hospital_id.to_string()))?,
            carnet_type: catalog
                .find_carnet_type(carnet_type_id)
                .ok_or_else(|| WizardError::UnknownCarnetType(carnet_type_id.to_string()))?,
            payment_method: catalog
                .find_payment_method(payment_method_id)
                .ok_or_else(|| WizardError::UnknownPaymentMethod(payment_method_id.to_string()))?,
            save_default_city: self.save_default_city,
            idempotency_key: self.idempotency_key.clone(),
        })
    }

    fn clear_after(&mut self, step: WizardStep) {
        if step < WizardStep::City {
            self.city = None;
        }
        if step < WizardStep::Hospital {
            self.hospital_id = None;
        }
        if step < WizardStep::CarnetType {
            self.carnet_type_id = None;
        }
        if step < WizardStep::Review {
            self.save_default_city = false;
        }
        if step < WizardStep::Payment {
            self.payment_method_id = None;
        }
    }

    fn require_hospital(&self) -> Result<(), WizardError> {
        if self.city.is_none() {
            return Err(WizardError::CityRequired);
        }
        if self.hospital_id.is_none() {
            return Err(WizardError::HospitalRequired);
        }
        Ok(())
    }

    fn require_carnet_type(&self) -> Result<(), WizardError> {
        self.require_hospital()?;
        if self.carnet_type_id.is_none() {
            return Err(WizardError::CarnetTypeRequired);
        }
        Ok(())
    }

    fn require_step_at_least(&self, required: WizardStep) -> Result<(), WizardError> {
        if self.step < required {
            return Err(WizardError::StepUnavailable {
                required,
                current: self.step,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::StaticCatalog;

    fn at_payment(catalog: &StaticCatalog) -> PurchaseWizard {
        let mut wizard = PurchaseWizard::new();
        wizard.select_city(catalog, "Dakar").unwrap();
        wizard.select_hospital(catalog, "1").unwrap();
        wizard.select_carnet_type(catalog, "consultation").unwrap();
        wizard.proceed_to_payment().unwrap();
        wizard
    }

    #[test]
    fn test_happy_path_builds_order() {
        let catalog = StaticCatalog::new();
        let mut wizard = PurchaseWizard::new();
        assert_eq!(wizard.step(), WizardStep::City);

        wizard.select_city(&catalog, "Dakar").unwrap();
        assert_eq!(wizard.step(), WizardStep::Hospital);
        wizard.select_hospital(&catalog, "2").unwrap();
        assert_eq!(wizard.step(), WizardStep::CarnetType);
        wizard.select_carnet_type(&catalog, "specialiste").unwrap();
        assert_eq!(wizard.step(), WizardStep::Review);
        wizard.set_save_default_city(true).unwrap();
        wizard.proceed_to_payment().unwrap();
        assert_eq!(wizard.step(), WizardStep::Payment);
        wizard.select_payment_method(&catalog, "wave").unwrap();

        let order = wizard.order(&catalog).unwrap();
        assert_eq!(order.city, "Dakar");
        assert_eq!(order.hospital.name, "Hôpital Principal de Dakar");
        assert_eq!(order.carnet_type.price, 10000);
        assert_eq!(order.payment_method.name, "Wave");
        assert!(order.save_default_city);
        assert_eq!(order.idempotency_key, wizard.idempotency_key());
    }

    #[test]
    fn test_changing_city_clears_hospital() {
        let catalog = StaticCatalog::new();
        let mut wizard = PurchaseWizard::new();
        wizard.select_city(&catalog, "Dakar").unwrap();
        wizard.select_hospital(&catalog, "1").unwrap();

        wizard.select_city(&catalog, "Thiès").unwrap();
        assert_eq!(wizard.city(), Some("Thiès"));
        assert_eq!(wizard.hospital_id(), None);
        assert_eq!(wizard.step(), WizardStep::Hospital);
    }

    #[test]
    fn test_hospital_must_belong_to_city() {
        let catalog = StaticCatalog::new();
        let mut wizard = PurchaseWizard::new();
        assert_eq!(
            wizard.select_hospital(&catalog, "1"),
            Err(WizardError::CityRequired)
        );

        wizard.select_city(&catalog, "Thiès").unwrap();
        assert!(matches!(
            wizard.select_hospital(&catalog, "1"),
            Err(WizardError::HospitalOutsideCity { .. })
        ));
        assert_eq!(
            wizard.select_hospital(&catalog, "99"),
            Err(WizardError::UnknownHospital("99".to_string()))
        );
        wizard.select_hospital(&catalog, "4").unwrap();
    }

    #[test]
    fn test_unknown_city_is_rejected() {
        let catalog = StaticCatalog::new();
        let mut wizard = PurchaseWizard::new();
        assert_eq!(
            wizard.select_city(&catalog, "Paris"),
            Err(WizardError::UnknownCity("Paris".to_string()))
        );
        assert_eq!(wizard.step(), WizardStep::City);
    }

    #[test]
    fn test_steps_cannot_be_skipped() {
        let catalog = StaticCatalog::new();
        let mut wizard = PurchaseWizard::new();
        assert_eq!(
            wizard.select_carnet_type(&catalog, "consultation"),
            Err(WizardError::CityRequired)
        );
        assert_eq!(wizard.proceed_to_payment(), Err(WizardError::CityRequired));
        assert!(matches!(
            wizard.set_save_default_city(true),
            Err(WizardError::StepUnavailable { .. })
        ));

        wizard.select_city(&catalog, "Dakar").unwrap();
        assert_eq!(
            wizard.select_carnet_type(&catalog, "consultation"),
            Err(WizardError::HospitalRequired)
        );
        wizard.select_hospital(&catalog, "1").unwrap();
        assert_eq!(wizard.proceed_to_payment(), Err(WizardError::CarnetTypeRequired));
        assert!(matches!(
            wizard.select_payment_method(&catalog, "wave"),
            Err(WizardError::StepUnavailable { .. })
        ));
        assert!(matches!(
            wizard.go_back(WizardStep::Payment),
            Err(WizardError::CannotSkipAhead { .. })
        ));
    }

    #[test]
    fn test_going_back_to_hospital_clears_later_selections() {
        let catalog = StaticCatalog::new();
        let mut wizard = at_payment(&catalog);
        wizard.set_save_default_city(true).unwrap();
        wizard.select_payment_method(&catalog, "orange").unwrap();

        wizard.go_back(WizardStep::Hospital).unwrap();
        assert_eq!(wizard.step(), WizardStep::Hospital);
        assert_eq!(wizard.city(), Some("Dakar"));
        assert_eq!(wizard.hospital_id(), Some("1"));
        assert_eq!(wizard.carnet_type_id(), None);
        assert_eq!(wizard.payment_method_id(), None);
        assert!(!wizard.save_default_city());
    }

    #[test]
    fn test_going_back_to_review_keeps_carnet_type() {
        let catalog = StaticCatalog::new();
        let mut wizard = at_payment(&catalog);
        wizard.select_payment_method(&catalog, "carte").unwrap();

        wizard.go_back(WizardStep::Review).unwrap();
        assert_eq!(wizard.carnet_type_id(), Some("consultation"));
        assert_eq!(wizard.payment_method_id(), None);
        assert_eq!(wizard.order(&catalog), Err(WizardError::NotReady));
    }

    #[test]
    fn test_order_requires_payment_method() {
        let catalog = StaticCatalog::new();
        let mut wizard = at_payment(&catalog);
        assert_eq!(wizard.order(&catalog), Err(WizardError::NotReady));
        assert_eq!(
            wizard.select_payment_method(&catalog, "bitcoin"),
            Err(WizardError::UnknownPaymentMethod("bitcoin".to_string()))
        );
        wizard.select_payment_method(&catalog, "virement").unwrap();
        assert!(wizard.order(&catalog).is_ok());
    }

    #[test]
    fn test_reset_issues_new_key() {
        let catalog = StaticCatalog::new();
        let mut wizard = at_payment(&catalog);
        let key = wizard.idempotency_key().to_string();

        wizard.reset();
        assert_eq!(wizard.step(), WizardStep::City);
        assert_eq!(wizard.city(), None);
        assert_ne!(wizard.idempotency_key(), key);
    }
}
