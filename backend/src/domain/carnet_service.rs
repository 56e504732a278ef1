//! Carnet service domain logic.
//!
//! Holds the patient's carnets and the session purchase wizard, and issues a
//! new carnet when a wizard run is completed.
//!
//! ## Business Rules
//!
//! - New carnets are prepended and start `active`
//! - Expiry is the purchase date plus the carnet type's validity in months
//! - Completing resets the wizard, so a repeated completion without new
//!   selections is rejected
//! - A completion carrying an already fulfilled idempotency key returns the
//!   carnet created the first time instead of issuing another
//! - The chosen city is remembered only when the patient opted in

use chrono::{Datelike, Local, NaiveDate};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use super::carnet_document;
use super::catalog::CatalogProvider;
use super::commands::carnet::{
    CarnetDocument, CarnetListQuery, CompletePurchaseCommand, CompletePurchaseResult, WizardState,
};
use super::date_format::{add_months, format_numeric_date, parse_iso_date};
use super::lock_state;
use super::models::carnet::{Carnet, CarnetStatus, PatientSnapshot};
use super::models::user::{User, DEFAULT_DATE_OF_BIRTH};
use super::purchase_wizard::{PurchaseOrder, PurchaseWizard, WizardError, WizardStep};
use crate::storage::{PreferenceStorage, DEFAULT_CITY_KEY};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CarnetError {
    #[error("Carnet introuvable : {0}")]
    NotFound(String),
    #[error(transparent)]
    Wizard(#[from] WizardError),
}

struct CarnetBook {
    carnets: Vec<Carnet>,
    wizard: PurchaseWizard,
    /// Idempotency key -> id of the carnet it produced
    fulfilled: HashMap<String, String>,
}

/// Service for carnets and their purchase
#[derive(Clone)]
pub struct CarnetService {
    catalog: Arc<dyn CatalogProvider>,
    storage: Arc<dyn PreferenceStorage>,
    book: Arc<Mutex<CarnetBook>>,
}

impl CarnetService {
    pub fn new(catalog: Arc<dyn CatalogProvider>, storage: Arc<dyn PreferenceStorage>) -> Self {
        Self::with_carnets(catalog, storage, seed_carnets())
    }

    pub fn with_carnets(
        catalog: Arc<dyn CatalogProvider>,
        storage: Arc<dyn PreferenceStorage>,
        carnets: Vec<Carnet>,
    ) -> Self {
        Self {
            catalog,
            storage,
            book: Arc::new(Mutex::new(CarnetBook {
                carnets,
                wizard: PurchaseWizard::new(),
                fulfilled: HashMap::new(),
            })),
        }
    }

    pub fn list(&self, query: &CarnetListQuery) -> Vec<Carnet> {
        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        lock_state(&self.book)
            .carnets
            .iter()
            .filter(|c| search.map_or(true, |term| c.matches_search(term)))
            .filter(|c| query.status.map_or(true, |status| c.status == status))
            .cloned()
            .collect()
    }

    pub fn get(&self, carnet_id: &str) -> Result<Carnet, CarnetError> {
        lock_state(&self.book)
            .carnets
            .iter()
            .find(|c| c.id == carnet_id)
            .cloned()
            .ok_or_else(|| CarnetError::NotFound(carnet_id.to_string()))
    }

    pub fn document(&self, carnet_id: &str) -> Result<CarnetDocument, CarnetError> {
        let carnet = self.get(carnet_id)?;
        Ok(CarnetDocument {
            file_name: carnet_document::file_name(&carnet),
            content: carnet_document::render(&carnet),
        })
    }

    /// City remembered from an earlier purchase
    pub fn default_city(&self) -> Option<String> {
        match self.storage.get(DEFAULT_CITY_KEY) {
            Ok(city) => city.filter(|c| !c.trim().is_empty()),
            Err(e) => {
                warn!("Failed to read default city: {}", e);
                None
            }
        }
    }

    pub fn wizard(&self) -> WizardState {
        let wizard = lock_state(&self.book).wizard.clone();
        self.describe(wizard)
    }

    pub fn select_city(&self, city: &str) -> Result<WizardState, CarnetError> {
        self.update_wizard("select city", |wizard, catalog| wizard.select_city(catalog, city))
    }

    pub fn select_hospital(&self, hospital_id: &str) -> Result<WizardState, CarnetError> {
        self.update_wizard("select hospital", |wizard, catalog| {
            wizard.select_hospital(catalog, hospital_id)
        })
    }

    pub fn select_carnet_type(&self, carnet_type_id: &str) -> Result<WizardState, CarnetError> {
        self.update_wizard("select carnet type", |wizard, catalog| {
            wizard.select_carnet_type(catalog, carnet_type_id)
        })
    }

    pub fn proceed_to_payment(&self) -> Result<WizardState, CarnetError> {
        self.update_wizard("proceed to payment", |wizard, _| wizard.proceed_to_payment())
    }

    pub fn select_payment_method(&self, payment_method_id: &str) -> Result<WizardState, CarnetError> {
        self.update_wizard("select payment method", |wizard, catalog| {
            wizard.select_payment_method(catalog, payment_method_id)
        })
    }

    pub fn set_save_default_city(&self, save: bool) -> Result<WizardState, CarnetError> {
        self.update_wizard("save default city", |wizard, _| wizard.set_save_default_city(save))
    }

    pub fn go_back(&self, target: WizardStep) -> Result<WizardState, CarnetError> {
        self.update_wizard("go back", |wizard, _| wizard.go_back(target))
    }

    pub fn reset_wizard(&self) -> WizardState {
        let wizard = {
            let mut book = lock_state(&self.book);
            book.wizard.reset();
            book.wizard.clone()
        };
        info!("Purchase wizard reset");
        self.describe(wizard)
    }

    /// Issue the carnet of the current wizard run
    pub fn complete(&self, command: CompletePurchaseCommand) -> Result<CompletePurchaseResult, CarnetError> {
        self.complete_on(command, Local::now().date_naive())
    }

    pub fn complete_on(
        &self,
        command: CompletePurchaseCommand,
        today: NaiveDate,
    ) -> Result<CompletePurchaseResult, CarnetError> {
        let mut guard = lock_state(&self.book);
        let book = &mut *guard;

        if let Some(key) = command.idempotency_key.as_deref() {
            let earlier = book
                .fulfilled
                .get(key)
                .and_then(|carnet_id| book.carnets.iter().find(|c| &c.id == carnet_id));
            if let Some(carnet) = earlier {
                info!("Purchase {} already fulfilled as {}", key, carnet.id);
                return Ok(CompletePurchaseResult {
                    carnet: carnet.clone(),
                    success_message: "Ce paiement a déjà été confirmé.".to_string(),
                    duplicate: true,
                });
            }
            if key != book.wizard.idempotency_key() {
                warn!("Rejecting purchase with stale key {}", key);
                return Err(WizardError::StaleRequest.into());
            }
        }

        let order = book.wizard.order(self.catalog.as_ref())?;
        let carnet = issue_carnet(&order, &command.patient, book.carnets.len() + 1, today);
        book.carnets.insert(0, carnet.clone());
        book.fulfilled.insert(order.idempotency_key.clone(), carnet.id.clone());
        book.wizard.reset();
        drop(guard);

        info!(
            "Issued carnet {} ({}) at {} via {}",
            carnet.id, carnet.type_name, carnet.hospital, order.payment_method.name
        );

        if order.save_default_city {
            if let Err(e) = self.storage.set(DEFAULT_CITY_KEY, &order.city) {
                warn!("Failed to remember default city {}: {}", order.city, e);
            }
        }

        Ok(CompletePurchaseResult {
            carnet,
            success_message: "Paiement confirmé ! Votre carnet a été ajouté à votre compte."
                .to_string(),
            duplicate: false,
        })
    }

    fn update_wizard<F>(&self, action: &str, apply: F) -> Result<WizardState, CarnetError>
    where
        F: FnOnce(&mut PurchaseWizard, &dyn CatalogProvider) -> Result<(), WizardError>,
    {
        let wizard = {
            let mut book = lock_state(&self.book);
            if let Err(e) = apply(&mut book.wizard, self.catalog.as_ref()) {
                warn!("Wizard {} rejected: {}", action, e);
                return Err(e.into());
            }
            book.wizard.clone()
        };

        info!("Wizard {} -> {:?}", action, wizard.step());
        Ok(self.describe(wizard))
    }

    fn describe(&self, wizard: PurchaseWizard) -> WizardState {
        let catalog = self.catalog.as_ref();
        WizardState {
            hospital: wizard.hospital_id().and_then(|id| catalog.find_hospital(id)),
            carnet_type: wizard.carnet_type_id().and_then(|id| catalog.find_carnet_type(id)),
            payment_method: wizard
                .payment_method_id()
                .and_then(|id| catalog.find_payment_method(id)),
            available_hospitals: wizard
                .city()
                .map(|city| catalog.hospitals_in_city(city))
                .unwrap_or_default(),
            default_city: self.default_city(),
            wizard,
        }
    }
}

/// Freeze the patient's identity as printed on a carnet
pub fn patient_snapshot(user: &User) -> PatientSnapshot {
    let mut names = user.name.split_whitespace();
    let first_name = names.next().unwrap_or_default().to_string();
    let last_name = names.collect::<Vec<_>>().join(" ").to_uppercase();

    let birth_date = user
        .date_of_birth
        .as_deref()
        .and_then(parse_iso_date)
        .or_else(|| parse_iso_date(DEFAULT_DATE_OF_BIRTH));

    let card_number = match birth_date {
        Some(date) => format!("SN-{}-{:0>3}", date.format("%y-%m-%d"), user.id),
        None => format!("SN-{}", user.id),
    };

    PatientSnapshot {
        last_name,
        first_name,
        date_of_birth: birth_date.map(format_numeric_date).unwrap_or_default(),
        card_number,
    }
}

fn issue_carnet(order: &PurchaseOrder, patient: &User, sequence: usize, today: NaiveDate) -> Carnet {
    let year = today.year();
    let suffix: String = Uuid::new_v4()
        .simple()
        .to_string()
        .to_uppercase()
        .chars()
        .take(6)
        .collect();

    Carnet {
        id: format!("SN-{}-{:03}", year, sequence),
        type_name: order.carnet_type.name.clone(),
        purchase_date: today,
        expiry_date: add_months(today, order.carnet_type.validity_months),
        price: order.carnet_type.price,
        hospital: order.hospital.name.clone(),
        city: order.city.clone(),
        serial_number: format!("SN-CARN-{}-{:03}-{}", year, sequence, suffix),
        qr_code: format!("qr-code-{}", sequence),
        status: CarnetStatus::Active,
        patient: patient_snapshot(patient),
    }
}

fn seed_carnets() -> Vec<Carnet> {
    let patient = PatientSnapshot {
        last_name: "DUPONT".to_string(),
        first_name: "Jean".to_string(),
        date_of_birth: "15/03/1985".to_string(),
        card_number: "SN-85-03-15-001".to_string(),
    };

    let seed = |id: &str,
                type_name: &str,
                purchased: Option<NaiveDate>,
                expires: Option<NaiveDate>,
                price: u32,
                hospital: &str,
                serial: &str,
                qr_code: &str| {
        purchased.zip(expires).map(|(purchase_date, expiry_date)| Carnet {
            id: id.to_string(),
            type_name: type_name.to_string(),
            purchase_date,
            expiry_date,
            price,
            hospital: hospital.to_string(),
            city: "Dakar".to_string(),
            serial_number: serial.to_string(),
            qr_code: qr_code.to_string(),
            status: CarnetStatus::Active,
            patient: patient.clone(),
        })
    };

    [
        seed(
            "SN-2024-001",
            "Consultation Générale",
            NaiveDate::from_ymd_opt(2024, 1, 15),
            NaiveDate::from_ymd_opt(2024, 4, 15),
            5000,
            "Hôpital Aristide Le Dantec",
            "SN-CARN-2024-001-ABC123",
            "qr-code-001",
        ),
        seed(
            "SN-2024-002",
            "Consultation Spécialiste",
            NaiveDate::from_ymd_opt(2024, 1, 20),
            NaiveDate::from_ymd_opt(2024, 7, 20),
            10000,
            "Hôpital Principal de Dakar",
            "SN-CARN-2024-002-DEF456",
            "qr-code-002",
        ),
    ]
    .into_iter()
    .flatten()
    .collect()
}
