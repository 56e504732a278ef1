//! Static reference catalog: cities, hospitals, payment methods, carnet
//! types and partner doctors.
//!
//! Services depend on the [`CatalogProvider`] trait so tests can substitute a
//! smaller catalog; [`StaticCatalog`] is the built-in data set.

use super::models::catalog::{CarnetType, Doctor, Hospital, PaymentKind, PaymentMethod};

/// Read-only access to the reference catalog
pub trait CatalogProvider: Send + Sync {
    fn cities(&self) -> &[String];
    fn hospitals(&self) -> &[Hospital];
    fn payment_methods(&self) -> &[PaymentMethod];
    fn carnet_types(&self) -> &[CarnetType];
    fn doctors(&self) -> &[Doctor];

    fn has_city(&self, city: &str) -> bool {
        self.cities().iter().any(|c| c == city)
    }

    /// Hospitals located in exactly `city`
    fn hospitals_in_city(&self, city: &str) -> Vec<Hospital> {
        self.hospitals()
            .iter()
            .filter(|h| h.city == city)
            .cloned()
            .collect()
    }

    fn find_hospital(&self, id: &str) -> Option<Hospital> {
        self.hospitals().iter().find(|h| h.id == id).cloned()
    }

    fn find_payment_method(&self, id: &str) -> Option<PaymentMethod> {
        self.payment_methods().iter().find(|p| p.id == id).cloned()
    }

    fn find_carnet_type(&self, id: &str) -> Option<CarnetType> {
        self.carnet_types().iter().find(|t| t.id == id).cloned()
    }

    fn find_doctor(&self, id: &str) -> Option<Doctor> {
        self.doctors().iter().find(|d| d.id == id).cloned()
    }
}

/// Built-in catalog
pub struct StaticCatalog {
    cities: Vec<String>,
    hospitals: Vec<Hospital>,
    payment_methods: Vec<PaymentMethod>,
    carnet_types: Vec<CarnetType>,
    doctors: Vec<Doctor>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self {
            cities: [
                "Dakar",
                "Thiès",
                "Saint-Louis",
                "Kaolack",
                "Ziguinchor",
                "Mbour",
                "Diourbel",
                "Louga",
                "Tambacounda",
                "Kolda",
                "Richard-Toll",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
            hospitals: vec![
                hospital(
                    "1",
                    "Hôpital Aristide Le Dantec",
                    "Dakar",
                    "Route de la Corniche, Dakar",
                    "+221 33 839 50 50",
                    &["Médecine Générale", "Cardiologie", "Chirurgie", "Pédiatrie", "Urgence"],
                ),
                hospital(
                    "2",
                    "Hôpital Principal de Dakar",
                    "Dakar",
                    "Avenue du Président Lamine Guèye, Dakar",
                    "+221 33 839 50 50",
                    &["Médecine Générale", "Dermatologie", "Ophtalmologie", "Gynécologie"],
                ),
                hospital(
                    "3",
                    "Hôpital d'enfants Albert Royer",
                    "Dakar",
                    "Route de l'Aéroport, Dakar",
                    "+221 33 869 10 10",
                    &["Pédiatrie", "Urgence Pédiatrique"],
                ),
                hospital(
                    "4",
                    "Centre Hospitalier Régional de Thiès",
                    "Thiès",
                    "Route de Khombole, Thiès",
                    "+221 33 951 10 10",
                    &["Médecine Générale", "Pédiatrie", "Radiologie", "Maternité"],
                ),
                hospital(
                    "5",
                    "Hôpital Régional de Saint-Louis",
                    "Saint-Louis",
                    "Avenue Jean Mermoz, Saint-Louis",
                    "+221 33 961 10 10",
                    &["Médecine Générale", "Chirurgie", "Maternité", "Urgence"],
                ),
                hospital(
                    "6",
                    "Centre Hospitalier Régional de Kaolack",
                    "Kaolack",
                    "Route de Nioro, Kaolack",
                    "+221 33 941 10 10",
                    &["Médecine Générale", "Pédiatrie", "Chirurgie"],
                ),
                hospital(
                    "7",
                    "Hôpital Régional de Ziguinchor",
                    "Ziguinchor",
                    "Route de Kabrousse, Ziguinchor",
                    "+221 33 991 10 10",
                    &["Médecine Générale", "Maternité", "Urgence"],
                ),
            ],
            payment_methods: vec![
                payment("wave", "Wave", PaymentKind::Mobile, "🌊", "Composez *221#"),
                payment("orange", "Orange Money", PaymentKind::Mobile, "🟠", "Composez *144#"),
                payment("free", "Free Money", PaymentKind::Mobile, "🟢", "Composez *123#"),
                payment("carte", "Carte Bancaire", PaymentKind::Card, "💳", "Paiement sécurisé"),
                payment("virement", "Virement Bancaire", PaymentKind::Bank, "🏦", "RIB disponible"),
            ],
            carnet_types: vec![
                carnet_type("consultation", "Consultation Générale", 5000, 3),
                carnet_type("specialiste", "Consultation Spécialiste", 10000, 6),
                carnet_type("urgence", "Consultation Urgence", 15000, 1),
                carnet_type("maternite", "Consultation Maternité", 8000, 9),
                carnet_type("pediatrie", "Consultation Pédiatrie", 6000, 3),
                carnet_type("chirurgie", "Consultation Chirurgie", 20000, 6),
            ],
            doctors: vec![
                Doctor {
                    id: "1".to_string(),
                    name: "Dr. Marie Martin".to_string(),
                    specialty: "Médecin Généraliste".to_string(),
                    rating: 4.8,
                    available_slots: strings(&["14:30", "15:00", "15:30", "16:00"]),
                    location: "Clinique Médicale Paris".to_string(),
                    address: "123 Avenue des Champs-Élysées, Paris".to_string(),
                    experience_years: 12,
                    languages: strings(&["Français", "Anglais"]),
                },
                Doctor {
                    id: "2".to_string(),
                    name: "Dr. Pierre Lambert".to_string(),
                    specialty: "Dermatologue".to_string(),
                    rating: 4.9,
                    available_slots: strings(&["10:00", "10:30", "11:00", "14:00"]),
                    location: "Centre Dermatologique".to_string(),
                    address: "456 Rue de la Paix, Paris".to_string(),
                    experience_years: 8,
                    languages: strings(&["Français", "Espagnol"]),
                },
                Doctor {
                    id: "3".to_string(),
                    name: "Dr. Sophie Bernard".to_string(),
                    specialty: "Cardiologue".to_string(),
                    rating: 4.7,
                    available_slots: strings(&["09:00", "09:30", "10:30", "11:00"]),
                    location: "Institut Cardiologique".to_string(),
                    address: "789 Boulevard Saint-Germain, Paris".to_string(),
                    experience_years: 15,
                    languages: strings(&["Français", "Anglais", "Arabe"]),
                },
                Doctor {
                    id: "4".to_string(),
                    name: "Dr. Jean Dupont".to_string(),
                    specialty: "Pédiatre".to_string(),
                    rating: 4.9,
                    available_slots: strings(&["08:30", "09:00", "14:00", "16:30"]),
                    location: "Centre Pédiatrique".to_string(),
                    address: "321 Rue de Rivoli, Paris".to_string(),
                    experience_years: 10,
                    languages: strings(&["Français"]),
                },
            ],
        }
    }
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogProvider for StaticCatalog {
    fn cities(&self) -> &[String] {
        &self.cities
    }

    fn hospitals(&self) -> &[Hospital] {
        &self.hospitals
    }

    fn payment_methods(&self) -> &[PaymentMethod] {
        &self.payment_methods
    }

    fn carnet_types(&self) -> &[CarnetType] {
        &self.carnet_types
    }

    fn doctors(&self) -> &[Doctor] {
        &self.doctors
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn hospital(
    id: &str,
    name: &str,
    city: &str,
    address: &str,
    phone: &str,
    specialties: &[&str],
) -> Hospital {
    Hospital {
        id: id.to_string(),
        name: name.to_string(),
        city: city.to_string(),
        address: address.to_string(),
        phone: phone.to_string(),
        specialties: strings(specialties),
    }
}

fn payment(id: &str, name: &str, kind: PaymentKind, logo: &str, instructions: &str) -> PaymentMethod {
    PaymentMethod {
        id: id.to_string(),
        name: name.to_string(),
        kind,
        logo: logo.to_string(),
        instructions: instructions.to_string(),
    }
}

fn carnet_type(id: &str, name: &str, price: u32, validity_months: u32) -> CarnetType {
    CarnetType {
        id: id.to_string(),
        name: name.to_string(),
        price,
        validity_months,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_sizes() {
        let catalog = StaticCatalog::new();
        assert_eq!(catalog.cities().len(), 11);
        assert_eq!(catalog.hospitals().len(), 7);
        assert_eq!(catalog.payment_methods().len(), 5);
        assert_eq!(catalog.carnet_types().len(), 6);
        assert_eq!(catalog.doctors().len(), 4);
    }

    #[test]
    fn test_hospitals_in_city() {
        let catalog = StaticCatalog::new();
        let dakar: Vec<String> = catalog
            .hospitals_in_city("Dakar")
            .into_iter()
            .map(|h| h.id)
            .collect();
        assert_eq!(dakar, vec!["1", "2", "3"]);
        assert!(catalog.hospitals_in_city("Kolda").is_empty());
        assert!(catalog.hospitals_in_city("dakar").is_empty());
    }

    #[test]
    fn test_finders() {
        let catalog = StaticCatalog::new();
        assert!(catalog.has_city("Richard-Toll"));
        assert!(!catalog.has_city("Paris"));
        assert_eq!(catalog.find_carnet_type("maternite").unwrap().validity_months, 9);
        assert_eq!(catalog.find_payment_method("carte").unwrap().kind, PaymentKind::Card);
        assert_eq!(catalog.find_hospital("4").unwrap().city, "Thiès");
        assert!(catalog.find_doctor("9").is_none());
    }
}
