//! Read-only reference data: hospitals, payment methods, carnet types, doctors.

#[derive(Debug, Clone, PartialEq)]
pub struct Hospital {
    pub id: String,
    pub name: String,
    pub city: String,
    pub address: String,
    pub phone: String,
    pub specialties: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentKind {
    Mobile,
    Card,
    Bank,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentMethod {
    pub id: String,
    pub name: String,
    pub kind: PaymentKind,
    pub logo: String,
    pub instructions: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CarnetType {
    pub id: String,
    pub name: String,
    /// FCFA
    pub price: u32,
    pub validity_months: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Doctor {
    pub id: String,
    pub name: String,
    pub specialty: String,
    pub rating: f32,
    /// `HH:MM` slots offered for booking
    pub available_slots: Vec<String>,
    pub location: String,
    pub address: String,
    pub experience_years: u32,
    pub languages: Vec<String>,
}

impl Doctor {
    pub fn offers_slot(&self, slot: &str) -> bool {
        self.available_slots.iter().any(|s| s == slot)
    }
}
