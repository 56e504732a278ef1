use std::sync::Arc;
use tracing::debug;

use super::catalog::CatalogProvider;
use super::models::catalog::Doctor;

/// Specialty filter value meaning "no filter"
pub const ALL_SPECIALTIES: &str = "all";

/// Search over the partner doctors of the catalog
#[derive(Clone)]
pub struct DoctorDirectory {
    catalog: Arc<dyn CatalogProvider>,
}

impl DoctorDirectory {
    pub fn new(catalog: Arc<dyn CatalogProvider>) -> Self {
        Self { catalog }
    }

    /// Doctors whose name or specialty contains `term` (case-insensitive),
    /// restricted to `specialty` unless it is absent or `all`.
    pub fn search(&self, term: Option<&str>, specialty: Option<&str>) -> Vec<Doctor> {
        let term = term.map(str::trim).unwrap_or_default().to_lowercase();
        let specialty = specialty
            .map(str::trim)
            .filter(|s| !s.is_empty() && *s != ALL_SPECIALTIES);

        let doctors: Vec<Doctor> = self
            .catalog
            .doctors()
            .iter()
            .filter(|d| {
                d.name.to_lowercase().contains(&term) || d.specialty.to_lowercase().contains(&term)
            })
            .filter(|d| specialty.map_or(true, |s| d.specialty == s))
            .cloned()
            .collect();

        debug!("Doctor search {:?}/{:?} matched {}", term, specialty, doctors.len());
        doctors
    }

    /// Distinct specialties in catalog order
    pub fn specialties(&self) -> Vec<String> {
        let mut specialties: Vec<String> = Vec::new();
        for doctor in self.catalog.doctors() {
            if !specialties.contains(&doctor.specialty) {
                specialties.push(doctor.specialty.clone());
            }
        }
        specialties
    }

    pub fn find(&self, id: &str) -> Option<Doctor> {
        self.catalog.find_doctor(id)
    }
}
