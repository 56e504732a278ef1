use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarnetStatus {
    Active,
    Used,
    Expired,
}

impl CarnetStatus {
    /// Parse a status filter value; `None` for unknown values
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "active" => Some(Self::Active),
            "used" => Some(Self::Used),
            "expired" => Some(Self::Expired),
            _ => None,
        }
    }

    /// French label shown on documents
    pub fn label(&self) -> &'static str {
        match self {
            Self::Active => "Actif",
            Self::Used => "Utilisé",
            Self::Expired => "Expiré",
        }
    }
}

/// Patient identity frozen into a carnet at purchase time
#[derive(Debug, Clone, PartialEq)]
pub struct PatientSnapshot {
    pub last_name: String,
    pub first_name: String,
    /// `DD/MM/YYYY`
    pub date_of_birth: String,
    pub card_number: String,
}

/// Purchased consultation pass
#[derive(Debug, Clone, PartialEq)]
pub struct Carnet {
    pub id: String,
    pub type_name: String,
    pub purchase_date: NaiveDate,
    pub expiry_date: NaiveDate,
    /// FCFA
    pub price: u32,
    pub hospital: String,
    pub city: String,
    pub serial_number: String,
    pub qr_code: String,
    pub status: CarnetStatus,
    pub patient: PatientSnapshot,
}

impl Carnet {
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.type_name.to_lowercase().contains(&term) || self.hospital.to_lowercase().contains(&term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!(CarnetStatus::parse("active"), Some(CarnetStatus::Active));
        assert_eq!(CarnetStatus::parse(" Expired "), Some(CarnetStatus::Expired));
        assert_eq!(CarnetStatus::parse("used"), Some(CarnetStatus::Used));
        assert_eq!(CarnetStatus::parse("all"), None);
    }
}
