use shared::{CarnetType, Doctor, Hospital, PaymentKind, PaymentMethod};

use crate::domain::date_format::validity_label;
use crate::domain::models::catalog::{
    CarnetType as DomainCarnetType, Doctor as DomainDoctor, Hospital as DomainHospital,
    PaymentKind as DomainPaymentKind, PaymentMethod as DomainPaymentMethod,
};

pub struct CatalogMapper;

impl CatalogMapper {
    pub fn hospital_to_dto(domain: DomainHospital) -> Hospital {
        Hospital {
            id: domain.id,
            name: domain.name,
            city: domain.city,
            address: domain.address,
            phone: domain.phone,
            specialties: domain.specialties,
        }
    }

    pub fn hospitals_to_dto(domain: Vec<DomainHospital>) -> Vec<Hospital> {
        domain.into_iter().map(Self::hospital_to_dto).collect()
    }

    pub fn payment_kind_to_dto(domain: DomainPaymentKind) -> PaymentKind {
        match domain {
            DomainPaymentKind::Mobile => PaymentKind::Mobile,
            DomainPaymentKind::Card => PaymentKind::Card,
            DomainPaymentKind::Bank => PaymentKind::Bank,
        }
    }

    pub fn payment_method_to_dto(domain: DomainPaymentMethod) -> PaymentMethod {
        PaymentMethod {
            id: domain.id,
            name: domain.name,
            kind: Self::payment_kind_to_dto(domain.kind),
            logo: domain.logo,
            instructions: domain.instructions,
        }
    }

    /// Carnet type with its validity spelled out, e.g. "3 mois"
    pub fn carnet_type_to_dto(domain: DomainCarnetType) -> CarnetType {
        CarnetType {
            validity_label: validity_label(domain.validity_months),
            id: domain.id,
            name: domain.name,
            price: domain.price,
            validity_months: domain.validity_months,
        }
    }

    pub fn doctor_to_dto(domain: DomainDoctor) -> Doctor {
        Doctor {
            id: domain.id,
            name: domain.name,
            specialty: domain.specialty,
            rating: domain.rating,
            available_slots: domain.available_slots,
            location: domain.location,
            address: domain.address,
            experience_years: domain.experience_years,
            languages: domain.languages,
        }
    }

    pub fn doctors_to_dto(domain: Vec<DomainDoctor>) -> Vec<Doctor> {
        domain.into_iter().map(Self::doctor_to_dto).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_carnet_type_gets_validity_label() {
        let dto = CatalogMapper::carnet_type_to_dto(DomainCarnetType {
            id: "maternite".to_string(),
            name: "Consultation Maternité".to_string(),
            price: 8000,
            validity_months: 9,
        });
        assert_eq!(dto.validity_label, "9 mois");
        assert_eq!(dto.price, 8000);
    }
}
