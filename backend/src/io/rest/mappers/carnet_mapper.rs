use shared::{
    Carnet, CarnetStatus, CompletePurchaseResponse, PatientSnapshot, WizardStep, WizardView,
};

use super::catalog_mapper::CatalogMapper;
use crate::domain::commands::carnet::{CompletePurchaseResult, WizardState};
use crate::domain::date_format::format_short_date;
use crate::domain::models::carnet::{
    Carnet as DomainCarnet, CarnetStatus as DomainCarnetStatus,
    PatientSnapshot as DomainPatientSnapshot,
};
use crate::domain::purchase_wizard::WizardStep as DomainWizardStep;

pub struct CarnetMapper;

impl CarnetMapper {
    pub fn status_to_dto(domain: DomainCarnetStatus) -> CarnetStatus {
        match domain {
            DomainCarnetStatus::Active => CarnetStatus::Active,
            DomainCarnetStatus::Used => CarnetStatus::Used,
            DomainCarnetStatus::Expired => CarnetStatus::Expired,
        }
    }

    pub fn patient_to_dto(domain: DomainPatientSnapshot) -> PatientSnapshot {
        PatientSnapshot {
            last_name: domain.last_name,
            first_name: domain.first_name,
            date_of_birth: domain.date_of_birth,
            card_number: domain.card_number,
        }
    }

    pub fn to_dto(domain: DomainCarnet) -> Carnet {
        Carnet {
            id: domain.id,
            carnet_type: domain.type_name,
            purchase_date: format_short_date(domain.purchase_date),
            expiry_date: format_short_date(domain.expiry_date),
            price: domain.price,
            hospital: domain.hospital,
            city: domain.city,
            serial_number: domain.serial_number,
            qr_code: domain.qr_code,
            status: Self::status_to_dto(domain.status),
            patient: Self::patient_to_dto(domain.patient),
        }
    }

    pub fn to_dto_list(domain: Vec<DomainCarnet>) -> Vec<Carnet> {
        domain.into_iter().map(Self::to_dto).collect()
    }

    pub fn to_complete_response(result: CompletePurchaseResult) -> CompletePurchaseResponse {
        CompletePurchaseResponse {
            carnet: Self::to_dto(result.carnet),
            success_message: result.success_message,
            duplicate: result.duplicate,
        }
    }

    pub fn step_to_dto(domain: DomainWizardStep) -> WizardStep {
        match domain {
            DomainWizardStep::City => WizardStep::City,
            DomainWizardStep::Hospital => WizardStep::Hospital,
            DomainWizardStep::CarnetType => WizardStep::CarnetType,
            DomainWizardStep::Review => WizardStep::Review,
            DomainWizardStep::Payment => WizardStep::Payment,
        }
    }

    pub fn step_to_domain(dto: WizardStep) -> DomainWizardStep {
        match dto {
            WizardStep::City => DomainWizardStep::City,
            WizardStep::Hospital => DomainWizardStep::Hospital,
            WizardStep::CarnetType => DomainWizardStep::CarnetType,
            WizardStep::Review => DomainWizardStep::Review,
            WizardStep::Payment => DomainWizardStep::Payment,
        }
    }

    pub fn to_wizard_view(state: WizardState) -> WizardView {
        let wizard = state.wizard;
        WizardView {
            step: Self::step_to_dto(wizard.step()),
            city: wizard.city().map(str::to_string),
            hospital: state.hospital.map(CatalogMapper::hospital_to_dto),
            carnet_type: state.carnet_type.map(CatalogMapper::carnet_type_to_dto),
            payment_method: state.payment_method.map(CatalogMapper::payment_method_to_dto),
            save_default_city: wizard.save_default_city(),
            default_city: state.default_city,
            available_hospitals: CatalogMapper::hospitals_to_dto(state.available_hospitals),
            idempotency_key: wizard.idempotency_key().to_string(),
        }
    }
}
