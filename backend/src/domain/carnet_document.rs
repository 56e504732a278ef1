use super::date_format::{format_fcfa, format_short_date};
use super::models::carnet::Carnet;

/// Download name for a carnet document
pub fn file_name(carnet: &Carnet) -> String {
    format!("carnet-medical-{}.txt", carnet.id)
}

/// Plain-text carnet as handed to the patient
pub fn render(carnet: &Carnet) -> String {
    let lines = [
        "CARNET MÉDICAL - RÉPUBLIQUE DU SÉNÉGAL".to_string(),
        "=======================================".to_string(),
        String::new(),
        "INFORMATIONS DU CARNET".to_string(),
        "----------------------".to_string(),
        format!("Numéro: {}", carnet.id),
        format!("Série: {}", carnet.serial_number),
        format!("Type: {}", carnet.type_name),
        format!("Prix: {} FCFA", format_fcfa(carnet.price)),
        format!("Date d'achat: {}", format_short_date(carnet.purchase_date)),
        format!("Date d'expiration: {}", format_short_date(carnet.expiry_date)),
        format!("Statut: {}", carnet.status.label()),
        String::new(),
        "INFORMATIONS PATIENT".to_string(),
        "--------------------".to_string(),
        format!("Nom: {}", carnet.patient.last_name),
        format!("Prénom: {}", carnet.patient.first_name),
        format!("Date de naissance: {}", carnet.patient.date_of_birth),
        format!("N° Carte: {}", carnet.patient.card_number),
        String::new(),
        "ÉTABLISSEMENT".to_string(),
        "-------------".to_string(),
        format!("Hôpital: {}", carnet.hospital),
        format!("Ville: {}", carnet.city),
        String::new(),
        "Ce carnet est valable pour une consultation dans tout établissement de santé partenaire."
            .to_string(),
    ];
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::carnet::{CarnetStatus, PatientSnapshot};
    use chrono::NaiveDate;

    #[test]
    fn test_render_contains_every_block() {
        let carnet = Carnet {
            id: "SN-2024-002".to_string(),
            type_name: "Consultation Spécialiste".to_string(),
            purchase_date: NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(),
            expiry_date: NaiveDate::from_ymd_opt(2024, 7, 20).unwrap(),
            price: 10000,
            hospital: "Hôpital Principal de Dakar".to_string(),
            city: "Dakar".to_string(),
            serial_number: "SN-CARN-2024-002-DEF456".to_string(),
            qr_code: "qr-code-002".to_string(),
            status: CarnetStatus::Used,
            patient: PatientSnapshot {
                last_name: "DUPONT".to_string(),
                first_name: "Jean".to_string(),
                date_of_birth: "15/03/1985".to_string(),
                card_number: "SN-85-03-15-001".to_string(),
            },
        };

        let text = render(&carnet);
        assert!(text.starts_with("CARNET MÉDICAL"));
        assert!(text.contains("Numéro: SN-2024-002"));
        assert!(text.contains("Prix: 10 000 FCFA"));
        assert!(text.contains("Date d'expiration: 20 Juil 2024"));
        assert!(text.contains("Statut: Utilisé"));
        assert!(text.contains("Nom: DUPONT"));
        assert!(text.contains("Ville: Dakar"));
        assert_eq!(file_name(&carnet), "carnet-medical-SN-2024-002.txt");
    }
}
