use shared::{
    Appointment, AppointmentListResponse, AppointmentStatus, QueuePreviewResponse, Reminder,
    ReminderKind,
};

use crate::domain::commands::appointment::{AppointmentListResult, QueuePreviewResult};
use crate::domain::date_format::{format_short_date, format_time};
use crate::domain::models::appointment::{
    Appointment as DomainAppointment, AppointmentStatus as DomainAppointmentStatus,
};
use crate::domain::reminders::{Reminder as DomainReminder, ReminderKind as DomainReminderKind};

pub struct AppointmentMapper;

impl AppointmentMapper {
    pub fn status_to_dto(domain: DomainAppointmentStatus) -> AppointmentStatus {
        match domain {
            DomainAppointmentStatus::Confirmed => AppointmentStatus::Confirmed,
            DomainAppointmentStatus::Pending => AppointmentStatus::Pending,
            DomainAppointmentStatus::Cancelled => AppointmentStatus::Cancelled,
        }
    }

    /// Appointment with its date in the French short form, e.g. "15 Fév 2024"
    pub fn to_dto(domain: DomainAppointment) -> Appointment {
        Appointment {
            date: format_short_date(domain.date),
            time: format_time(domain.time),
            status: Self::status_to_dto(domain.status),
            id: domain.id,
            doctor: domain.doctor_name,
            specialty: domain.specialty,
            location: domain.location,
            queue_number: domain.queue_number,
            estimated_wait_minutes: domain.estimated_wait_minutes,
        }
    }

    pub fn to_list_response(result: AppointmentListResult) -> AppointmentListResponse {
        AppointmentListResponse {
            active: result.active.into_iter().map(Self::to_dto).collect(),
            cancelled: result.cancelled.into_iter().map(Self::to_dto).collect(),
        }
    }

    pub fn to_queue_preview_response(result: QueuePreviewResult) -> QueuePreviewResponse {
        QueuePreviewResponse {
            doctor: result.doctor_name,
            date: format_short_date(result.date),
            queue_number: result.placement.queue_number,
            estimated_wait_minutes: result.placement.estimated_wait_minutes,
        }
    }

    pub fn reminder_kind_to_dto(domain: DomainReminderKind) -> ReminderKind {
        match domain {
            DomainReminderKind::Soon => ReminderKind::Soon,
            DomainReminderKind::Today => ReminderKind::Today,
            DomainReminderKind::Upcoming => ReminderKind::Upcoming,
        }
    }

    pub fn reminder_to_dto(domain: DomainReminder) -> Reminder {
        Reminder {
            id: domain.appointment_id,
            doctor_name: domain.doctor_name,
            specialty: domain.specialty,
            date: format_short_date(domain.date),
            time: format_time(domain.time),
            location: domain.location,
            hours_until: domain.hours_until,
            kind: Self::reminder_kind_to_dto(domain.kind),
            label: domain.label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    #[test]
    fn test_appointment_dates_use_french_short_form() {
        let dto = AppointmentMapper::to_dto(DomainAppointment {
            id: "APT-002".to_string(),
            doctor_name: "Dr. Pierre Lambert".to_string(),
            specialty: "Cardiologue".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 2, 20).unwrap(),
            time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            status: DomainAppointmentStatus::Pending,
            location: "Hôpital Saint-Louis".to_string(),
            queue_number: Some(2),
            estimated_wait_minutes: Some(5),
        });
        assert_eq!(dto.date, "20 Fév 2024");
        assert_eq!(dto.time, "10:00");
        assert_eq!(dto.doctor, "Dr. Pierre Lambert");
        assert_eq!(dto.status, AppointmentStatus::Pending);
    }
}
