use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::info;

use super::commands::notification::{MarkAllReadResult, NotificationListResult};
use super::lock_state;
use super::models::notification::{Notification, NotificationFilter, NotificationKind};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum NotificationError {
    #[error("Notification introuvable : {0}")]
    NotFound(String),
}

/// In-app notifications of the signed-in patient
#[derive(Clone)]
pub struct NotificationService {
    notifications: Arc<Mutex<Vec<Notification>>>,
}

impl NotificationService {
    pub fn new() -> Self {
        Self::seeded_at(Utc::now())
    }

    /// Seed the sample notifications relative to `now`
    pub fn seeded_at(now: DateTime<Utc>) -> Self {
        Self {
            notifications: Arc::new(Mutex::new(seed_notifications(now))),
        }
    }

    pub fn list(&self, filter: NotificationFilter) -> NotificationListResult {
        let notifications = lock_state(&self.notifications);
        NotificationListResult {
            notifications: notifications
                .iter()
                .filter(|n| filter.accepts(n))
                .cloned()
                .collect(),
            unread_count: unread(&notifications),
        }
    }

    pub fn mark_as_read(&self, notification_id: &str) -> Result<Notification, NotificationError> {
        let mut notifications = lock_state(&self.notifications);
        let notification = notifications
            .iter_mut()
            .find(|n| n.id == notification_id)
            .ok_or_else(|| NotificationError::NotFound(notification_id.to_string()))?;
        notification.read = true;
        Ok(notification.clone())
    }

    pub fn mark_all_as_read(&self) -> MarkAllReadResult {
        let mut notifications = lock_state(&self.notifications);
        let mut updated_count = 0;
        for notification in notifications.iter_mut().filter(|n| !n.read) {
            notification.read = true;
            updated_count += 1;
        }
        info!("Marked {} notifications as read", updated_count);
        MarkAllReadResult {
            updated_count,
            unread_count: 0,
        }
    }

    pub fn delete(&self, notification_id: &str) -> Result<(), NotificationError> {
        let mut notifications = lock_state(&self.notifications);
        let before = notifications.len();
        notifications.retain(|n| n.id != notification_id);
        if notifications.len() == before {
            return Err(NotificationError::NotFound(notification_id.to_string()));
        }
        info!("Deleted notification {}", notification_id);
        Ok(())
    }
}

impl Default for NotificationService {
    fn default() -> Self {
        Self::new()
    }
}

/// `il y a 5 min`, `il y a 2 h`, `il y a 3 j`, then the numeric date after a week
pub fn time_label(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(timestamp);
    let minutes = elapsed.num_minutes().max(0);
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if minutes < 60 {
        format!("il y a {} min", minutes)
    } else if hours < 24 {
        format!("il y a {} h", hours)
    } else if days < 7 {
        format!("il y a {} j", days)
    } else {
        timestamp.format("%d/%m/%Y").to_string()
    }
}

fn unread(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|n| !n.read).count()
}

fn seed_notifications(now: DateTime<Utc>) -> Vec<Notification> {
    let notification = |id: &str,
                        kind: NotificationKind,
                        title: &str,
                        message: &str,
                        age: Duration,
                        read: bool,
                        action_url: Option<&str>| Notification {
        id: id.to_string(),
        kind,
        title: title.to_string(),
        message: message.to_string(),
        timestamp: now - age,
        read,
        action_url: action_url.map(str::to_string),
    };

    vec![
        notification(
            "1",
            NotificationKind::Alert,
            "Consultation urgente",
            "Votre rendez-vous avec Dr. Martin S. commence dans 1 heure. Lieu : Clinique Médicale de Dakar.",
            Duration::minutes(15),
            false,
            Some("/appointments"),
        ),
        notification(
            "2",
            NotificationKind::Reminder,
            "Carnet de santé expirant",
            "Votre carnet de santé général expire dans 15 jours. Pensez à le renouveler.",
            Duration::hours(2),
            false,
            Some("/carnets"),
        ),
        notification(
            "3",
            NotificationKind::Success,
            "Rendez-vous confirmé",
            "Votre rendez-vous du 25 novembre à 14h00 avec Dr. Fatou D. a été confirmé.",
            Duration::hours(24),
            true,
            Some("/appointments"),
        ),
        notification(
            "4",
            NotificationKind::Info,
            "Nouvelle fonctionnalité",
            "Découvrez notre nouveau système de suivi médical en temps réel.",
            Duration::days(2),
            true,
            None,
        ),
        notification(
            "5",
            NotificationKind::Reminder,
            "Rappel : Vaccination",
            "N'oubliez pas votre rappel de vaccination prévu pour le 20 novembre.",
            Duration::days(3),
            true,
            None,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ids(result: &NotificationListResult) -> Vec<&str> {
        result.notifications.iter().map(|n| n.id.as_str()).collect()
    }

    #[test]
    fn test_filters_and_unread_count() {
        let service = NotificationService::new();

        let all = service.list(NotificationFilter::All);
        assert_eq!(ids(&all), vec!["1", "2", "3", "4", "5"]);
        assert_eq!(all.unread_count, 2);

        assert_eq!(ids(&service.list(NotificationFilter::Unread)), vec!["1", "2"]);
        assert_eq!(ids(&service.list(NotificationFilter::Alerts)), vec!["1"]);
        assert_eq!(ids(&service.list(NotificationFilter::Reminders)), vec!["2", "5"]);
    }

    #[test]
    fn test_mark_read_and_delete() {
        let service = NotificationService::new();

        let read = service.mark_as_read("1").unwrap();
        assert!(read.read);
        assert_eq!(service.list(NotificationFilter::All).unread_count, 1);

        let result = service.mark_all_as_read();
        assert_eq!(result.updated_count, 1);
        assert_eq!(service.list(NotificationFilter::Unread).notifications.len(), 0);

        service.delete("4").unwrap();
        assert_eq!(service.list(NotificationFilter::All).notifications.len(), 4);
        assert_eq!(
            service.delete("4"),
            Err(NotificationError::NotFound("4".to_string()))
        );
        assert!(service.mark_as_read("42").is_err());
    }

    #[test]
    fn test_time_labels() {
        let now = Utc.with_ymd_and_hms(2024, 11, 20, 12, 0, 0).unwrap();
        assert_eq!(time_label(now - Duration::minutes(15), now), "il y a 15 min");
        assert_eq!(time_label(now - Duration::hours(2), now), "il y a 2 h");
        assert_eq!(time_label(now - Duration::hours(24), now), "il y a 1 j");
        assert_eq!(time_label(now - Duration::days(3), now), "il y a 3 j");
        assert_eq!(time_label(now - Duration::days(8), now), "12/11/2024");
        assert_eq!(time_label(now + Duration::minutes(1), now), "il y a 0 min");
    }
}
