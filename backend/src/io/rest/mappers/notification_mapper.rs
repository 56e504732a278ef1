use chrono::{DateTime, Utc};
use shared::{Notification, NotificationFilter, NotificationKind, NotificationListResponse};

use crate::domain::commands::notification::NotificationListResult;
use crate::domain::models::notification::{
    Notification as DomainNotification, NotificationFilter as DomainNotificationFilter,
    NotificationKind as DomainNotificationKind,
};
use crate::domain::notification_service::time_label;

pub struct NotificationMapper;

impl NotificationMapper {
    pub fn filter_to_domain(dto: NotificationFilter) -> DomainNotificationFilter {
        match dto {
            NotificationFilter::All => DomainNotificationFilter::All,
            NotificationFilter::Unread => DomainNotificationFilter::Unread,
            NotificationFilter::Alerts => DomainNotificationFilter::Alerts,
            NotificationFilter::Reminders => DomainNotificationFilter::Reminders,
        }
    }

    pub fn kind_to_dto(domain: DomainNotificationKind) -> NotificationKind {
        match domain {
            DomainNotificationKind::Alert => NotificationKind::Alert,
            DomainNotificationKind::Reminder => NotificationKind::Reminder,
            DomainNotificationKind::Info => NotificationKind::Info,
            DomainNotificationKind::Success => NotificationKind::Success,
        }
    }

    /// Notification with its age relative to `now`
    pub fn to_dto(domain: DomainNotification, now: DateTime<Utc>) -> Notification {
        Notification {
            timestamp: domain.timestamp.to_rfc3339(),
            time_label: time_label(domain.timestamp, now),
            kind: Self::kind_to_dto(domain.kind),
            id: domain.id,
            title: domain.title,
            message: domain.message,
            read: domain.read,
            action_url: domain.action_url,
        }
    }

    pub fn to_list_response(result: NotificationListResult, now: DateTime<Utc>) -> NotificationListResponse {
        NotificationListResponse {
            notifications: result
                .notifications
                .into_iter()
                .map(|n| Self::to_dto(n, now))
                .collect(),
            unread_count: result.unread_count,
        }
    }
}
