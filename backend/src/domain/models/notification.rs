use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Alert,
    Reminder,
    Info,
    Success,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotificationFilter {
    #[default]
    All,
    Unread,
    Alerts,
    Reminders,
}

impl NotificationFilter {
    pub fn accepts(&self, notification: &Notification) -> bool {
        match self {
            Self::All => true,
            Self::Unread => !notification.read,
            Self::Alerts => notification.kind == NotificationKind::Alert,
            Self::Reminders => notification.kind == NotificationKind::Reminder,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
    /// Front-end route the notification links to
    pub action_url: Option<String>,
}
