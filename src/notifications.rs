// src/notifications.rs
use crate::models::{NewNotification, Notification, NotificationKind};
use crate::store::{keys, KeyValueStore};
use log;
use std::sync::Arc;

/// Feed shown to a fresh install, before anything was ever stored.
pub fn default_notifications() -> Vec<Notification> {
    let seed = |id: &str, kind, title: &str, message: &str, time: &str, read| Notification {
        id: id.to_string(),
        kind,
        title: title.to_string(),
        message: message.to_string(),
        time: time.to_string(),
        read,
    };
    vec![
        seed("1", NotificationKind::Confirmed, "Confirmed - Hair wash", "Tue, afternoon at 14:00", "2 hours ago", false),
        seed("2", NotificationKind::Confirmed, "Confirmed - Hair wash", "Tue, afternoon at 14:00", "4 hours ago", false),
        seed("3", NotificationKind::Reminder, "Reminder - Next appointment", "Tomorrow at 15:00 - Haircut", "1 day ago", false),
        seed("4", NotificationKind::Promotion, "Special offer!", "20% off facial treatments", "2 days ago", true),
    ]
}

/// Notifications, newest first.
pub struct NotificationFeed {
    store: Arc<KeyValueStore>,
    notifications: Vec<Notification>,
}

impl NotificationFeed {
    pub fn new(store: Arc<KeyValueStore>) -> Self {
        let notifications = match store.get::<Vec<Notification>>(keys::NOTIFICATIONS) {
            Some(stored) => stored,
            None => {
                log::info!("No stored notifications, starting from the default feed");
                default_notifications()
            }
        };
        Self {
            store,
            notifications,
        }
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }

    /// Puts a new unread notification at the top of the feed.
    pub fn add(&mut self, payload: NewNotification) {
        let notification = Notification::new(payload);
        log::info!(
            "New {} notification {}: {}",
            notification.kind.as_str(),
            notification.id,
            notification.title
        );
        self.notifications.insert(0, notification);
        self.persist();
    }

    pub fn mark_as_read(&mut self, notification_id: &str) -> bool {
        match self.notifications.iter_mut().find(|n| n.id == notification_id) {
            Some(notification) => {
                notification.read = true;
                self.persist();
                true
            }
            None => {
                log::debug!("Mark-as-read ignored, no notification {}", notification_id);
                false
            }
        }
    }

    pub fn mark_all_as_read(&mut self) {
        for notification in &mut self.notifications {
            notification.read = true;
        }
        self.persist();
    }

    fn persist(&self) {
        if !self.store.set(keys::NOTIFICATIONS, &self.notifications) {
            log::warn!("Notifications changed in memory but were not persisted");
        }
    }
}
