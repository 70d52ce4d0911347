// src/context.rs
use crate::appointments::{AppointmentBook, AppointmentStats};
use crate::directory::UserDirectory;
use crate::error::{AppError, AppResult};
use crate::models::{Appointment, NewAppointment, NewNotification, NotificationKind};
use crate::notifications::NotificationFeed;
use crate::preferences::Preferences;
use crate::store::KeyValueStore;
use log;
use std::path::Path;
use std::sync::Arc;

/// Everything the presentation layer talks to, built once at startup.
pub struct SalonContext {
    store: Arc<KeyValueStore>,
    pub users: UserDirectory,
    pub appointments: AppointmentBook,
    pub notifications: NotificationFeed,
    pub preferences: Preferences,
}

impl SalonContext {
    pub fn with_store(store: KeyValueStore) -> Self {
        let store = Arc::new(store);
        Self {
            users: UserDirectory::new(Arc::clone(&store)),
            appointments: AppointmentBook::new(Arc::clone(&store)),
            notifications: NotificationFeed::new(Arc::clone(&store)),
            preferences: Preferences::new(Arc::clone(&store)),
            store,
        }
    }

    pub fn open(data_dir: &Path) -> AppResult<Self> {
        let store = KeyValueStore::open(data_dir)?;
        Ok(Self::with_store(store))
    }

    pub fn in_memory() -> Self {
        Self::with_store(KeyValueStore::in_memory())
    }

    /// Books through the agenda screen.
    pub fn book(&mut self, data: NewAppointment) -> AppResult<Appointment> {
        let appointment = self.create_for_session(data)?;
        self.notifications.add(NewNotification {
            kind: NotificationKind::Confirmed,
            title: "Appointment confirmed!".to_string(),
            message: format!(
                "{} at {} with {}",
                appointment.date, appointment.time, appointment.specialist
            ),
        });
        Ok(appointment)
    }

    /// Books through the payment screen. No money moves; only the
    /// confirmation differs from [`SalonContext::book`].
    pub fn pay(&mut self, data: NewAppointment) -> AppResult<Appointment> {
        let appointment = self.create_for_session(data)?;
        self.notifications.add(NewNotification {
            kind: NotificationKind::Confirmed,
            title: "Payment confirmed!".to_string(),
            message: "Your appointment was confirmed and the payment processed".to_string(),
        });
        Ok(appointment)
    }

    /// The logged-in user's appointments, oldest first, with their stats.
    pub fn history(&self) -> AppResult<(Vec<Appointment>, AppointmentStats)> {
        let user = self.users.current_user().ok_or(AppError::NotLoggedIn)?;
        Ok((
            self.appointments.list_for_user(&user.id),
            self.appointments.stats(&user.id),
        ))
    }

    /// Wipes the store and reloads every manager from the empty state.
    pub fn reset(&mut self) -> bool {
        let cleared = self.store.clear();
        self.users = UserDirectory::new(Arc::clone(&self.store));
        self.appointments = AppointmentBook::new(Arc::clone(&self.store));
        self.notifications = NotificationFeed::new(Arc::clone(&self.store));
        log::info!("Application data reset (store cleared: {})", cleared);
        cleared
    }

    fn create_for_session(&mut self, data: NewAppointment) -> AppResult<Appointment> {
        if !self.users.is_logged_in() {
            log::warn!("Booking refused, nobody is logged in");
            return Err(AppError::NotLoggedIn);
        }
        Ok(self.appointments.create(&self.users, data))
    }
}
