// src/appointments.rs
use crate::directory::UserDirectory;
use crate::models::{Appointment, AppointmentStatus, NewAppointment};
use crate::store::{keys, KeyValueStore};
use log;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;

/// Figures shown on the appointment history screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AppointmentStats {
    pub total: usize,
    /// Sum of prices over completed appointments.
    pub spent: Decimal,
    pub scheduled: usize,
}

/// Parses a display price such as `"R$42,5"` or `"R$ 1.234,56"`.
///
/// Any leading currency marker is dropped. When the amount has a comma it is
/// read as the decimal separator and dots as thousands separators.
pub fn parse_price(price: &str) -> Option<Decimal> {
    let amount = price
        .trim()
        .trim_start_matches(|c: char| !c.is_ascii_digit() && !matches!(c, '-' | '.' | ','))
        .trim();
    if !amount.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    let mut normalized = if amount.contains(',') {
        amount.replace('.', "").replace(',', ".")
    } else {
        amount.to_string()
    };
    // ".50" -> "0.50"
    if let Some(fraction) = normalized.strip_prefix('.') {
        normalized = format!("0.{}", fraction);
    } else if let Some(fraction) = normalized.strip_prefix("-.") {
        normalized = format!("-0.{}", fraction);
    }
    Decimal::from_str(&normalized).ok()
}

pub struct AppointmentBook {
    store: Arc<KeyValueStore>,
    appointments: Vec<Appointment>,
}

impl AppointmentBook {
    pub fn new(store: Arc<KeyValueStore>) -> Self {
        let appointments: Vec<Appointment> = store.get(keys::APPOINTMENTS).unwrap_or_default();
        log::debug!("Loaded {} appointments", appointments.len());
        Self {
            store,
            appointments,
        }
    }

    /// Books an appointment for whoever is logged in on `directory`.
    pub fn create(&mut self, directory: &UserDirectory, data: NewAppointment) -> Appointment {
        let user_id = directory.current_user().map(|u| u.id.clone());
        if user_id.is_none() {
            log::warn!("Creating appointment without an active session");
        }
        let appointment = Appointment::new(user_id, data);
        self.appointments.push(appointment.clone());
        self.persist();
        log::info!(
            "Created appointment {} with {} on {} at {}",
            appointment.id,
            appointment.specialist,
            appointment.date,
            appointment.time
        );
        appointment
    }

    /// Appointments owned by `user_id`, oldest first.
    pub fn list_for_user(&self, user_id: &str) -> Vec<Appointment> {
        self.appointments
            .iter()
            .filter(|a| a.user_id.as_deref() == Some(user_id))
            .cloned()
            .collect()
    }

    pub fn get(&self, appointment_id: &str) -> Option<&Appointment> {
        self.appointments.iter().find(|a| a.id == appointment_id)
    }

    /// Marks the appointment cancelled. Returns `false` if no appointment has
    /// that id.
    pub fn cancel(&mut self, appointment_id: &str) -> bool {
        match self.appointments.iter_mut().find(|a| a.id == appointment_id) {
            Some(appointment) => {
                appointment.status = AppointmentStatus::Cancelled;
                log::info!("Cancelled appointment {}", appointment_id);
                self.persist();
                true
            }
            None => {
                log::debug!("Cancel ignored, no appointment {}", appointment_id);
                false
            }
        }
    }

    /// Moves a scheduled appointment to completed. Nothing in the booking
    /// screens calls this; it exists for staff-side tooling.
    pub fn complete(&mut self, appointment_id: &str) -> bool {
        let Some(appointment) = self
            .appointments
            .iter_mut()
            .find(|a| a.id == appointment_id)
        else {
            return false;
        };
        if appointment.status != AppointmentStatus::Scheduled {
            log::warn!(
                "Appointment {} is {}, not completing it",
                appointment_id,
                appointment.status
            );
            return false;
        }
        appointment.status = AppointmentStatus::Completed;
        log::info!("Completed appointment {}", appointment_id);
        self.persist();
        true
    }

    pub fn stats(&self, user_id: &str) -> AppointmentStats {
        let mut stats = AppointmentStats::default();
        for appointment in self
            .appointments
            .iter()
            .filter(|a| a.user_id.as_deref() == Some(user_id))
        {
            stats.total += 1;
            match appointment.status {
                AppointmentStatus::Scheduled => stats.scheduled += 1,
                AppointmentStatus::Completed => match parse_price(&appointment.price) {
                    Some(price) => stats.spent += price,
                    None => log::warn!(
                        "Unreadable price {:?} on appointment {}, counted as zero",
                        appointment.price,
                        appointment.id
                    ),
                },
                AppointmentStatus::Cancelled => {}
            }
        }
        stats
    }

    fn persist(&self) {
        if !self.store.set(keys::APPOINTMENTS, &self.appointments) {
            log::warn!("Appointments changed in memory but were not persisted");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewUser;

    fn booking(price: &str) -> NewAppointment {
        NewAppointment {
            date: "2".to_string(),
            time: "14:00".to_string(),
            specialist: "John Doe".to_string(),
            service: "Hair wash".to_string(),
            price: price.to_string(),
        }
    }

    fn logged_in_directory(store: &Arc<KeyValueStore>) -> UserDirectory {
        let mut directory = UserDirectory::new(Arc::clone(store));
        directory
            .register(NewUser {
                name: "Ana".to_string(),
                email: "a@a.com".to_string(),
                phone: "11999999999".to_string(),
                password: "abcdef".to_string(),
            })
            .unwrap();
        directory.login("a@a.com", "abcdef").unwrap();
        directory
    }

    fn stored_appointment(id: &str, user_id: &str, price: &str, status: AppointmentStatus) -> Appointment {
        let mut appointment = Appointment::new(Some(user_id.to_string()), booking(price));
        appointment.id = id.to_string();
        appointment.status = status;
        appointment
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("R$10,00"), Some(Decimal::new(1000, 2)));
        assert_eq!(parse_price("R$42,5"), Some(Decimal::new(425, 1)));
        assert_eq!(parse_price("R$ 1.234,56"), Some(Decimal::new(123456, 2)));
        assert_eq!(parse_price("$19.90"), Some(Decimal::new(1990, 2)));
        assert_eq!(parse_price("35"), Some(Decimal::from(35)));
        assert_eq!(parse_price("R$"), None);
        assert_eq!(parse_price("free"), None);
        assert_eq!(parse_price("R$."), None);
    }

    #[test]
    fn test_parse_price_without_leading_digit() {
        assert_eq!(parse_price("R$,50"), Some(Decimal::new(50, 2)));
        assert_eq!(parse_price("R$.50"), Some(Decimal::new(50, 2)));
        assert_eq!(parse_price("R$ ,5"), Some(Decimal::new(5, 1)));
    }

    #[test]
    fn test_create_then_list_for_user() {
        let store = Arc::new(KeyValueStore::in_memory());
        let directory = logged_in_directory(&store);
        let mut book = AppointmentBook::new(Arc::clone(&store));

        let created = book.create(&directory, booking("R$42,5"));
        let user_id = directory.current_user().unwrap().id.clone();
        assert_eq!(created.user_id.as_deref(), Some(user_id.as_str()));

        let listed = book.list_for_user(&user_id);
        assert_eq!(listed, vec![created.clone()]);
        assert_eq!(listed[0].status, AppointmentStatus::Scheduled);

        let stored: Vec<Appointment> = store.get(keys::APPOINTMENTS).unwrap();
        assert_eq!(stored, vec![created]);
    }

    #[test]
    fn test_create_without_session_has_no_owner() {
        let store = Arc::new(KeyValueStore::in_memory());
        let directory = UserDirectory::new(Arc::clone(&store));
        let mut book = AppointmentBook::new(Arc::clone(&store));

        let created = book.create(&directory, booking("R$42,5"));
        assert_eq!(created.user_id, None);
        assert!(book.get(&created.id).is_some());
    }

    #[test]
    fn test_list_keeps_insertion_order_and_filters_by_user() {
        let store = Arc::new(KeyValueStore::in_memory());
        let appointments = vec![
            stored_appointment("a", "u1", "R$1", AppointmentStatus::Scheduled),
            stored_appointment("b", "u2", "R$1", AppointmentStatus::Scheduled),
            stored_appointment("c", "u1", "R$1", AppointmentStatus::Cancelled),
        ];
        assert!(store.set(keys::APPOINTMENTS, &appointments));
        let book = AppointmentBook::new(store);

        let ids: Vec<String> = book.list_for_user("u1").into_iter().map(|a| a.id).collect();
        assert_eq!(ids, vec!["a".to_string(), "c".to_string()]);
        assert!(book.list_for_user("nobody").is_empty());
    }

    #[test]
    fn test_cancel_changes_only_status_and_is_idempotent() {
        let store = Arc::new(KeyValueStore::in_memory());
        let directory = logged_in_directory(&store);
        let mut book = AppointmentBook::new(Arc::clone(&store));
        let created = book.create(&directory, booking("R$42,5"));

        assert!(book.cancel(&created.id));
        let after_first = book.get(&created.id).unwrap().clone();
        assert_eq!(after_first.status, AppointmentStatus::Cancelled);
        assert_eq!(
            Appointment { status: AppointmentStatus::Scheduled, ..after_first.clone() },
            created
        );

        assert!(book.cancel(&created.id));
        assert_eq!(book.get(&created.id), Some(&after_first));

        let stored: Vec<Appointment> = store.get(keys::APPOINTMENTS).unwrap();
        assert_eq!(stored[0].status, AppointmentStatus::Cancelled);
    }

    #[test]
    fn test_cancel_unknown_id_is_silent() {
        let store = Arc::new(KeyValueStore::in_memory());
        let mut book = AppointmentBook::new(Arc::clone(&store));
        assert!(!book.cancel("missing"));
        assert!(store.get::<Vec<Appointment>>(keys::APPOINTMENTS).is_none());
    }

    #[test]
    fn test_complete_only_from_scheduled() {
        let store = Arc::new(KeyValueStore::in_memory());
        let appointments = vec![
            stored_appointment("a", "u1", "R$10,00", AppointmentStatus::Scheduled),
            stored_appointment("b", "u1", "R$10,00", AppointmentStatus::Cancelled),
        ];
        assert!(store.set(keys::APPOINTMENTS, &appointments));
        let mut book = AppointmentBook::new(store);

        assert!(book.complete("a"));
        assert_eq!(book.get("a").unwrap().status, AppointmentStatus::Completed);
        assert!(!book.complete("a"));
        assert!(!book.complete("b"));
        assert_eq!(book.get("b").unwrap().status, AppointmentStatus::Cancelled);
        assert!(!book.complete("missing"));
    }

    #[test]
    fn test_stats_sum_completed_and_count_scheduled() {
        let store = Arc::new(KeyValueStore::in_memory());
        let appointments = vec![
            stored_appointment("a", "u1", "R$10,00", AppointmentStatus::Completed),
            stored_appointment("b", "u1", "R$20,00", AppointmentStatus::Scheduled),
        ];
        assert!(store.set(keys::APPOINTMENTS, &appointments));
        let book = AppointmentBook::new(store);

        let stats = book.stats("u1");
        assert_eq!(stats.total, 2);
        assert_eq!(stats.spent, Decimal::new(1000, 2));
        assert_eq!(stats.scheduled, 1);
    }

    #[test]
    fn test_stats_ignore_cancelled_and_unreadable_prices() {
        let store = Arc::new(KeyValueStore::in_memory());
        let appointments = vec![
            stored_appointment("a", "u1", "R$42,5", AppointmentStatus::Completed),
            stored_appointment("b", "u1", "on the house", AppointmentStatus::Completed),
            stored_appointment("c", "u1", "R$99,00", AppointmentStatus::Cancelled),
            stored_appointment("d", "u2", "R$50,00", AppointmentStatus::Completed),
        ];
        assert!(store.set(keys::APPOINTMENTS, &appointments));
        let book = AppointmentBook::new(store);

        let stats = book.stats("u1");
        assert_eq!(stats.total, 3);
        assert_eq!(stats.spent, Decimal::new(425, 1));
        assert_eq!(stats.scheduled, 0);
        assert_eq!(book.stats("nobody"), AppointmentStats::default());
    }
}
