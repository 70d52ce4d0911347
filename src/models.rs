// src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Time label given to every notification created at runtime.
pub const JUST_NOW: &str = "Just now";

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String, // plaintext, this is a demo directory
    pub created_at: DateTime<Utc>,
}

/// Registration input, already validated by the caller.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

impl User {
    pub fn from_registration(candidate: NewUser) -> Self {
        Self {
            id: new_id(),
            name: candidate.name,
            email: candidate.email,
            phone: candidate.phone,
            password: candidate.password,
            created_at: Utc::now(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        };
        f.write_str(label)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    #[serde(default)]
    pub user_id: Option<String>, // weak reference to User.id
    pub date: String,
    pub time: String,
    pub specialist: String,
    pub service: String,
    pub price: String, // display string, e.g. "R$42,5"
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub date: String,
    pub time: String,
    pub specialist: String,
    pub service: String,
    pub price: String,
}

impl Appointment {
    pub fn new(user_id: Option<String>, data: NewAppointment) -> Self {
        Self {
            id: new_id(),
            user_id,
            date: data.date,
            time: data.time,
            specialist: data.specialist,
            service: data.service,
            price: data.price,
            status: AppointmentStatus::Scheduled,
            created_at: Utc::now(),
        }
    }
}

/// Notification category. The set is open: kinds this build does not know
/// about are kept verbatim in `Other`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum NotificationKind {
    Confirmed,
    Reminder,
    Promotion,
    Other(String),
}

impl From<String> for NotificationKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "confirmed" => NotificationKind::Confirmed,
            "reminder" => NotificationKind::Reminder,
            "promotion" => NotificationKind::Promotion,
            _ => NotificationKind::Other(value),
        }
    }
}

impl From<NotificationKind> for String {
    fn from(kind: NotificationKind) -> Self {
        kind.as_str().to_string()
    }
}

impl NotificationKind {
    pub fn as_str(&self) -> &str {
        match self {
            NotificationKind::Confirmed => "confirmed",
            NotificationKind::Reminder => "reminder",
            NotificationKind::Promotion => "promotion",
            NotificationKind::Other(other) => other,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub time: String, // display label, not a timestamp
    pub read: bool,
}

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn new(payload: NewNotification) -> Self {
        Self {
            id: new_id(),
            kind: payload.kind,
            title: payload.title,
            message: payload.message,
            time: JUST_NOW.to_string(),
            read: false,
        }
    }
}
