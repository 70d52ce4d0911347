// src/lib.rs
//! Salon booking: users, appointments and notifications kept in a local
//! key-value store.
pub mod appointments;
pub mod calendar;
pub mod config;
pub mod context;
pub mod directory;
pub mod error;
pub mod models;
pub mod notifications;
pub mod preferences;
pub mod store;
pub mod validation;

pub use context::SalonContext;
