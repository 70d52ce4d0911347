// src/directory.rs
use crate::error::{DirectoryError, DirectoryResult};
use crate::models::{NewUser, User};
use crate::store::{keys, KeyValueStore};
use log;
use std::sync::Arc;

/// Registered users and the single active session.
///
/// Both are read from the store once, at construction. Every mutation
/// writes the whole collection back.
pub struct UserDirectory {
    store: Arc<KeyValueStore>,
    users: Vec<User>,
    session: Option<User>,
}

impl UserDirectory {
    pub fn new(store: Arc<KeyValueStore>) -> Self {
        let users: Vec<User> = store.get(keys::USERS).unwrap_or_default();
        let session: Option<User> = store.get(keys::CURRENT_USER);
        log::debug!(
            "Loaded {} users, session active: {}",
            users.len(),
            session.is_some()
        );
        Self {
            store,
            users,
            session,
        }
    }

    /// Adds a new user. Does not log them in.
    pub fn register(&mut self, candidate: NewUser) -> DirectoryResult<User> {
        if self.users.iter().any(|u| u.email == candidate.email) {
            log::warn!("Registration rejected, email already in use: {}", candidate.email);
            return Err(DirectoryError::DuplicateEmail);
        }

        let user = User::from_registration(candidate);
        self.users.push(user.clone());
        if !self.store.set(keys::USERS, &self.users) {
            log::warn!("User {} registered in memory but not persisted", user.id);
        }
        log::info!("Registered user {} ({})", user.id, user.email);
        Ok(user)
    }

    pub fn login(&mut self, email: &str, password: &str) -> DirectoryResult<User> {
        let user = self
            .users
            .iter()
            .find(|u| u.email == email && u.password == password)
            .cloned()
            .ok_or_else(|| {
                log::warn!("Failed login attempt for {}", email);
                DirectoryError::InvalidCredentials
            })?;

        if !self.store.set(keys::CURRENT_USER, &user) {
            log::warn!("Session for {} is not persisted", user.id);
        }
        log::info!("User {} logged in", user.id);
        self.session = Some(user.clone());
        Ok(user)
    }

    pub fn logout(&mut self) {
        if let Some(user) = self.session.take() {
            log::info!("User {} logged out", user.id);
        }
        self.store.remove(keys::CURRENT_USER);
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.session.as_ref()
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }
}
