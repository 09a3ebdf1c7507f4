//! User store: demo account registration and the current-session projection.
//!
//! This is demo-grade authentication: the credential is kept verbatim next
//! to the account record and checked by comparison. The session projection
//! written under its own key never carries the credential, and it is the
//! only thing route guards consult. There is no expiry and no server-side
//! validation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vintly_core::{Email, EmailError, UserId};

use crate::storage::{StorageEngine, generate_id, keys};
use crate::sync::{ChangeBus, StoreEvent};

use super::{read_collection, read_value, write_collection, write_value};

/// The session-facing user projection. Never contains the credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The registered account record, credential included.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredUser {
    #[serde(flatten)]
    user: User,
    password: String,
}

/// Profile fields a signed-in user may edit.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub avatar: Option<String>,
}

/// Errors surfaced by sign-up and sign-in.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The email is already registered (compared case-insensitively).
    #[error("An account with this email already exists")]
    DuplicateEmail,
    /// Email/password pair did not match any account.
    #[error("Invalid email or password")]
    InvalidCredentials,
    /// The email is not structurally valid.
    #[error(transparent)]
    InvalidEmail(#[from] EmailError),
}

/// Repository for registered users and the current session.
///
/// There is exactly zero or one current session per storage profile.
#[derive(Clone)]
pub struct UserStore {
    engine: Arc<dyn StorageEngine>,
    bus: ChangeBus,
}

impl UserStore {
    /// Create a user store over the given engine and bus.
    #[must_use]
    pub fn new(engine: Arc<dyn StorageEngine>, bus: ChangeBus) -> Self {
        Self { engine, bus }
    }

    /// The currently signed-in user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        read_value(self.engine.as_ref(), keys::USER_SESSION)
    }

    /// Whether a user session exists.
    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.current_user().is_some()
    }

    /// Register a new account and sign it in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email is malformed and
    /// `AuthError::DuplicateEmail` if the email is already registered
    /// (case-insensitive); no account is created in either case.
    pub fn sign_up(&self, name: &str, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email)?;

        let mut users: Vec<StoredUser> = read_collection(self.engine.as_ref(), keys::USERS);
        if users.iter().any(|u| u.user.email.eq_ignore_case(email.as_str())) {
            return Err(AuthError::DuplicateEmail);
        }

        let user = User {
            id: UserId::new(generate_id("user")),
            name: name.to_owned(),
            email,
            avatar: Some(default_avatar_url(name)),
            created_at: Utc::now(),
        };

        users.push(StoredUser {
            user: user.clone(),
            password: password.to_owned(),
        });
        write_collection(self.engine.as_ref(), keys::USERS, &users);

        // Auto login after signup: session projection only, no credential.
        write_value(self.engine.as_ref(), keys::USER_SESSION, &user);
        self.bus.publish(StoreEvent::AuthChanged);

        Ok(user)
    }

    /// Sign in with an email (case-insensitive) and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` on any mismatch; the error
    /// does not distinguish an unknown email from a wrong password.
    pub fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let users: Vec<StoredUser> = read_collection(self.engine.as_ref(), keys::USERS);

        let account = users
            .into_iter()
            .find(|u| u.user.email.eq_ignore_case(email) && u.password == password)
            .ok_or(AuthError::InvalidCredentials)?;

        write_value(self.engine.as_ref(), keys::USER_SESSION, &account.user);
        self.bus.publish(StoreEvent::AuthChanged);

        Ok(account.user)
    }

    /// Clear the current session.
    pub fn sign_out(&self) {
        self.engine.remove(keys::USER_SESSION);
        self.bus.publish(StoreEvent::AuthChanged);
    }

    /// Update the signed-in user's profile, both in the session projection
    /// and in the registered-accounts collection. No-op when signed out.
    pub fn update_profile(&self, patch: UserPatch) {
        let Some(mut user) = self.current_user() else {
            return;
        };

        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(avatar) = patch.avatar {
            user.avatar = Some(avatar);
        }

        write_value(self.engine.as_ref(), keys::USER_SESSION, &user);

        let mut users: Vec<StoredUser> = read_collection(self.engine.as_ref(), keys::USERS);
        if let Some(stored) = users.iter_mut().find(|u| u.user.id == user.id) {
            let password = stored.password.clone();
            *stored = StoredUser {
                user: user.clone(),
                password,
            };
            write_collection(self.engine.as_ref(), keys::USERS, &users);
        }

        self.bus.publish(StoreEvent::AuthChanged);
    }
}

/// Placeholder avatar for accounts created without a photo.
fn default_avatar_url(name: &str) -> String {
    format!(
        "https://ui-avatars.com/api/?name={}&background=C4A484&color=1a1a1a",
        urlencoding::encode(name)
    )
}
