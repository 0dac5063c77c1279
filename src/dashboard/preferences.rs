//! Theme and sign-in flags persisted through a [`KeyValueStore`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::chat::core::errors::ChatResult;
use crate::chat::ports::storage::KeyValueStore;

/// Storage key of the theme.
pub const THEME_KEY: &str = "theme";
/// Storage key of the signed-in session.
pub const AUTH_SESSION_KEY: &str = "auth_session";

/// Colour theme.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    /// Light theme.
    #[default]
    Light,
    /// Dark theme.
    Dark,
}

impl Theme {
    /// The opposite theme.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Light => "light",
            Self::Dark => "dark",
        })
    }
}

/// Signed-in user session.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    /// Bearer token for the backend API.
    pub token: String,
    /// Email of the signed-in user.
    pub email: String,
    /// When the user signed in.
    pub signed_in_at: DateTime<Utc>,
}

/// Persisted client-side preferences.
#[derive(Debug)]
pub struct Preferences<S> {
    store: S,
}

impl<S: KeyValueStore> Preferences<S> {
    /// Wrap a store.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> ChatResult<Option<T>> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                warn!(key, %err, "Ignoring corrupt stored value");
                Ok(None)
            }
        }
    }

    fn save<T: Serialize>(&self, key: &str, value: &T) -> ChatResult<()> {
        self.store.set(key, &serde_json::to_string(value)?)
    }

    /// Current theme; defaults to light.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read.
    pub fn theme(&self) -> ChatResult<Theme> {
        Ok(self.load(THEME_KEY)?.unwrap_or_default())
    }

    /// Persist the theme.
    ///
    /// # Errors
    /// Returns an error if the store cannot be written.
    pub fn set_theme(&self, theme: Theme) -> ChatResult<()> {
        self.save(THEME_KEY, &theme)
    }

    /// Flip and persist the theme. Returns the new theme.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read or written.
    pub fn toggle_theme(&self) -> ChatResult<Theme> {
        let theme = self.theme()?.toggled();
        self.set_theme(theme)?;
        Ok(theme)
    }

    /// Stored session, if signed in.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read.
    pub fn auth_session(&self) -> ChatResult<Option<AuthSession>> {
        self.load(AUTH_SESSION_KEY)
    }

    /// Whether a session is stored.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read.
    pub fn is_signed_in(&self) -> ChatResult<bool> {
        Ok(self.auth_session()?.is_some())
    }

    /// Persist a session.
    ///
    /// # Errors
    /// Returns an error if the store cannot be written.
    pub fn sign_in(&self, session: &AuthSession) -> ChatResult<()> {
        self.save(AUTH_SESSION_KEY, session)?;
        debug!("Stored auth session");
        Ok(())
    }

    /// Forget the stored session. Idempotent.
    ///
    /// # Errors
    /// Returns an error if the store cannot be written.
    pub fn sign_out(&self) -> ChatResult<()> {
        self.store.remove(AUTH_SESSION_KEY)
    }
}
