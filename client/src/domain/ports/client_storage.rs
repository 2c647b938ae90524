//! Ports for durable client-side storage.
//!
//! A browser exposes two stores the session relies on: a key-value store for
//! the serialized profile and a cookie jar for the authentication marker. Both
//! are synchronous and process-wide.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors raised by client storage adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientStorageError {
    /// The backing store could not be opened or read.
    #[error("client storage unavailable: {message}")]
    Unavailable { message: String },
    /// A write or removal could not be completed.
    #[error("client storage write failed: {message}")]
    Write { message: String },
}

impl ClientStorageError {
    /// Helper for read-side failures.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Helper for write-side failures.
    pub fn write(message: impl Into<String>) -> Self {
        Self::Write {
            message: message.into(),
        }
    }
}

/// Persistent string key-value store, the analogue of `localStorage`.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    fn get_item(&self, key: &str) -> Result<Option<String>, ClientStorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<(), ClientStorageError>;

    /// Remove `key`; removing an absent key succeeds.
    fn remove_item(&self, key: &str) -> Result<(), ClientStorageError>;
}

/// Cookie jar with per-cookie expiry.
///
/// Adapters must treat a cookie whose expiry has passed as absent.
#[cfg_attr(test, mockall::automock)]
pub trait CookieStore: Send + Sync {
    /// Read the cookie named `name` if it exists and has not expired.
    fn get(&self, name: &str) -> Result<Option<String>, ClientStorageError>;

    /// Set the cookie `name` to `value` until `expires_at`.
    fn set(
        &self,
        name: &str,
        value: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), ClientStorageError>;

    /// Remove the cookie; removing an absent cookie succeeds.
    fn remove(&self, name: &str) -> Result<(), ClientStorageError>;
}
