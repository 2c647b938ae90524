//! Serialised contents of client storage.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cookie value with its absolute expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCookie {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl StoredCookie {
    /// Whether the cookie is still readable at `now`.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// Everything a client store persists.
///
/// # Examples
/// ```
/// use conectahc::outbound::storage::StorageDocument;
///
/// let document: StorageDocument = serde_json::from_str(r#"{"local":{},"cookies":{}}"#)
///     .expect("valid document");
/// assert!(document.local.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageDocument {
    #[serde(default)]
    pub local: BTreeMap<String, String>,
    #[serde(default)]
    pub cookies: BTreeMap<String, StoredCookie>,
}

impl StorageDocument {
    /// Value of the cookie `name` when it has not expired at `now`.
    pub fn live_cookie(&self, name: &str, now: DateTime<Utc>) -> Option<String> {
        self.cookies
            .get(name)
            .filter(|cookie| cookie.is_live_at(now))
            .map(|cookie| cookie.value.clone())
    }

    /// Drop every cookie that has expired at `now`.
    pub fn prune_expired(&mut self, now: DateTime<Utc>) {
        self.cookies.retain(|_, cookie| cookie.is_live_at(now));
    }
}
