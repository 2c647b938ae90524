//! Process-local client storage.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use mockable::Clock;

use super::document::{StorageDocument, StoredCookie};
use crate::domain::ports::{ClientStorageError, CookieStore, KeyValueStore};

/// Storage that lives for as long as the process.
pub struct InMemoryClientStorage {
    clock: Arc<dyn Clock>,
    document: Mutex<StorageDocument>,
}

impl InMemoryClientStorage {
    /// Empty storage judging cookie expiry against `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_document(clock, StorageDocument::default())
    }

    /// Storage pre-populated with `document`.
    pub fn with_document(clock: Arc<dyn Clock>, document: StorageDocument) -> Self {
        Self {
            clock,
            document: Mutex::new(document),
        }
    }

    /// Copy of everything stored, expired cookies included.
    pub fn document(&self) -> StorageDocument {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, StorageDocument> {
        self.document.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for InMemoryClientStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, ClientStorageError> {
        Ok(self.lock().local.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), ClientStorageError> {
        self.lock().local.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), ClientStorageError> {
        self.lock().local.remove(key);
        Ok(())
    }
}

impl CookieStore for InMemoryClientStorage {
    fn get(&self, name: &str) -> Result<Option<String>, ClientStorageError> {
        Ok(self.lock().live_cookie(name, self.clock.utc()))
    }

    fn set(
        &self,
        name: &str,
        value: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), ClientStorageError> {
        let mut document = self.lock();
        document.prune_expired(self.clock.utc());
        document.cookies.insert(
            name.to_owned(),
            StoredCookie {
                value: value.to_owned(),
                expires_at,
            },
        );
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<(), ClientStorageError> {
        self.lock().cookies.remove(name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MutableClock;
    use chrono::TimeDelta;
    use rstest::rstest;

    #[rstest]
    fn items_can_be_set_read_and_removed() {
        let storage = InMemoryClientStorage::new(Arc::new(MutableClock::fixed()));

        storage.set_item("k", "v").expect("set");
        assert_eq!(storage.get_item("k").expect("get").as_deref(), Some("v"));

        storage.remove_item("k").expect("remove");
        storage.remove_item("k").expect("second remove");
        assert_eq!(storage.get_item("k").expect("get"), None);
    }

    #[rstest]
    fn cookie_disappears_once_expired() {
        let clock = Arc::new(MutableClock::fixed());
        let storage = InMemoryClientStorage::new(clock.clone());
        storage
            .set("auth", "authenticated", clock.utc() + TimeDelta::days(7))
            .expect("set cookie");

        clock.advance_days(6);
        assert_eq!(
            storage.get("auth").expect("get").as_deref(),
            Some("authenticated")
        );

        clock.advance_days(1);
        assert_eq!(storage.get("auth").expect("get"), None);
    }
}
