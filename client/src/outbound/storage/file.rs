//! Client storage persisted as a JSON file.
//!
//! The whole [`StorageDocument`] is rewritten on every mutation through a
//! temporary file and rename, so a crash never leaves a half-written session
//! behind. Reads are served from the copy loaded at open time; the adapter
//! assumes it is the file's only writer.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::{Dir, OpenOptions};
use chrono::{DateTime, Utc};
use mockable::Clock;
use tracing::{debug, warn};

use super::document::{StorageDocument, StoredCookie};
use crate::domain::ports::{ClientStorageError, CookieStore, KeyValueStore};

/// File name used inside the storage directory.
pub const STORAGE_FILE_NAME: &str = "client-storage.json";

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Storage that survives process restarts.
pub struct FileClientStorage {
    dir: Dir,
    path: Utf8PathBuf,
    clock: Arc<dyn Clock>,
    document: Mutex<StorageDocument>,
}

impl FileClientStorage {
    /// Open (creating if needed) the storage directory `root`.
    ///
    /// A missing file starts empty. An unreadable document is logged and
    /// replaced, since a corrupted store is equivalent to no session.
    pub fn open(root: &Utf8Path, clock: Arc<dyn Clock>) -> Result<Self, ClientStorageError> {
        Dir::create_ambient_dir_all(root, ambient_authority()).map_err(|err| {
            ClientStorageError::unavailable(format!("cannot create {root}: {err}"))
        })?;
        let dir = Dir::open_ambient_dir(root, ambient_authority())
            .map_err(|err| ClientStorageError::unavailable(format!("cannot open {root}: {err}")))?;
        let path = root.join(STORAGE_FILE_NAME);

        let document = match dir.read_to_string(STORAGE_FILE_NAME) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|error| {
                warn!(%error, %path, "client storage unreadable; starting empty");
                StorageDocument::default()
            }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => StorageDocument::default(),
            Err(err) => {
                return Err(ClientStorageError::unavailable(format!(
                    "cannot read {path}: {err}"
                )));
            }
        };
        debug!(%path, entries = document.local.len(), "client storage opened");

        Ok(Self {
            dir,
            path,
            clock,
            document: Mutex::new(document),
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, StorageDocument> {
        self.document.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `change` to a copy of the document, persist it, then publish it.
    fn mutate(
        &self,
        change: impl FnOnce(&mut StorageDocument),
    ) -> Result<(), ClientStorageError> {
        let mut document = self.lock();
        let mut next = document.clone();
        change(&mut next);
        next.prune_expired(self.clock.utc());

        let contents = serde_json::to_string_pretty(&next)
            .map_err(|err| ClientStorageError::write(format!("cannot encode storage: {err}")))?;
        write_atomic(&self.dir, STORAGE_FILE_NAME, &contents).map_err(|err| {
            ClientStorageError::write(format!("cannot write {}: {err}", self.path))
        })?;
        *document = next;
        Ok(())
    }
}

impl KeyValueStore for FileClientStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, ClientStorageError> {
        Ok(self.lock().local.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), ClientStorageError> {
        self.mutate(|document| {
            document.local.insert(key.to_owned(), value.to_owned());
        })
    }

    fn remove_item(&self, key: &str) -> Result<(), ClientStorageError> {
        if !self.lock().local.contains_key(key) {
            return Ok(());
        }
        self.mutate(|document| {
            document.local.remove(key);
        })
    }
}

impl CookieStore for FileClientStorage {
    fn get(&self, name: &str) -> Result<Option<String>, ClientStorageError> {
        Ok(self.lock().live_cookie(name, self.clock.utc()))
    }

    fn set(
        &self,
        name: &str,
        value: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), ClientStorageError> {
        self.mutate(|document| {
            document.cookies.insert(
                name.to_owned(),
                StoredCookie {
                    value: value.to_owned(),
                    expires_at,
                },
            );
        })
    }

    fn remove(&self, name: &str) -> Result<(), ClientStorageError> {
        if !self.lock().cookies.contains_key(name) {
            return Ok(());
        }
        self.mutate(|document| {
            document.cookies.remove(name);
        })
    }
}

/// Write `contents` to `file_name` in `dir` via a hidden temporary sibling.
fn write_atomic(dir: &Dir, file_name: &str, contents: &str) -> io::Result<()> {
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let tmp_name = format!(".{file_name}.tmp.{}.{counter}", std::process::id());

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let written = dir.open_with(&tmp_name, &options).and_then(|mut file| {
        file.write_all(contents.as_bytes())?;
        file.sync_all()
    });
    if let Err(err) = written.and_then(|()| replace(dir, &tmp_name, file_name)) {
        // Best-effort cleanup; the original error is what matters.
        drop(dir.remove_file(&tmp_name));
        return Err(err);
    }

    if dir.open(".").and_then(|parent| parent.sync_all()).is_err() {
        debug!("storage directory sync skipped");
    }
    Ok(())
}

#[cfg(windows)]
fn replace(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    // Windows rename fails if the target exists.
    match dir.remove_file(target_name) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    dir.rename(tmp_name, dir, target_name)
}

#[cfg(not(windows))]
fn replace(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    dir.rename(tmp_name, dir, target_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MutableClock;
    use chrono::TimeDelta;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn root() -> (TempDir, Utf8PathBuf) {
        let temp = TempDir::new().expect("temp dir");
        let path = Utf8PathBuf::from_path_buf(temp.path().join("storage")).expect("utf8 path");
        (temp, path)
    }

    #[rstest]
    fn values_survive_reopening(root: (TempDir, Utf8PathBuf)) {
        let (_temp, path) = root;
        let clock = Arc::new(MutableClock::fixed());

        let storage = FileClientStorage::open(&path, clock.clone()).expect("open");
        storage.set_item("conectahc_user", "{}").expect("set item");
        storage
            .set("conectahc_auth", "authenticated", clock.utc() + TimeDelta::days(7))
            .expect("set cookie");
        drop(storage);

        let reopened = FileClientStorage::open(&path, clock).expect("reopen");
        assert_eq!(
            reopened.get_item("conectahc_user").expect("get").as_deref(),
            Some("{}")
        );
        assert_eq!(
            reopened.get("conectahc_auth").expect("get").as_deref(),
            Some("authenticated")
        );
    }

    #[rstest]
    fn expired_cookie_reads_as_absent_after_reopen(root: (TempDir, Utf8PathBuf)) {
        let (_temp, path) = root;
        let clock = Arc::new(MutableClock::fixed());
        let storage = FileClientStorage::open(&path, clock.clone()).expect("open");
        storage
            .set("conectahc_auth", "authenticated", clock.utc() + TimeDelta::days(7))
            .expect("set cookie");
        drop(storage);

        clock.advance_days(8);
        let reopened = FileClientStorage::open(&path, clock).expect("reopen");
        assert_eq!(reopened.get("conectahc_auth").expect("get"), None);
    }

    #[rstest]
    fn corrupted_file_starts_empty(root: (TempDir, Utf8PathBuf)) {
        let (_temp, path) = root;
        std::fs::create_dir_all(&path).expect("create dir");
        std::fs::write(path.join(STORAGE_FILE_NAME), "{oops").expect("write garbage");

        let storage =
            FileClientStorage::open(&path, Arc::new(MutableClock::fixed())).expect("open");

        assert_eq!(storage.get_item("conectahc_user").expect("get"), None);
    }

    #[rstest]
    fn removal_rewrites_the_file(root: (TempDir, Utf8PathBuf)) {
        let (_temp, path) = root;
        let storage =
            FileClientStorage::open(&path, Arc::new(MutableClock::fixed())).expect("open");
        storage.set_item("k", "v").expect("set");
        storage.remove_item("k").expect("remove");

        let contents = std::fs::read_to_string(storage.path()).expect("read storage file");
        let document: StorageDocument = serde_json::from_str(&contents).expect("json");
        assert!(document.local.is_empty());
    }
}
