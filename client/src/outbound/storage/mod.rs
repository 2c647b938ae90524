//! Client storage adapters.
//!
//! Both adapters share [`StorageDocument`], the serialised shape of the
//! browser-like storage: a string map plus cookies with absolute expiries.

mod document;
mod file;
mod memory;

pub use document::{StorageDocument, StoredCookie};
pub use file::{FileClientStorage, STORAGE_FILE_NAME};
pub use memory::InMemoryClientStorage;
