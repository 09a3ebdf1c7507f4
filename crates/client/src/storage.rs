//! Key/value storage engines backing the local stores.
//!
//! The shape follows browser local storage: one opaque string value per
//! named key, whole-value reads and writes, no transactions. Each store
//! serializes its entire collection into a single value, so no
//! partial-write state is ever observable.
//!
//! All operations are best-effort: a failed write is logged and the
//! in-memory effect is lost - callers re-read to detect divergence. Reads of
//! missing or unreadable keys degrade to `None`. Nothing here ever panics or
//! propagates an error to presentation code.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rand::Rng;

use crate::sync::{ChangeBus, StoreEvent};

/// Storage key names, one per persisted collection.
pub mod keys {
    /// Seller-authored listings.
    pub const LISTINGS: &str = "vintly_listings";
    /// Saved/liked products.
    pub const FAVORITES: &str = "vintly_favorites";
    /// Registered user accounts.
    pub const USERS: &str = "vintly_users";
    /// Current user session projection.
    pub const USER_SESSION: &str = "vintly_user_session";
    /// Admin session flag.
    pub const ADMIN_SESSION: &str = "vintly_admin_session";
    /// All messages across conversations.
    pub const MESSAGES: &str = "vintly_messages";
    /// Conversation summaries.
    pub const CONVERSATIONS: &str = "vintly_conversations";
}

/// A synchronous key/value storage engine.
///
/// Implementations publish [`StoreEvent::KeyChanged`] after every successful
/// write so that views in other components observe the mutation - the
/// storage-level notification channel.
pub trait StorageEngine: Send + Sync {
    /// Read the value under `key`. Missing or unreadable keys yield `None`.
    fn get(&self, key: &str) -> Option<String>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str);

    /// Remove the value under `key`. Removing an absent key is a no-op.
    fn remove(&self, key: &str);
}

/// File-backed storage: one file per key inside a profile directory.
///
/// The profile directory plays the role of the browser profile - two
/// sessions pointed at the same directory share state under a
/// last-writer-wins policy, with no conflict detection.
pub struct FileStorage {
    dir: PathBuf,
    bus: ChangeBus,
}

impl FileStorage {
    /// Create a file-backed engine rooted at `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, bus: ChangeBus) -> Self {
        Self {
            dir: dir.into(),
            bus,
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StorageEngine for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(value) => Some(value),
            Err(err) if err.kind() == ErrorKind::NotFound => None,
            Err(err) => {
                tracing::error!(key, %err, "failed to read storage key");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) {
        if let Err(err) = std::fs::create_dir_all(&self.dir) {
            tracing::error!(key, %err, "failed to create storage directory");
            return;
        }
        match std::fs::write(self.path_for(key), value) {
            Ok(()) => self.bus.publish(StoreEvent::KeyChanged(key.to_owned())),
            Err(err) => tracing::error!(key, %err, "failed to write storage key"),
        }
    }

    fn remove(&self, key: &str) {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => self.bus.publish(StoreEvent::KeyChanged(key.to_owned())),
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => tracing::error!(key, %err, "failed to remove storage key"),
        }
    }
}

/// In-memory storage for tests and ephemeral sessions.
pub struct MemoryStorage {
    map: Mutex<HashMap<String, String>>,
    bus: ChangeBus,
}

impl MemoryStorage {
    /// Create an empty in-memory engine.
    #[must_use]
    pub fn new(bus: ChangeBus) -> Self {
        Self {
            map: Mutex::new(HashMap::new()),
            bus,
        }
    }
}

impl StorageEngine for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.map
            .lock()
            .map(|map| map.get(key).cloned())
            .unwrap_or_else(|err| {
                tracing::error!(key, %err, "storage mutex poisoned");
                None
            })
    }

    fn set(&self, key: &str, value: &str) {
        match self.map.lock() {
            Ok(mut map) => {
                map.insert(key.to_owned(), value.to_owned());
                self.bus.publish(StoreEvent::KeyChanged(key.to_owned()));
            }
            Err(err) => tracing::error!(key, %err, "storage mutex poisoned"),
        }
    }

    fn remove(&self, key: &str) {
        match self.map.lock() {
            Ok(mut map) => {
                if map.remove(key).is_some() {
                    self.bus.publish(StoreEvent::KeyChanged(key.to_owned()));
                }
            }
            Err(err) => tracing::error!(key, %err, "storage mutex poisoned"),
        }
    }
}

/// Length of the random portion of generated IDs.
const ID_SUFFIX_LEN: usize = 9;

/// Generate a unique entity ID of the form `<prefix>_<millis>_<suffix>`.
///
/// The millisecond timestamp keeps IDs roughly sortable; the random
/// alphanumeric suffix keeps them unique even within one millisecond.
#[must_use]
pub fn generate_id(prefix: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: String = rand::rng()
        .sample_iter(rand::distr::Alphanumeric)
        .take(ID_SUFFIX_LEN)
        .map(|b| char::from(b.to_ascii_lowercase()))
        .collect();
    format!("{prefix}_{millis}_{suffix}")
}

/// Current time in epoch milliseconds, the `saved_at` stamp format.
#[must_use]
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Resolve the default profile directory for file-backed storage.
///
/// `VINTLY_PROFILE_DIR` overrides; otherwise `.vintly` under the working
/// directory.
#[must_use]
pub fn default_profile_dir() -> PathBuf {
    std::env::var("VINTLY_PROFILE_DIR")
        .map_or_else(|_| Path::new(".vintly").to_path_buf(), PathBuf::from)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_file_storage_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path(), ChangeBus::new());

        assert_eq!(storage.get(keys::LISTINGS), None);
        storage.set(keys::LISTINGS, "[]");
        assert_eq!(storage.get(keys::LISTINGS).as_deref(), Some("[]"));
        storage.remove(keys::LISTINGS);
        assert_eq!(storage.get(keys::LISTINGS), None);
    }

    #[test]
    fn test_file_storage_publishes_key_changed() {
        let dir = tempfile::tempdir().unwrap();
        let bus = ChangeBus::new();
        let mut rx = bus.subscribe();
        let storage = FileStorage::new(dir.path(), bus);

        storage.set(keys::FAVORITES, "[]");

        assert_eq!(
            rx.try_recv().unwrap(),
            StoreEvent::KeyChanged(keys::FAVORITES.to_owned())
        );
    }

    #[test]
    fn test_remove_absent_key_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let bus = ChangeBus::new();
        let mut rx = bus.subscribe();
        let storage = FileStorage::new(dir.path(), bus);

        storage.remove(keys::USERS);

        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new(ChangeBus::new());
        storage.set("k", "v");
        assert_eq!(storage.get("k").as_deref(), Some("v"));
        storage.remove("k");
        assert_eq!(storage.get("k"), None);
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(generate_id("listing")));
        }
    }

    #[test]
    fn test_generated_id_shape() {
        let id = generate_id("listing");
        let mut parts = id.splitn(3, '_');
        assert_eq!(parts.next(), Some("listing"));
        assert!(parts.next().unwrap().parse::<i64>().is_ok());
        assert_eq!(parts.next().unwrap().len(), ID_SUFFIX_LEN);
    }
}
