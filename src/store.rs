//! Credential store module
//!
//! Persists `{username, password_hash}` records and rejects duplicate hashes.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default store file, relative to the working directory.
pub const DEFAULT_STORE_PATH: &str = "passwords.json";

/// A persisted username and the hex digest of its password.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub username: String,
    pub password_hash: String,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read credential store {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write credential store {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Credential store {path} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Failed to serialize credential records: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Storage backend for credential records.
///
/// Implementors provide a full load and a full rewrite. The duplicate check and
/// append are built on top and reload the records on every call; nothing is
/// cached between operations.
pub trait CredentialStore: Send + Sync {
    /// Returns every record in insertion order. An absent store is empty.
    fn load(&self) -> Result<Vec<CredentialRecord>, StoreError>;

    /// Replaces the whole store with `records`.
    fn persist(&self, records: &[CredentialRecord]) -> Result<(), StoreError>;

    /// Returns `true` if any record carries `hash`.
    fn exists_by_hash(&self, hash: &str) -> Result<bool, StoreError> {
        Ok(self.load()?.iter().any(|r| r.password_hash == hash))
    }

    /// Appends `{username, hash}` unless a record with `hash` already exists.
    ///
    /// Returns `false` without writing on a duplicate. Usernames may repeat.
    /// Load, check and rewrite are not atomic across processes.
    fn append_if_absent(&self, username: &str, hash: &str) -> Result<bool, StoreError> {
        let mut records = self.load()?;
        if records.iter().any(|r| r.password_hash == hash) {
            #[cfg(feature = "tracing")]
            tracing::warn!("Duplicate password hash rejected for user {:?}", username);
            return Ok(false);
        }

        records.push(CredentialRecord {
            username: username.to_string(),
            password_hash: hash.to_string(),
        });
        self.persist(&records)?;

        #[cfg(feature = "tracing")]
        tracing::info!(
            "Credential registered for user {:?} ({} records)",
            username,
            records.len()
        );

        Ok(true)
    }
}

/// Returns the store file path.
///
/// Priority:
/// 1. Environment variable `PWD_STORE_PATH`
/// 2. Default path `./passwords.json`
pub fn get_store_path() -> PathBuf {
    std::env::var("PWD_STORE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_STORE_PATH))
}

/// Store backed by a single JSON array file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Opens the store at [`get_store_path`].
    pub fn from_env() -> Self {
        Self::new(get_store_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for JsonFileStore {
    fn default() -> Self {
        Self::new(DEFAULT_STORE_PATH)
    }
}

impl CredentialStore for JsonFileStore {
    fn load(&self) -> Result<Vec<CredentialRecord>, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                #[cfg(feature = "tracing")]
                tracing::error!("Credential store read FAILED: {:?}: {}", self.path, source);
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_str(&content).map_err(|source| {
            #[cfg(feature = "tracing")]
            tracing::error!("Credential store parse FAILED: {:?}: {}", self.path, source);
            StoreError::Malformed {
                path: self.path.clone(),
                source,
            }
        })
    }

    fn persist(&self, records: &[CredentialRecord]) -> Result<(), StoreError> {
        let content = serde_json::to_string(records)?;
        std::fs::write(&self.path, content).map_err(|source| {
            #[cfg(feature = "tracing")]
            tracing::error!("Credential store write FAILED: {:?}: {}", self.path, source);
            StoreError::Write {
                path: self.path.clone(),
                source,
            }
        })
    }
}

/// In-memory store, for tests and callers that do not want disk I/O.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<CredentialRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<CredentialRecord>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }
}

impl CredentialStore for MemoryStore {
    fn load(&self) -> Result<Vec<CredentialRecord>, StoreError> {
        let guard = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(guard.clone())
    }

    fn persist(&self, records: &[CredentialRecord]) -> Result<(), StoreError> {
        let mut guard = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = records.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    /// Helper to safely set env var in tests
    fn set_env(key: &str, value: &str) {
        // SAFETY: This is only for testing purposes in single-threaded test context
        unsafe { std::env::set_var(key, value); }
    }

    /// Helper to safely remove env var in tests
    fn remove_env(key: &str) {
        // SAFETY: This is only for testing purposes in single-threaded test context
        unsafe { std::env::remove_var(key); }
    }

    fn store_in(dir: &TempDir) -> JsonFileStore {
        JsonFileStore::new(dir.path().join("passwords.json"))
    }

    fn record(username: &str, hash: &str) -> CredentialRecord {
        CredentialRecord {
            username: username.to_string(),
            password_hash: hash.to_string(),
        }
    }

    #[test]
    #[serial]
    fn test_get_store_path_default() {
        remove_env("PWD_STORE_PATH");

        let path = get_store_path();
        assert_eq!(path, PathBuf::from("passwords.json"));
    }

    #[test]
    #[serial]
    fn test_get_store_path_from_env() {
        let custom_path = "/custom/path/passwords.json";
        set_env("PWD_STORE_PATH", custom_path);

        assert_eq!(get_store_path(), PathBuf::from(custom_path));
        assert_eq!(JsonFileStore::from_env().path(), Path::new(custom_path));

        remove_env("PWD_STORE_PATH");
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = store_in(&dir);

        assert_eq!(store.load().unwrap(), Vec::new());
        assert!(!store.exists_by_hash("abc").unwrap());
        assert!(!store.path().exists(), "read must not create the file");
    }

    #[test]
    fn test_load_malformed_file_is_error() {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
        write!(temp_file, "{{not json").expect("Failed to write");

        let store = JsonFileStore::new(temp_file.path());
        assert!(matches!(store.load(), Err(StoreError::Malformed { .. })));
        assert!(matches!(
            store.append_if_absent("alice", "abc"),
            Err(StoreError::Malformed { .. })
        ));
    }

    #[test]
    fn test_load_wrong_shape_is_error() {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
        write!(temp_file, r#"[{{"username": "alice"}}]"#).expect("Failed to write");

        let store = JsonFileStore::new(temp_file.path());
        assert!(matches!(store.load(), Err(StoreError::Malformed { .. })));
    }

    #[test]
    fn test_load_reads_existing_format() {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let content = concat!(
            r#"[{"username": "alice", "password_hash": "aa"}, "#,
            r#"{"username": "bob", "password_hash": "bb"}]"#
        );
        write!(temp_file, "{}", content).expect("Failed to write");

        let store = JsonFileStore::new(temp_file.path());
        assert_eq!(
            store.load().unwrap(),
            vec![record("alice", "aa"), record("bob", "bb")]
        );
        assert!(store.exists_by_hash("bb").unwrap());
        assert!(!store.exists_by_hash("cc").unwrap());
    }

    #[test]
    fn test_append_creates_file_and_round_trips() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = store_in(&dir);

        assert!(store.append_if_absent("alice", "aa").unwrap());
        assert!(store.path().exists());
        assert_eq!(store.load().unwrap(), vec![record("alice", "aa")]);

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{ "username": "alice", "password_hash": "aa" }])
        );
    }

    #[test]
    fn test_append_rejects_duplicate_hash() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = store_in(&dir);

        assert!(store.append_if_absent("alice", "aa").unwrap());
        assert!(!store.append_if_absent("bob", "aa").unwrap());

        let records = store.load().unwrap();
        assert_eq!(records, vec![record("alice", "aa")]);
    }

    #[test]
    fn test_append_allows_repeated_username() {
        let store = MemoryStore::new();

        assert!(store.append_if_absent("alice", "aa").unwrap());
        assert!(store.append_if_absent("alice", "bb").unwrap());
        assert_eq!(
            store.load().unwrap(),
            vec![record("alice", "aa"), record("alice", "bb")]
        );
    }

    #[test]
    fn test_append_preserves_order() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = store_in(&dir);

        for (user, hash) in [("c", "3"), ("a", "1"), ("b", "2")] {
            assert!(store.append_if_absent(user, hash).unwrap());
        }
        let hashes: Vec<_> = store
            .load()
            .unwrap()
            .into_iter()
            .map(|r| r.password_hash)
            .collect();
        assert_eq!(hashes, ["3", "1", "2"]);
    }

    #[test]
    fn test_load_after_external_delete_is_empty() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = store_in(&dir);

        assert!(store.append_if_absent("alice", "aa").unwrap());
        std::fs::remove_file(store.path()).unwrap();

        assert_eq!(store.load().unwrap(), Vec::new());
    }

    #[test]
    fn test_no_caching_between_operations() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let first = store_in(&dir);
        let second = store_in(&dir);

        assert!(first.append_if_absent("alice", "aa").unwrap());
        assert!(second.exists_by_hash("aa").unwrap());
        assert!(!second.append_if_absent("bob", "aa").unwrap());
    }

    #[test]
    fn test_write_failure_is_reported() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = JsonFileStore::new(dir.path().join("missing").join("passwords.json"));

        assert!(matches!(
            store.append_if_absent("alice", "aa"),
            Err(StoreError::Write { .. })
        ));
    }

    #[test]
    fn test_memory_store_with_records() {
        let store = MemoryStore::with_records(vec![record("alice", "aa")]);

        assert!(store.exists_by_hash("aa").unwrap());
        assert!(!store.append_if_absent("bob", "aa").unwrap());
        assert_eq!(store.load().unwrap().len(), 1);
    }
}
