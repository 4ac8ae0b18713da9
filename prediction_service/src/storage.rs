//! Injected storage interfaces and their implementations
//!
//! The service never touches files directly; it goes through [`UserStore`]
//! and [`HistoryStore`]. The JSON implementations keep one file mapping
//! usernames to credential records and one mapping usernames to their
//! ordered prediction logs, rewritten whole on every change. A missing or
//! unreadable file reads as empty rather than failing the request.

use crate::types::{PredictionRecord, UserRecord};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

/// Errors raised by storage backends
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Key-value store mapping a username to a credential record
pub trait UserStore {
    fn get(&self, username: &str) -> Result<Option<UserRecord>, StorageError>;
    fn put(&self, username: &str, record: &UserRecord) -> Result<(), StorageError>;
}

/// Append-only per-user log of past forecast runs
pub trait HistoryStore {
    /// Append one record to the user's log.
    fn append(&self, username: &str, record: PredictionRecord) -> Result<(), StorageError>;

    /// Read the user's log, oldest first. Unknown users read as empty.
    fn read(&self, username: &str) -> Result<Vec<PredictionRecord>, StorageError>;
}

fn load_map<T: DeserializeOwned>(path: &Path) -> HashMap<String, T> {
    match std::fs::read_to_string(path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_default(),
        Err(_) => HashMap::new(),
    }
}

fn save_map<T: Serialize>(path: &Path, map: &HashMap<String, T>) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let contents = serde_json::to_string_pretty(map)?;
    std::fs::write(path, contents)?;
    Ok(())
}

/// User store backed by a single JSON file
#[derive(Debug, Clone)]
pub struct JsonUserStore {
    path: PathBuf,
}

impl JsonUserStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl UserStore for JsonUserStore {
    fn get(&self, username: &str) -> Result<Option<UserRecord>, StorageError> {
        let users: HashMap<String, UserRecord> = load_map(&self.path);
        Ok(users.get(username).cloned())
    }

    fn put(&self, username: &str, record: &UserRecord) -> Result<(), StorageError> {
        let mut users: HashMap<String, UserRecord> = load_map(&self.path);
        users.insert(username.to_string(), record.clone());
        save_map(&self.path, &users)
    }
}

/// History store backed by a single JSON file
#[derive(Debug, Clone)]
pub struct JsonHistoryStore {
    path: PathBuf,
}

impl JsonHistoryStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl HistoryStore for JsonHistoryStore {
    fn append(&self, username: &str, record: PredictionRecord) -> Result<(), StorageError> {
        let mut histories: HashMap<String, Vec<PredictionRecord>> = load_map(&self.path);
        histories.entry(username.to_string()).or_default().push(record);
        save_map(&self.path, &histories)
    }

    fn read(&self, username: &str) -> Result<Vec<PredictionRecord>, StorageError> {
        let histories: HashMap<String, Vec<PredictionRecord>> = load_map(&self.path);
        Ok(histories.get(username).cloned().unwrap_or_default())
    }
}

/// In-memory user store for tests and examples
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: Mutex<HashMap<String, UserRecord>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserStore for MemoryUserStore {
    fn get(&self, username: &str) -> Result<Option<UserRecord>, StorageError> {
        let users = self.users.lock().expect("user store mutex poisoned");
        Ok(users.get(username).cloned())
    }

    fn put(&self, username: &str, record: &UserRecord) -> Result<(), StorageError> {
        let mut users = self.users.lock().expect("user store mutex poisoned");
        users.insert(username.to_string(), record.clone());
        Ok(())
    }
}

/// In-memory history store for tests and examples
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    histories: Mutex<HashMap<String, Vec<PredictionRecord>>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn append(&self, username: &str, record: PredictionRecord) -> Result<(), StorageError> {
        let mut histories = self.histories.lock().expect("history store mutex poisoned");
        histories.entry(username.to_string()).or_default().push(record);
        Ok(())
    }

    fn read(&self, username: &str) -> Result<Vec<PredictionRecord>, StorageError> {
        let histories = self.histories.lock().expect("history store mutex poisoned");
        Ok(histories.get(username).cloned().unwrap_or_default())
    }
}
