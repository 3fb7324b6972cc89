//! Durable current-role slot.
//!
//! A single string-valued key that survives process restarts. The trait is
//! deliberately tiny so hosts can back it with whatever they have (browser
//! local storage via a shim, a dotfile, a config service).

use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Key under which the current role identifier is persisted. Hosts that
/// watch the slot for external modification should key on this.
pub const CURRENT_ROLE_KEY: &str = "lendfin.current_role";

/// Durable slot I/O failure.
///
/// Read failures at startup are recoverable (the session falls back to its
/// default role); write failures abort the role change and keep prior state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("failed to read role slot: {0}")]
    Read(String),

    #[error("failed to write role slot: {0}")]
    Write(String),

    #[error("role slot contains malformed data: {0}")]
    Malformed(String),
}

/// The durable key-value slot holding the current role identifier.
///
/// `load` returns `Ok(None)` when the slot has never been written. Whether a
/// loaded value names a real role is the session's problem, not the store's.
pub trait RoleStore: Send + Sync {
    fn load(&self) -> Result<Option<String>, StoreError>;

    fn save(&self, role: &str) -> Result<(), StoreError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// In-memory store
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory slot for tests and dev hosts. Shared via `Arc` to simulate a
/// durable slot surviving a "restart" (a fresh session over the same store).
#[derive(Debug, Default)]
pub struct InMemoryRoleStore {
    slot: Mutex<Option<String>>,
}

impl InMemoryRoleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate the slot, e.g. to simulate a previous run.
    pub fn seeded(role: &str) -> Self {
        Self {
            slot: Mutex::new(Some(role.to_string())),
        }
    }
}

impl RoleStore for InMemoryRoleStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        let slot = self
            .slot
            .lock()
            .map_err(|_| StoreError::Read("slot lock poisoned".to_string()))?;
        Ok(slot.clone())
    }

    fn save(&self, role: &str) -> Result<(), StoreError> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| StoreError::Write("slot lock poisoned".to_string()))?;
        *slot = Some(role.to_string());
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// JSON file store
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
struct SlotFile {
    current_role: String,
}

/// File-backed slot, one small JSON document. Suitable for desktop hosts.
#[derive(Debug)]
pub struct JsonFileRoleStore {
    path: PathBuf,
}

impl JsonFileRoleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RoleStore for JsonFileRoleStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(StoreError::Read(err.to_string())),
        };

        let slot: SlotFile =
            serde_json::from_str(&raw).map_err(|err| StoreError::Malformed(err.to_string()))?;
        Ok(Some(slot.current_role))
    }

    fn save(&self, role: &str) -> Result<(), StoreError> {
        let slot = SlotFile {
            current_role: role.to_string(),
        };
        let raw = serde_json::to_string_pretty(&slot)
            .map_err(|err| StoreError::Write(err.to_string()))?;
        std::fs::write(&self.path, raw).map_err(|err| StoreError::Write(err.to_string()))
    }
}
