//! Ledger Storage Layer - File-Based Snapshots
//!
//! The ledger lives in memory; hosts persist it between runs:
//! - `<name>.json` human-readable copy
//! - `<name>.bin` compact bincode copy, preferred on load
//! - restored ledgers are checked for share solvency

use autofee_core::{AutoFeeLedger, LedgerError, LedgerSnapshot};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Snapshot not found: {0}")]
    SnapshotNotFound(String),

    #[error("Ledger error: {0}")]
    LedgerError(#[from] LedgerError),
}

const JSON_EXT: &str = "json";
const BIN_EXT: &str = "bin";

/// Directory of named ledger snapshots
pub struct SnapshotStore {
    data_dir: PathBuf,
}

impl SnapshotStore {
    /// Open (and create if needed) the snapshot directory
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let data_dir = path.as_ref().to_path_buf();
        fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path(&self, name: &str, ext: &str) -> PathBuf {
        self.data_dir.join(format!("{}.{}", name, ext))
    }

    /// Write via a temp file so a crash never leaves a torn snapshot
    fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Persist any serializable value as JSON and bincode
    pub fn save_snapshot<T: Serialize>(&self, name: &str, data: &T) -> Result<(), StorageError> {
        let json = serde_json::to_vec_pretty(data)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        let bin = bincode::serialize(data)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        Self::write_atomic(&self.path(name, JSON_EXT), &json)?;
        Self::write_atomic(&self.path(name, BIN_EXT), &bin)?;
        Ok(())
    }

    /// Load a value saved by [`save_snapshot`](Self::save_snapshot), bincode first
    pub fn load_snapshot<T: DeserializeOwned>(&self, name: &str) -> Result<T, StorageError> {
        let bin_path = self.path(name, BIN_EXT);
        if bin_path.exists() {
            let bytes = fs::read(&bin_path)?;
            return bincode::deserialize(&bytes)
                .map_err(|e| StorageError::SerializationError(e.to_string()));
        }

        let json_path = self.path(name, JSON_EXT);
        if json_path.exists() {
            let bytes = fs::read(&json_path)?;
            return serde_json::from_slice(&bytes)
                .map_err(|e| StorageError::SerializationError(e.to_string()));
        }

        Err(StorageError::SnapshotNotFound(name.to_string()))
    }

    /// Persist the full ledger state under `name`
    pub fn save_ledger(&self, name: &str, ledger: &AutoFeeLedger) -> Result<(), StorageError> {
        let snapshot = ledger.snapshot();
        self.save_snapshot(name, &snapshot)?;
        log::info!(
            "saved ledger snapshot '{}' ({} holders)",
            name,
            snapshot.shares.len()
        );
        Ok(())
    }

    /// Load and verify a ledger saved with [`save_ledger`](Self::save_ledger)
    pub fn load_ledger(&self, name: &str) -> Result<AutoFeeLedger, StorageError> {
        let snapshot: LedgerSnapshot = self.load_snapshot(name)?;
        let ledger = AutoFeeLedger::from_snapshot(snapshot)?;
        log::info!("loaded ledger snapshot '{}'", name);
        Ok(ledger)
    }

    pub fn has_snapshot(&self, name: &str) -> bool {
        self.path(name, BIN_EXT).exists() || self.path(name, JSON_EXT).exists()
    }

    /// Snapshot names, sorted
    pub fn list_snapshots(&self) -> Result<Vec<String>, StorageError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.data_dir)? {
            let path = entry?.path();
            let is_snapshot = matches!(
                path.extension().and_then(|e| e.to_str()),
                Some(JSON_EXT) | Some(BIN_EXT)
            );
            if !is_snapshot {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        names.dedup();
        Ok(names)
    }

    pub fn delete_snapshot(&self, name: &str) -> Result<(), StorageError> {
        for ext in [BIN_EXT, JSON_EXT] {
            let path = self.path(name, ext);
            if path.exists() {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }
}
