//! Snapshot and history persistence

pub mod history_store;

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::shared::errors::AppError;
use crate::shared::types::RunSnapshot;

/// Write the run snapshot, wholly replacing the previous run's file.
pub fn save_snapshot(path: &Path, snapshot: &RunSnapshot) -> Result<(), AppError> {
    write_json_atomic(path, snapshot)
}

// Pretty JSON, written next to the target and renamed over it so a killed
// run never leaves a half-written file behind.
fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::StorageError(format!("create {}: {}", parent.display(), e)))?;
        }
    }
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::StorageError(format!("serialize {}: {}", path.display(), e)))?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json)
        .map_err(|e| AppError::StorageError(format!("write {}: {}", tmp.display(), e)))?;
    fs::rename(&tmp, path)
        .map_err(|e| AppError::StorageError(format!("replace {}: {}", path.display(), e)))?;
    Ok(())
}
