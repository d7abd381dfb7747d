//! Snapshot Codec: FieldState and trajectory file encoding.
//!
//! Pure codec layer over the kernel's flat state format.
//!
//! - `export_state_to_file` / `import_state_from_file`: one state per file
//! - `export_trajectory_to_file` / `import_trajectory_from_file`: JSON array
//! - `snapshot_hash`: SHA-256 of the encoded state (lowercase hex)

use std::fs;
use std::io;
use std::path::Path;

use sha2::{Digest, Sha256};
use serde_json::Value;

use ascpi_kernel::codec::{decode_state, encode_state, from_value, to_value};
use ascpi_kernel::domain::FieldState;
use ascpi_kernel::error::{CodecError, EngineError};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// All possible snapshot failures.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("state decode failed: {0}")]
    Codec(#[from] CodecError),

    #[error("malformed snapshot JSON: {0}")]
    Json(String),

    #[error("snapshot hash mismatch: recorded {recorded}, computed {computed}")]
    HashMismatch { recorded: String, computed: String },

    #[error("snapshot does not restore: {0}")]
    Engine(#[from] EngineError),
}

// ---------------------------------------------------------------------------
// Single state
// ---------------------------------------------------------------------------

/// Write a state as flat JSON. Creates parent directories if needed.
/// Byte-for-byte identical across identical states.
pub fn export_state_to_file(state: &FieldState, path: &Path) -> Result<(), SnapshotError> {
    write_creating_dirs(path, encode_state(state).as_bytes())
}

/// Read and validate a state written by `export_state_to_file`.
pub fn import_state_from_file(path: &Path) -> Result<FieldState, SnapshotError> {
    let content = fs::read_to_string(path)?;
    Ok(decode_state(&content)?)
}

// ---------------------------------------------------------------------------
// Trajectories
// ---------------------------------------------------------------------------

/// Write a trajectory as a JSON array of flat states.
pub fn export_trajectory_to_file(states: &[FieldState], path: &Path) -> Result<(), SnapshotError> {
    let array = Value::Array(states.iter().map(to_value).collect());
    write_creating_dirs(path, array.to_string().as_bytes())
}

/// Read a trajectory. Every element is validated; the first bad one fails
/// the whole import.
pub fn import_trajectory_from_file(path: &Path) -> Result<Vec<FieldState>, SnapshotError> {
    let content = fs::read_to_string(path)?;
    let value: Value =
        serde_json::from_str(&content).map_err(|e| SnapshotError::Json(e.to_string()))?;
    let items = value
        .as_array()
        .ok_or_else(|| SnapshotError::Json("trajectory must be a JSON array".to_string()))?;
    let mut states = Vec::with_capacity(items.len());
    for item in items {
        states.push(from_value(item)?);
    }
    Ok(states)
}

// ---------------------------------------------------------------------------
// Hash
// ---------------------------------------------------------------------------

/// SHA-256 of the flat JSON encoding. Matches the hash of an exported file.
///
/// Differs from `ascpi_kernel::hashing::canonical_hash`, which also binds
/// the kernel version.
pub fn snapshot_hash(state: &FieldState) -> String {
    hex_sha256(encode_state(state).as_bytes())
}

pub(crate) fn hex_sha256(bytes: &[u8]) -> String {
    Sha256::digest(bytes).iter().map(|b| format!("{:02x}", b)).collect()
}

fn write_creating_dirs(path: &Path, bytes: &[u8]) -> Result<(), SnapshotError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
