//! Snapshot layer: deterministic engine snapshots.
//!
//! A snapshot holds everything `AscpiEngine::restore` needs plus a SHA-256
//! over the canonical JSON of that content. No timestamps in snapshot
//! content (determinism).
//!
//! If a snapshot hash doesn't verify, rebuild the engine by replay.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use ascpi_kernel::domain::{EngineConfig, FieldState};
use ascpi_kernel::engine::AscpiEngine;
use ascpi_kernel::KERNEL_VERSION;

use crate::snapshot_codec::{hex_sha256, SnapshotError};

/// Snapshot on-disk format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineSnapshot {
    /// Kernel version at snapshot time.
    pub kernel_version: u32,
    pub config: EngineConfig,
    pub current: FieldState,
    /// Retained history, oldest first. The last entry is `current`.
    pub history: Vec<FieldState>,
    /// History entries already evicted by the history limit.
    #[serde(default)]
    pub evicted: u64,
    /// SHA-256 of the canonical JSON of every other field.
    pub hash: String,
}

/// Borrowed view of the hashed fields, serialized in a fixed order.
#[derive(Serialize)]
struct HashedContent<'a> {
    kernel_version: u32,
    config: &'a EngineConfig,
    current: &'a FieldState,
    history: &'a [FieldState],
    evicted: u64,
}

impl EngineSnapshot {
    fn content_hash(&self) -> Result<String, SnapshotError> {
        let content = HashedContent {
            kernel_version: self.kernel_version,
            config: &self.config,
            current: &self.current,
            history: &self.history,
            evicted: self.evicted,
        };
        let bytes = serde_json::to_vec(&content).map_err(|e| SnapshotError::Json(e.to_string()))?;
        Ok(hex_sha256(&bytes))
    }

    pub fn step(&self) -> u64 {
        self.current.step()
    }
}

fn snapshot_path(dir: &Path, step: u64) -> PathBuf {
    dir.join(format!("snapshot_{:06}.json", step))
}

/// Capture the engine's current state, retained history and configuration.
pub fn take_snapshot(engine: &AscpiEngine) -> Result<EngineSnapshot, SnapshotError> {
    let mut snap = EngineSnapshot {
        kernel_version: KERNEL_VERSION,
        config: *engine.config(),
        current: *engine.current(),
        history: engine.history(),
        evicted: engine.evicted(),
        hash: String::new(),
    };
    snap.hash = snap.content_hash()?;
    Ok(snap)
}

/// Save a snapshot as `snapshot_NNNNNN.json`, keyed by the current step.
pub fn save_snapshot(dir: &Path, snap: &EngineSnapshot) -> Result<PathBuf, SnapshotError> {
    fs::create_dir_all(dir)?;

    let path = snapshot_path(dir, snap.step());
    let content = serde_json::to_string(snap).map_err(|e| SnapshotError::Json(e.to_string()))?;

    let mut file = File::create(&path)?;
    file.write_all(content.as_bytes())?;
    file.sync_all()?;

    tracing::info!(
        step = snap.step(),
        history = snap.history.len(),
        path = %path.display(),
        "Snapshot saved"
    );
    Ok(path)
}

/// Load the snapshot taken at `step`.
/// Returns None if no snapshot exists at that step.
pub fn load_snapshot(dir: &Path, step: u64) -> Result<Option<EngineSnapshot>, SnapshotError> {
    let path = snapshot_path(dir, step);
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path)?;
    let snap: EngineSnapshot =
        serde_json::from_str(&content).map_err(|e| SnapshotError::Json(e.to_string()))?;
    Ok(Some(snap))
}

/// Load the latest snapshot in a directory.
/// Scans for snapshot_NNNNNN.json files and returns the highest step.
pub fn load_latest_snapshot(dir: &Path) -> Result<Option<EngineSnapshot>, SnapshotError> {
    if !dir.exists() {
        return Ok(None);
    }

    let mut best_step: Option<u64> = None;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let step = name
            .to_string_lossy()
            .strip_prefix("snapshot_")
            .and_then(|s| s.strip_suffix(".json"))
            .and_then(|s| s.parse::<u64>().ok());
        if let Some(step) = step {
            if best_step.map_or(true, |best| step > best) {
                best_step = Some(step);
            }
        }
    }

    match best_step {
        Some(step) => load_snapshot(dir, step),
        None => Ok(None),
    }
}

/// Returns true if the recorded hash matches the snapshot content.
pub fn verify_snapshot_hash(snap: &EngineSnapshot) -> bool {
    snap.content_hash().map_or(false, |computed| computed == snap.hash)
}

/// Rebuild an engine from a snapshot. The hash is checked first, then the
/// kernel validates every state and the history/current agreement.
pub fn restore_engine(snap: &EngineSnapshot) -> Result<AscpiEngine, SnapshotError> {
    let computed = snap.content_hash()?;
    if computed != snap.hash {
        return Err(SnapshotError::HashMismatch {
            recorded: snap.hash.clone(),
            computed,
        });
    }
    Ok(AscpiEngine::restore(
        snap.current,
        snap.history.clone(),
        snap.config,
        snap.evicted,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ascpi_kernel::state::create_canonical_state;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("ascpi_snapshot_tests").join(name);
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn stepped_engine(steps: usize) -> AscpiEngine {
        let mut engine = AscpiEngine::canonical();
        for _ in 0..steps {
            engine.step();
        }
        engine
    }

    #[test]
    fn fresh_snapshot_verifies() {
        let snap = take_snapshot(&stepped_engine(5)).unwrap();
        assert_eq!(snap.kernel_version, KERNEL_VERSION);
        assert_eq!(snap.step(), 5);
        assert_eq!(snap.history.len(), 6);
        assert_eq!(snap.hash.len(), 64);
        assert!(verify_snapshot_hash(&snap));
    }

    #[test]
    fn tampered_snapshot_fails_hash() {
        let mut snap = take_snapshot(&stepped_engine(3)).unwrap();
        snap.history.remove(0);
        assert!(!verify_snapshot_hash(&snap));
        match restore_engine(&snap) {
            Err(SnapshotError::HashMismatch { recorded, .. }) => assert_eq!(recorded, snap.hash),
            other => panic!("Expected HashMismatch, got: {:?}", other),
        }
    }

    #[test]
    fn save_and_load_latest() {
        let dir = temp_dir("save_and_load_latest");
        let mut engine = AscpiEngine::canonical();
        for _ in 0..3 {
            engine.step();
            save_snapshot(&dir, &take_snapshot(&engine).unwrap()).unwrap();
        }
        let latest = load_latest_snapshot(&dir).unwrap().unwrap();
        assert_eq!(latest.step(), 3);
        assert_eq!(load_snapshot(&dir, 2).unwrap().unwrap().step(), 2);
        assert!(load_snapshot(&dir, 99).unwrap().is_none());
    }

    #[test]
    fn missing_dir_has_no_latest() {
        let dir = temp_dir("missing_dir");
        assert!(load_latest_snapshot(&dir).unwrap().is_none());
    }

    #[test]
    fn restore_rejects_valid_hash_over_bad_history() {
        let engine = stepped_engine(2);
        let mut snap = take_snapshot(&engine).unwrap();
        snap.history = vec![create_canonical_state()];
        snap.hash = snap.content_hash().unwrap();
        assert!(verify_snapshot_hash(&snap));
        assert!(matches!(restore_engine(&snap), Err(SnapshotError::Engine(_))));
    }
}
