/// ASCπ Kernel v1: Canonical Hashing
///
/// Deterministic canonical serialization + SHA-256 hashing.
///
/// Rules:
///   - kernel_version first, then the state fields in codec order
///   - trajectories hash the ordered list of canonical states
///   - compact UTF-8 JSON, shortest round-trip float formatting

use sha2::{Digest, Sha256};
use serde_json::{Map, Value};

use crate::codec::to_value;
use crate::domain::FieldState;
use crate::KERNEL_VERSION;

/// Canonical serialization of one state to UTF-8 JSON bytes.
pub fn canonical_serialize(state: &FieldState) -> Vec<u8> {
    let mut root = Map::new();
    root.insert(
        "kernel_version".to_string(),
        Value::Number(KERNEL_VERSION.into()),
    );
    root.insert("state".to_string(), to_value(state));
    Value::Object(root).to_string().into_bytes()
}

/// SHA-256 of the canonical serialization. Lowercase hex.
pub fn canonical_hash(state: &FieldState) -> String {
    hex_digest(&canonical_serialize(state))
}

/// Canonical serialization of an ordered trajectory.
pub fn canonical_serialize_trajectory(states: &[FieldState]) -> Vec<u8> {
    let mut root = Map::new();
    root.insert(
        "kernel_version".to_string(),
        Value::Number(KERNEL_VERSION.into()),
    );
    root.insert(
        "trajectory".to_string(),
        Value::Array(states.iter().map(to_value).collect()),
    );
    Value::Object(root).to_string().into_bytes()
}

/// SHA-256 of the canonical trajectory serialization. Lowercase hex.
pub fn trajectory_hash(states: &[FieldState]) -> String {
    hex_digest(&canonical_serialize_trajectory(states))
}

fn hex_digest(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}
