#![forbid(unsafe_code)]

//! ASCπ Runtime
//!
//! Wraps the kernel with persistence, replay, snapshots, drift reports and
//! a thread-safe engine handle.
//!
//! No motor logic lives here. All transitions and invariants are delegated
//! to the kernel.

pub mod config;
pub mod drift;
pub mod replay;
pub mod shared;
pub mod snapshot;
pub mod snapshot_codec;

pub use config::RuntimeConfig;
pub use shared::SharedEngine;
pub use snapshot::EngineSnapshot;
pub use snapshot_codec::SnapshotError;
