//! Thread-safe engine handle.
//!
//! `AscpiEngine` is not internally synchronized. `SharedEngine` serializes
//! access with a Mutex: each operation runs under one lock acquisition, so
//! a step and its commit are never interleaved with another caller.

use std::sync::{Mutex, MutexGuard};

use ascpi_kernel::domain::{Branch, FieldState, StepOutcome};
use ascpi_kernel::engine::AscpiEngine;
use ascpi_kernel::error::EngineError;

use crate::snapshot::{take_snapshot, EngineSnapshot};
use crate::snapshot_codec::SnapshotError;

pub struct SharedEngine {
    inner: Mutex<AscpiEngine>,
}

impl SharedEngine {
    pub fn new(engine: AscpiEngine) -> Self {
        Self {
            inner: Mutex::new(engine),
        }
    }

    fn lock(&self) -> MutexGuard<'_, AscpiEngine> {
        self.inner.lock().expect("Engine lock poisoned")
    }

    /// Step under lock.
    pub fn step(&self) -> StepOutcome {
        self.lock().step()
    }

    /// Step and, on a split, commit `branch` under the same lock.
    pub fn step_resolving(&self, branch: Branch) -> Result<FieldState, EngineError> {
        let mut engine = self.lock();
        match engine.step() {
            StepOutcome::Split(..) => engine.resolve_split(branch),
            _ => Ok(*engine.current()),
        }
    }

    pub fn resolve_split(&self, branch: Branch) -> Result<FieldState, EngineError> {
        self.lock().resolve_split(branch)
    }

    pub fn evolve(&self, steps: usize) -> Vec<FieldState> {
        self.lock().evolve(steps)
    }

    pub fn reset(&self, state: FieldState) {
        self.lock().reset(state)
    }

    pub fn current(&self) -> FieldState {
        *self.lock().current()
    }

    pub fn history_len(&self) -> usize {
        self.lock().history_len()
    }

    /// Consistent snapshot: state, history and config read under one lock.
    pub fn snapshot(&self) -> Result<EngineSnapshot, SnapshotError> {
        take_snapshot(&self.lock())
    }

    pub fn into_inner(self) -> AscpiEngine {
        self.inner.into_inner().expect("Engine lock poisoned")
    }
}
