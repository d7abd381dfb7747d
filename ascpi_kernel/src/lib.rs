#![forbid(unsafe_code)]

//! ASCπ kernel motor: an immutable six-scalar field state evolved by a
//! reflection operator (splitting at `diff == 0`) and an implosion operator
//! (contraction near the fixed point), driven by `engine::AscpiEngine`.

/// Kernel v1. Any behavioral change to the motor law requires a new version.
pub const KERNEL_VERSION: u32 = 1;

pub mod arithmetic;
pub mod error;
pub mod domain;
pub mod state;
pub mod codec;
pub mod transitions;
pub mod invariants;
pub mod analysis;
pub mod hashing;
pub mod engine;

pub use domain::{Branch, EngineConfig, FieldState, KernelConstants, Reflection, StepOutcome};
pub use engine::AscpiEngine;
pub use error::{CodecError, EngineError, StateError};
