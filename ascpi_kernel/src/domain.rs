/// ASCπ Kernel v1: Core Domain Types
///
/// Pure data. No transition logic lives here.
/// Construction and validation live in `state`, import/export in `codec`.

use serde::{Deserialize, Serialize};

use crate::arithmetic::DIFF_STAR;
use crate::error::EngineError;

// ── Field state ────────────────────────────────────────────────────

/// Canonical field state Ψ = (diff, curvature, phase, coherence, context, step).
///
/// Immutable: fields are private to the crate and every transition builds a
/// new value. Equality is exact on all six fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct FieldState {
    pub(crate) diff: f64,
    pub(crate) curvature: f64,
    pub(crate) phase: f64,
    pub(crate) coherence: f64,
    pub(crate) context: f64,
    pub(crate) step: u64,
}

impl FieldState {
    /// Primary driving scalar, unbounded and signed.
    pub fn diff(&self) -> f64 {
        self.diff
    }

    /// Curvature, always `>= 0`.
    pub fn curvature(&self) -> f64 {
        self.curvature
    }

    /// Phase in `[0, 2π)`.
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Coherence in `[0, 1]`.
    pub fn coherence(&self) -> f64 {
        self.coherence
    }

    /// Context value, carried unchanged through every transition.
    pub fn context(&self) -> f64 {
        self.context
    }

    /// Discrete step counter.
    pub fn step(&self) -> u64 {
        self.step
    }
}

// ── Operator results ───────────────────────────────────────────────

/// Which successor of a split to follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Branch {
    /// `diff = +curvature`, phase advanced by one.
    Positive,
    /// `diff = -curvature`, phase retreated by one.
    Negative,
}

/// Result of the reflection operator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reflection {
    Single(FieldState),
    Split(FieldState, FieldState),
}

impl Reflection {
    pub fn is_split(&self) -> bool {
        matches!(self, Reflection::Split(..))
    }

    /// The single successor, or the positive branch of a split.
    pub fn first(&self) -> FieldState {
        match self {
            Reflection::Single(s) => *s,
            Reflection::Split(positive, _) => *positive,
        }
    }

    /// Select a split branch. A single successor is returned for either branch.
    pub fn branch(&self, branch: Branch) -> FieldState {
        match (self, branch) {
            (Reflection::Single(s), _) => *s,
            (Reflection::Split(positive, _), Branch::Positive) => *positive,
            (Reflection::Split(_, negative), Branch::Negative) => *negative,
        }
    }

    pub fn successors(&self) -> Vec<FieldState> {
        match self {
            Reflection::Single(s) => vec![*s],
            Reflection::Split(a, b) => vec![*a, *b],
        }
    }
}

/// Outcome of one engine step: implosion, committed reflection, or an
/// uncommitted split awaiting `AscpiEngine::resolve_split`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    Imploded(FieldState),
    Reflected(FieldState),
    Split(FieldState, FieldState),
}

impl StepOutcome {
    /// The state committed by this step, if any.
    pub fn committed(&self) -> Option<FieldState> {
        match self {
            StepOutcome::Imploded(s) | StepOutcome::Reflected(s) => Some(*s),
            StepOutcome::Split(..) => None,
        }
    }

    pub fn operator(&self) -> &'static str {
        match self {
            StepOutcome::Imploded(_) => "implosion",
            StepOutcome::Reflected(_) => "reflection",
            StepOutcome::Split(..) => "split",
        }
    }
}

// ── Constants ──────────────────────────────────────────────────────

/// All motor-law parameters. Loadable from JSON; missing keys take defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KernelConstants {
    pub target_diff: f64,
    pub coherence_gain: f64,
    pub coherence_decay: f64,
    pub split_damping: f64,
    pub implosion_coherence: f64,
    pub implosion_diff: f64,
    pub implosion_curvature: f64,
    pub contraction_factor: f64,
    pub implosion_coherence_step: f64,
    pub equivalence_tolerance: f64,
}

impl Default for KernelConstants {
    fn default() -> Self {
        Self {
            target_diff: DIFF_STAR,
            coherence_gain: 0.1,
            coherence_decay: 0.05,
            split_damping: 0.9,
            implosion_coherence: 0.95,
            implosion_diff: 0.01,
            implosion_curvature: 0.1,
            contraction_factor: 0.8,
            implosion_coherence_step: 0.1,
            equivalence_tolerance: 1e-6,
        }
    }
}

impl KernelConstants {
    /// Reject constants that would let an operator leave the state space.
    pub fn validate(&self) -> Result<(), EngineError> {
        let named = [
            ("target_diff", self.target_diff),
            ("coherence_gain", self.coherence_gain),
            ("coherence_decay", self.coherence_decay),
            ("split_damping", self.split_damping),
            ("implosion_coherence", self.implosion_coherence),
            ("implosion_diff", self.implosion_diff),
            ("implosion_curvature", self.implosion_curvature),
            ("contraction_factor", self.contraction_factor),
            ("implosion_coherence_step", self.implosion_coherence_step),
            ("equivalence_tolerance", self.equivalence_tolerance),
        ];
        for (name, value) in named {
            if !value.is_finite() {
                return Err(EngineError::InvalidConstants(format!(
                    "{} must be finite, got {}",
                    name, value
                )));
            }
            if name != "target_diff" && value < 0.0 {
                return Err(EngineError::InvalidConstants(format!(
                    "{} must be >= 0, got {}",
                    name, value
                )));
            }
        }
        for (name, value) in [
            ("split_damping", self.split_damping),
            ("contraction_factor", self.contraction_factor),
        ] {
            if !(value > 0.0 && value < 1.0) {
                return Err(EngineError::InvalidConstants(format!(
                    "{} must be in (0, 1), got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Parse constants from JSON and validate them.
    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        let constants: KernelConstants = serde_json::from_str(json)
            .map_err(|e| EngineError::InvalidConstants(e.to_string()))?;
        constants.validate()?;
        Ok(constants)
    }
}

/// Engine configuration: motor-law constants plus the optional history cap.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub constants: KernelConstants,
    /// Maximum retained history entries; `None` keeps everything.
    pub history_limit: Option<usize>,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        self.constants.validate()?;
        if self.history_limit == Some(0) {
            return Err(EngineError::ZeroHistoryLimit);
        }
        Ok(())
    }
}
