/// ASCπ Kernel v1: Error Types
///
/// Recoverable failures only. Internal logic faults (an operator producing an
/// illegal state) panic in `invariants::validate_invariants` instead.

/// A field value that violates a FieldState invariant.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StateError {
    #[error("[INVARIANT:curvature_non_negative] curvature must be >= 0, got {0}")]
    NegativeCurvature(f64),

    #[error("[INVARIANT:coherence_range] coherence must be in [0, 1], got {0}")]
    CoherenceOutOfRange(f64),

    #[error("[INVARIANT:finite_{field}] {field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("[INVARIANT:phase_range] phase must be in [0, 2π), got {0}")]
    PhaseOutOfRange(f64),

    #[error("[INVARIANT:context_invariant] context changed from {from} to {to} at step {step}")]
    ContextChanged { from: f64, to: f64, step: u64 },

    #[error("[INVARIANT:step_increment] step went from {from} to {to}")]
    StepGap { from: u64, to: u64 },
}

/// Failure to import a FieldState from its flat key/value form.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CodecError {
    #[error("expected a flat object of field values, got {0}")]
    NotAnObject(String),

    #[error("missing field {0:?}")]
    MissingField(&'static str),

    #[error("field {field:?} must be {expected}, got {found}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
        found: String,
    },

    #[error("unknown field {0:?}")]
    UnknownField(String),

    #[error("malformed JSON: {0}")]
    Json(String),

    #[error("invalid state: {0}")]
    Invalid(#[from] StateError),
}

/// Engine configuration and control errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("invalid kernel constants: {0}")]
    InvalidConstants(String),

    #[error("history limit must be at least 1")]
    ZeroHistoryLimit,

    #[error("no split pending: state at step {step} does not split")]
    NoPendingSplit { step: u64 },

    #[error("engine history must contain at least the current state")]
    EmptyHistory,

    #[error(
        "newest history entry (step {history_step}) is not the current state (step {current_step})"
    )]
    HistoryMismatch { current_step: u64, history_step: u64 },

    #[error(transparent)]
    InvalidState(#[from] StateError),
}
