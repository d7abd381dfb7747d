//! Glyph configuration and isomorphism errors.

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GlyphError {
    #[error("base_scale must be finite and > 0, got {0}")]
    InvalidScale(f64),

    #[error("path_resolution must be at least 2, got {0}")]
    InvalidResolution(usize),

    #[error("invalid glyph config JSON: {0}")]
    Config(String),

    #[error("[ISOMORPHISM:{check}] {detail}")]
    NotIsomorphic { check: &'static str, detail: String },
}
