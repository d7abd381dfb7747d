#![forbid(unsafe_code)]

//! hexglyph: geometric realization of ASCπ field states.
//!
//! Projects a `FieldState` onto six cyclically arranged channels of a
//! hexagonal 3D structure. The projection is one-way: nothing here feeds
//! back into the kernel.

/// Number of channels in the hexagonal structure.
pub const CHANNEL_COUNT: usize = 6;

pub mod error;
pub mod geometry;
pub mod mapper;
pub mod topology;
pub mod paths;
pub mod glyph;

pub use error::GlyphError;
pub use geometry::{ChannelGeometry, GlyphGeometry, Point3D};
pub use glyph::{geometric_invariants, project, GlyphConfig, Hex3DGlyph};
