//! Sprite slot cache for oriterm's glyph texture atlas.
//!
//! Maps each distinct glyph appearance (character, bold/italic, combining
//! marks, wide-character half) to a fixed `(x, y, z)` cell in a GPU texture
//! array, and queues newly assigned cells for rasterization once per frame.
//! Rasterization, shaping and the GPU upload itself live in the renderer.

#![deny(unsafe_code)]

pub mod atlas;
pub mod cell;
pub mod config;
pub mod error;
pub mod key;

pub use atlas::{
    AtlasCursor, AtlasLayout, AtlasLimits, GlyphAtlasCache, RenderCommand, SpritePosition,
    TableStats,
};
pub use cell::{CellFlags, CellGlyph};
pub use config::AtlasConfig;
pub use error::AtlasError;
pub use key::{CombiningMarks, GlyphStyle, RenderingKey};
