//! vfont Text - Vector Text Rendering Engine
//!
//! Turns marked-up text plus style attributes into drawable geometry:
//! - Stroke fonts: an embedded simplex table or vector font files
//! - Outline fonts: TrueType/OpenType via ttf-parser, shaped with rustybuzz
//! - Markup: overbars, super/subscripts, tabs and line breaks
//! - Layout: justification, mirroring, italic, rotation and metrics
//! - Rendering through a pluggable drawing backend

pub mod attributes;
pub mod font;
pub mod geometry;
pub mod layout;
pub mod markup;
pub mod render;

pub use attributes::{HorizontalJustify, TextAttributes, VerticalJustify};
pub use font::{FontConfig, FontKind, GlyphSource, OutlineFont, StrokeFont, StrokeGlyph, TextFont};
pub use geometry::{BoundingBox, Transform2D, Vec2};
pub use layout::{text_bounding_box, text_size, GlyphPlacement, TextLayout};
pub use markup::{convert_backslash_overbars, tokenize, StyledToken};
pub use render::{DrawBackend, DrawCommand, RecordingBackend, TextRenderer};

/// Text engine error types
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    #[error("Font not found: {0}")]
    FontNotFound(String),

    #[error("Failed to parse font: {0}")]
    FontParsing(String),

    #[error("Unsupported font format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid font file {path}: {reason}")]
    InvalidFontFile { path: String, reason: String },
}

pub type Result<T> = std::result::Result<T, TextError>;
