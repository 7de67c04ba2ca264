//! Metrics queries
//!
//! Answered from the same scan as [`super::TextLayout`], without placing
//! any glyph.

use crate::attributes::TextAttributes;
use crate::font::GlyphSource;
use crate::geometry::{BoundingBox, Vec2};

use super::{scan, LineFrame, INTERLINE_PITCH_RATIO};

pub use crate::markup::line_count;

/// Distance between consecutive baselines
pub fn interline(glyph_height: f32, line_spacing: f32) -> f32 {
    glyph_height.abs() * line_spacing * INTERLINE_PITCH_RATIO
}

/// Width of the widest line (pen included) by `line_count * interline`
pub fn text_size(font: &dyn GlyphSource, text: &str, attrs: &TextAttributes) -> Vec2 {
    let (_, summary) = scan(font, text, attrs);
    let frame = LineFrame::new(attrs, Vec2::ZERO, &summary);
    Vec2::new(frame.width(), frame.height())
}

/// World-space bounds of the text block anchored at `position`
pub fn text_bounding_box(
    font: &dyn GlyphSource,
    text: &str,
    position: Vec2,
    attrs: &TextAttributes,
) -> BoundingBox {
    let (_, summary) = scan(font, text, attrs);
    LineFrame::new(attrs, position, &summary).bounding_box()
}
