//! Text style attributes
//!
//! The style descriptor callers hand to layout and rendering.

use serde::{Deserialize, Serialize};

use crate::geometry::Vec2;
use crate::layout::BOLD_FACTOR;

/// Horizontal justification relative to the anchor position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HorizontalJustify {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical justification relative to the anchor position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerticalJustify {
    Top,
    Center,
    #[default]
    Bottom,
}

/// Complete text style
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextAttributes {
    /// Glyph size (x = width, y = height). A negative x mirrors the text.
    pub glyph_size: Vec2,
    /// Pen width used to stroke glyphs and decorations
    pub thickness: f32,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub mirrored: bool,
    pub horizontal_justify: HorizontalJustify,
    pub vertical_justify: VerticalJustify,
    /// Rotation in radians, counter-clockwise on screen
    pub rotation: f32,
    /// Multiplier applied to the interline pitch
    pub line_spacing: f32,
}

impl Default for TextAttributes {
    fn default() -> Self {
        Self {
            glyph_size: Vec2::new(1.0, 1.0),
            thickness: 0.1,
            bold: false,
            italic: false,
            underline: false,
            mirrored: false,
            horizontal_justify: HorizontalJustify::Left,
            vertical_justify: VerticalJustify::Bottom,
            rotation: 0.0,
            line_spacing: 1.0,
        }
    }
}

impl TextAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.glyph_size = Vec2::new(width, height);
        self
    }

    pub fn with_thickness(mut self, thickness: f32) -> Self {
        self.thickness = thickness;
        self
    }

    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    pub fn underline(mut self, underline: bool) -> Self {
        self.underline = underline;
        self
    }

    pub fn mirrored(mut self, mirrored: bool) -> Self {
        self.mirrored = mirrored;
        self
    }

    pub fn justify(mut self, h: HorizontalJustify, v: VerticalJustify) -> Self {
        self.horizontal_justify = h;
        self.vertical_justify = v;
        self
    }

    pub fn with_rotation(mut self, radians: f32) -> Self {
        self.rotation = radians;
        self
    }

    /// Rotation given in degrees
    pub fn with_rotation_deg(self, degrees: f32) -> Self {
        self.with_rotation(degrees.to_radians())
    }

    pub fn with_line_spacing(mut self, spacing: f32) -> Self {
        self.line_spacing = spacing;
        self
    }

    /// Pen width actually used for strokes; bold thickens the pen only.
    pub fn pen_width(&self) -> f32 {
        if self.bold {
            self.thickness * BOLD_FACTOR
        } else {
            self.thickness
        }
    }

    /// Whether glyphs are drawn mirrored, from either the flag or a
    /// negative glyph width.
    pub fn is_mirrored(&self) -> bool {
        self.mirrored != (self.glyph_size.x < 0.0)
    }

    /// Glyph size with the sign of x stripped
    pub fn abs_glyph_size(&self) -> Vec2 {
        Vec2::new(self.glyph_size.x.abs(), self.glyph_size.y)
    }
}
