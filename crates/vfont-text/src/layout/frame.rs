//! Mapping from line-relative text space to world space
//!
//! Each line is justified on its own. Mirroring negates the local x axis,
//! so mirrored text is the exact mirror image of the unmirrored text about
//! the anchor. Rotation is applied last, about the anchor.

use crate::attributes::{HorizontalJustify, TextAttributes, VerticalJustify};
use crate::geometry::{BoundingBox, Transform2D, Vec2};

use super::{DecorationLine, LayoutSummary, PlacedGlyph, Segment, ITALIC_TILT};

/// World placement of one glyph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphPlacement {
    pub glyph_id: u32,
    pub line: usize,
    /// World position of the glyph origin
    pub position: Vec2,
    /// Glyph units to text units; x is negative when mirrored
    pub scale: Vec2,
    /// Rotation in radians
    pub rotation: f32,
    /// Italic shear factor, sign follows the mirroring
    pub shear: f32,
    pub overbar: bool,
}

impl GlyphPlacement {
    /// Transform from glyph units to world space
    pub fn transform(&self) -> Transform2D {
        Transform2D::scale(self.scale.x, self.scale.y)
            .then(Transform2D::shear_x(-self.shear))
            .then(Transform2D::rotate(self.rotation))
            .then(Transform2D::translate(self.position.x, self.position.y))
    }

    /// Map a glyph-space point to world space
    pub fn to_world(&self, point: Vec2) -> Vec2 {
        self.transform().apply(point)
    }
}

/// Justified, mirrored and rotated frame of a block of lines
#[derive(Debug, Clone)]
pub struct LineFrame {
    position: Vec2,
    rotation: Transform2D,
    rotation_angle: f32,
    /// +1, or -1 when mirrored
    direction: f32,
    /// Justified left edge of each line, before the direction is applied
    line_lefts: Vec<f32>,
    pen: f32,
    line_widths: Vec<f32>,
    /// Local y of the first baseline
    first_baseline: f32,
    interline: f32,
    glyph_size: Vec2,
    shear: f32,
}

impl LineFrame {
    pub fn new(attrs: &TextAttributes, position: Vec2, summary: &LayoutSummary) -> Self {
        let size = attrs.abs_glyph_size();
        let pen = attrs.pen_width();
        let interline = super::interline(size.y, attrs.line_spacing);
        let italic_extra = if attrs.italic { ITALIC_TILT * size.y } else { 0.0 };

        let line_widths: Vec<f32> = summary
            .line_extents
            .iter()
            .map(|extent| extent + pen + italic_extra)
            .collect();

        let line_lefts = line_widths
            .iter()
            .map(|&width| horizontal_offset(attrs.horizontal_justify, width))
            .collect();

        let line_count = line_widths.len().max(1);
        let extra = (line_count - 1) as f32 * interline;
        let first_baseline = match attrs.vertical_justify {
            VerticalJustify::Top => size.y,
            VerticalJustify::Center => size.y / 2.0 - extra / 2.0,
            VerticalJustify::Bottom => -extra,
        };

        let direction = if attrs.is_mirrored() { -1.0 } else { 1.0 };
        let shear = if attrs.italic { direction * ITALIC_TILT } else { 0.0 };

        Self {
            position,
            rotation: Transform2D::rotate(attrs.rotation),
            rotation_angle: attrs.rotation,
            direction,
            line_lefts,
            pen,
            line_widths,
            first_baseline,
            interline,
            glyph_size: size,
            shear,
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_widths.len().max(1)
    }

    pub fn line_widths(&self) -> &[f32] {
        &self.line_widths
    }

    pub fn interline(&self) -> f32 {
        self.interline
    }

    /// Width of the widest line
    pub fn width(&self) -> f32 {
        self.line_widths.iter().copied().fold(0.0, f32::max)
    }

    pub fn height(&self) -> f32 {
        self.line_count() as f32 * self.interline
    }

    fn baseline(&self, line: usize) -> f32 {
        self.first_baseline + line as f32 * self.interline
    }

    /// Local (unrotated, anchor-relative) position of a text-space point
    pub fn local(&self, line: usize, x: f32, y: f32) -> Vec2 {
        let origin = self.line_lefts.get(line).copied().unwrap_or(0.0) + self.pen / 2.0;
        Vec2::new(self.direction * (origin + x), self.baseline(line) + y)
    }

    /// World position of a text-space point
    pub fn world(&self, line: usize, x: f32, y: f32) -> Vec2 {
        self.position + self.rotation.apply(self.local(line, x, y))
    }

    pub fn place(&self, glyph: &PlacedGlyph) -> GlyphPlacement {
        GlyphPlacement {
            glyph_id: glyph.glyph_id,
            line: glyph.line,
            position: self.world(glyph.line, glyph.x, glyph.y),
            scale: Vec2::new(
                self.direction * glyph.scale * self.glyph_size.x,
                glyph.scale * self.glyph_size.y,
            ),
            rotation: self.rotation_angle,
            shear: self.shear,
            overbar: glyph.overbar,
        }
    }

    pub fn segment(&self, segment: &Segment) -> DecorationLine {
        DecorationLine {
            start: self.world(segment.line, segment.start, segment.y),
            end: self.world(segment.line, segment.end, segment.y),
        }
    }

    /// Rotated bounds of every line box.
    ///
    /// A line box spans its full width and one interline, starting one
    /// glyph height above its baseline.
    pub fn bounding_box(&self) -> BoundingBox {
        let mut bbox = BoundingBox::empty();

        let lines = self.line_lefts.iter().zip(&self.line_widths).enumerate();
        for (line, (&left, &width)) in lines {
            let (min_x, max_x) = if self.direction < 0.0 {
                (-(left + width), -left)
            } else {
                (left, left + width)
            };
            let top = self.baseline(line) - self.glyph_size.y;

            let local = BoundingBox::new(
                Vec2::new(min_x, top),
                Vec2::new(max_x, top + self.interline),
            );
            for corner in local.corners() {
                bbox.include(self.position + self.rotation.apply(corner));
            }
        }

        bbox
    }
}

fn horizontal_offset(justify: HorizontalJustify, width: f32) -> f32 {
    match justify {
        HorizontalJustify::Left => 0.0,
        HorizontalJustify::Center => -width / 2.0,
        HorizontalJustify::Right => -width,
    }
}
