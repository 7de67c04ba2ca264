//! Rendering laid out text onto a drawing backend
//!
//! The renderer never rasterizes: it maps glyph geometry to world space
//! and hands polylines and polygons to a [`DrawBackend`].

use crate::attributes::TextAttributes;
use crate::font::{GlyphShape, GlyphSource};
use crate::geometry::Vec2;
use crate::layout::TextLayout;

/// Drawing capabilities required by the renderer
pub trait DrawBackend {
    /// Pen width for subsequent strokes
    fn set_line_width(&mut self, width: f32);

    fn draw_line(&mut self, start: Vec2, end: Vec2);

    /// Open polyline stroked with the current pen
    fn draw_polyline(&mut self, points: &[Vec2]);

    /// Closed polygon, filled
    fn fill_polyline(&mut self, points: &[Vec2]);

    /// Contours of one glyph filled together.
    ///
    /// Backends that support even-odd or non-zero filling of several
    /// contours should override this so counters (the hole in an `O`)
    /// stay open.
    fn fill_polygon_set(&mut self, contours: &[Vec<Vec2>]) {
        for contour in contours {
            self.fill_polyline(contour);
        }
    }
}

/// Draws text through a [`DrawBackend`]
#[derive(Debug, Clone, Copy)]
pub struct TextRenderer {
    decorations: bool,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self { decorations: true }
    }

    /// Skip overbars and underlines
    pub fn without_decorations(mut self) -> Self {
        self.decorations = false;
        self
    }

    /// Lay out and draw `text`, returning the layout that was drawn
    pub fn draw<B: DrawBackend + ?Sized>(
        &self,
        backend: &mut B,
        font: &dyn GlyphSource,
        text: &str,
        position: Vec2,
        attrs: &TextAttributes,
    ) -> TextLayout {
        let layout = TextLayout::compute(font, text, position, attrs);
        self.draw_layout(backend, font, &layout);
        layout
    }

    /// Draw a previously computed layout
    pub fn draw_layout<B: DrawBackend + ?Sized>(
        &self,
        backend: &mut B,
        font: &dyn GlyphSource,
        layout: &TextLayout,
    ) {
        backend.set_line_width(layout.pen_width);

        for glyph in &layout.glyphs {
            let transform = glyph.transform();

            match font.glyph_shape(glyph.glyph_id) {
                GlyphShape::Strokes(strokes) => {
                    for stroke in strokes {
                        let points: Vec<Vec2> =
                            stroke.iter().map(|&p| transform.apply(p)).collect();
                        match points.as_slice() {
                            [] => {}
                            [dot] => backend.draw_line(*dot, *dot),
                            _ => backend.draw_polyline(&points),
                        }
                    }
                }
                GlyphShape::Contours(contours) => {
                    let world: Vec<Vec<Vec2>> = contours
                        .iter()
                        .map(|contour| contour.points.iter().map(|&p| transform.apply(p)).collect())
                        .collect();
                    if !world.is_empty() {
                        backend.fill_polygon_set(&world);
                    }
                }
            }
        }

        if self.decorations {
            for line in layout.overbars.iter().chain(&layout.underlines) {
                backend.draw_line(line.start, line.end);
            }
        }

        tracing::trace!(
            glyphs = layout.glyphs.len(),
            overbars = layout.overbars.len(),
            underlines = layout.underlines.len(),
            "Rendered text"
        );
    }
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// A recorded drawing call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    SetLineWidth(f32),
    Line { start: Vec2, end: Vec2 },
    Polyline(Vec<Vec2>),
    FilledPolygon(Vec<Vec2>),
}

/// Backend that records every call, for tests and for callers that
/// post-process geometry (plotters, exporters)
#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    commands: Vec<DrawCommand>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take the recorded commands, leaving the recorder empty
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn polylines(&self) -> impl Iterator<Item = &[Vec2]> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Polyline(points) => Some(points.as_slice()),
            _ => None,
        })
    }

    pub fn polygons(&self) -> impl Iterator<Item = &[Vec2]> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::FilledPolygon(points) => Some(points.as_slice()),
            _ => None,
        })
    }

    pub fn lines(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Line { start, end } => Some((*start, *end)),
            _ => None,
        })
    }
}

impl DrawBackend for RecordingBackend {
    fn set_line_width(&mut self, width: f32) {
        self.commands.push(DrawCommand::SetLineWidth(width));
    }

    fn draw_line(&mut self, start: Vec2, end: Vec2) {
        self.commands.push(DrawCommand::Line { start, end });
    }

    fn draw_polyline(&mut self, points: &[Vec2]) {
        self.commands.push(DrawCommand::Polyline(points.to_vec()));
    }

    fn fill_polyline(&mut self, points: &[Vec2]) {
        self.commands.push(DrawCommand::FilledPolygon(points.to_vec()));
    }
}
