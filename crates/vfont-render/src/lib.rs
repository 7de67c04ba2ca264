//! vfont Render - Pixmap Backend
//!
//! Draws vfont text into a `tiny_skia::Pixmap`: strokes with round caps and
//! joins, outline glyphs filled even-odd so counters stay open.

use tiny_skia::{FillRule, LineCap, LineJoin, Paint, Path, PathBuilder, Pixmap, Stroke};
use vfont_text::{DrawBackend, Transform2D, Vec2};

/// Color (RGBA)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0 };

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

/// Pixmap backend error types
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Invalid pixmap size: {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;

/// Convert an engine transform to tiny-skia
pub fn to_tiny_skia(t: &Transform2D) -> tiny_skia::Transform {
    tiny_skia::Transform::from_row(t.a, t.b, t.c, t.d, t.e, t.f)
}

/// [`DrawBackend`] drawing into a pixmap
pub struct PixmapBackend {
    pixmap: Pixmap,
    paint: Paint<'static>,
    stroke: Stroke,
    /// World to pixel transform
    view: tiny_skia::Transform,
}

impl PixmapBackend {
    /// Transparent pixmap, black ink, world units equal to pixels
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixmap =
            Pixmap::new(width, height).ok_or(RenderError::InvalidSize { width, height })?;

        let mut paint = Paint::default();
        paint.anti_alias = true;
        paint.set_color(Color::BLACK.to_skia());

        let stroke = Stroke {
            width: 1.0,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };

        tracing::debug!(width, height, "Created pixmap backend");

        Ok(Self {
            pixmap,
            paint,
            stroke,
            view: tiny_skia::Transform::identity(),
        })
    }

    /// Map world coordinates to pixels
    pub fn with_view(mut self, view: &Transform2D) -> Self {
        self.view = to_tiny_skia(view);
        self
    }

    pub fn set_color(&mut self, color: Color) {
        self.paint.set_color(color.to_skia());
    }

    /// Fill the whole pixmap
    pub fn clear(&mut self, color: Color) {
        self.pixmap.fill(color.to_skia());
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }

    /// Number of pixels with non-zero alpha
    pub fn inked_pixels(&self) -> usize {
        self.pixmap.pixels().iter().filter(|p| p.alpha() > 0).count()
    }

    pub fn encode_png(&self) -> Result<Vec<u8>> {
        self.pixmap
            .encode_png()
            .map_err(|err| RenderError::Encode(err.to_string()))
    }

    pub fn save_png(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        self.pixmap
            .save_png(path)
            .map_err(|err| RenderError::Encode(err.to_string()))
    }

    fn stroke_path(&mut self, path: Option<Path>) {
        if let Some(path) = path {
            self.pixmap
                .stroke_path(&path, &self.paint, &self.stroke, self.view, None);
        }
    }

    fn fill_path(&mut self, path: Option<Path>) {
        if let Some(path) = path {
            self.pixmap
                .fill_path(&path, &self.paint, FillRule::EvenOdd, self.view, None);
        }
    }
}

fn open_path(points: &[Vec2]) -> Option<Path> {
    let (first, rest) = points.split_first()?;
    let mut builder = PathBuilder::new();
    builder.move_to(first.x, first.y);
    for p in rest {
        builder.line_to(p.x, p.y);
    }
    builder.finish()
}

fn append_closed(builder: &mut PathBuilder, points: &[Vec2]) {
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    builder.move_to(first.x, first.y);
    for p in rest {
        builder.line_to(p.x, p.y);
    }
    builder.close();
}

impl DrawBackend for PixmapBackend {
    fn set_line_width(&mut self, width: f32) {
        self.stroke.width = width.max(0.0);
    }

    fn draw_line(&mut self, start: Vec2, end: Vec2) {
        let mut builder = PathBuilder::new();
        builder.move_to(start.x, start.y);
        builder.line_to(end.x, end.y);
        self.stroke_path(builder.finish());
    }

    fn draw_polyline(&mut self, points: &[Vec2]) {
        self.stroke_path(open_path(points));
    }

    fn fill_polyline(&mut self, points: &[Vec2]) {
        let mut builder = PathBuilder::new();
        append_closed(&mut builder, points);
        self.fill_path(builder.finish());
    }

    fn fill_polygon_set(&mut self, contours: &[Vec<Vec2>]) {
        let mut builder = PathBuilder::new();
        for contour in contours {
            append_closed(&mut builder, contour);
        }
        self.fill_path(builder.finish());
    }
}

impl std::fmt::Debug for PixmapBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixmapBackend")
            .field("width", &self.pixmap.width())
            .field("height", &self.pixmap.height())
            .field("line_width", &self.stroke.width)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_size_is_rejected() {
        assert!(matches!(
            PixmapBackend::new(0, 10),
            Err(RenderError::InvalidSize { width: 0, height: 10 })
        ));
    }

    #[test]
    fn test_line_inks_pixels() {
        let mut backend = PixmapBackend::new(32, 32).unwrap();
        assert_eq!(backend.inked_pixels(), 0);

        backend.set_line_width(2.0);
        backend.draw_line(Vec2::new(4.0, 16.0), Vec2::new(28.0, 16.0));
        assert!(backend.inked_pixels() > 24);
    }

    #[test]
    fn test_polygon_set_keeps_holes_open() {
        let outer = vec![
            Vec2::new(2.0, 2.0),
            Vec2::new(30.0, 2.0),
            Vec2::new(30.0, 30.0),
            Vec2::new(2.0, 30.0),
        ];
        let inner = vec![
            Vec2::new(10.0, 10.0),
            Vec2::new(22.0, 10.0),
            Vec2::new(22.0, 22.0),
            Vec2::new(10.0, 22.0),
        ];

        let mut backend = PixmapBackend::new(32, 32).unwrap();
        backend.fill_polygon_set(&[outer, inner]);

        let at = |x, y| backend.pixmap().pixel(x, y).map(|p| p.alpha()).unwrap_or(0);
        assert_eq!(at(5, 5), 255);
        assert_eq!(at(16, 16), 0);
    }

    #[test]
    fn test_view_scales_world_units() {
        let mut backend = PixmapBackend::new(40, 40)
            .unwrap()
            .with_view(&Transform2D::scale(10.0, 10.0));
        backend.fill_polyline(&[
            Vec2::new(1.0, 1.0),
            Vec2::new(3.0, 1.0),
            Vec2::new(3.0, 3.0),
            Vec2::new(1.0, 3.0),
        ]);

        let pixel = backend.pixmap().pixel(20, 20).map(|p| p.alpha());
        assert_eq!(pixel, Some(255));
        assert_eq!(backend.pixmap().pixel(35, 35).map(|p| p.alpha()), Some(0));
    }
}
