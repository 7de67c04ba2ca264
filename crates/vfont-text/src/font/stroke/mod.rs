//! Stroke fonts
//!
//! A stroke font is a table of glyphs indexed by `codepoint - ' '`. Each
//! glyph is a list of pen strokes (open polylines) in normalized glyph
//! space plus a declared advance width.

mod decode;
mod embedded;

use std::path::Path;

use crate::font::{FontKind, GlyphShape, GlyphSource, ShapedGlyph};
use crate::geometry::{BoundingBox, Vec2};
use crate::{Result, TextError};

pub use decode::{
    decode_glyph, is_continuation_line, parse_vector_font, FILE_RECORD_HEADER, FONT_OFFSET,
    STROKE_FONT_SCALE,
};

/// First code point stored in a stroke table
pub const FIRST_CODEPOINT: char = ' ';

/// Character substituted for code points outside the table
pub const FALLBACK_CHAR: char = '?';

/// A single stroke glyph
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeGlyph {
    strokes: Vec<Vec<Vec2>>,
    width: f32,
    bbox: BoundingBox,
}

impl StrokeGlyph {
    pub fn new(strokes: Vec<Vec<Vec2>>, width: f32) -> Self {
        let bbox = compute_bounding_box(&strokes, width);
        Self {
            strokes,
            width,
            bbox,
        }
    }

    /// Pen strokes, each an ordered point sequence
    pub fn strokes(&self) -> &[Vec<Vec2>] {
        &self.strokes
    }

    /// Declared advance width in glyph units
    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.bbox
    }

    pub fn point_count(&self) -> usize {
        self.strokes.iter().map(Vec::len).sum()
    }
}

/// Bounding box of a stroke glyph.
///
/// The X extent is the declared advance `[0, width]`, not the ink
/// extent; the Y extent spans the stroke points.
pub fn compute_bounding_box(strokes: &[Vec<Vec2>], width: f32) -> BoundingBox {
    let mut min_y = f32::INFINITY;
    let mut max_y = f32::NEG_INFINITY;

    for point in strokes.iter().flatten() {
        min_y = min_y.min(point.y);
        max_y = max_y.max(point.y);
    }

    if min_y > max_y {
        min_y = 0.0;
        max_y = 0.0;
    }

    BoundingBox::new(Vec2::new(0.0, min_y), Vec2::new(width, max_y))
}

/// A stroke font table
#[derive(Debug, Clone)]
pub struct StrokeFont {
    name: String,
    glyphs: Vec<StrokeGlyph>,
    max_advance: f32,
}

impl StrokeFont {
    /// The embedded default font.
    ///
    /// Decoded on first use and shared for the rest of the process;
    /// concurrent first callers observe a single construction.
    pub fn embedded() -> &'static StrokeFont {
        embedded::default_font()
    }

    /// Build a font from headerless glyph records, one per code point
    /// starting at `' '`.
    pub fn from_records<'a>(
        name: impl Into<String>,
        records: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self> {
        let glyphs = records
            .into_iter()
            .map(|record| decode_glyph(record.as_bytes()))
            .collect();
        Self::from_glyphs(name, glyphs)
    }

    /// Build a font from decoded glyphs
    pub fn from_glyphs(name: impl Into<String>, glyphs: Vec<StrokeGlyph>) -> Result<Self> {
        let name = name.into();
        if glyphs.is_empty() {
            return Err(TextError::InvalidFontFile {
                path: name,
                reason: "no glyphs".into(),
            });
        }

        Ok(Self::with_glyphs(name, glyphs))
    }

    /// Callers guarantee `glyphs` is not empty
    fn with_glyphs(name: String, glyphs: Vec<StrokeGlyph>) -> Self {
        let max_advance = glyphs.iter().map(StrokeGlyph::width).fold(0.0, f32::max);

        Self {
            name,
            glyphs,
            max_advance,
        }
    }

    /// Load a line-oriented vector font file
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let text = std::fs::read_to_string(path).map_err(|source| {
            tracing::warn!(path = %path_str, error = %source, "Cannot open vector font file");
            if source.kind() == std::io::ErrorKind::NotFound {
                TextError::FontNotFound(path_str.clone())
            } else {
                TextError::Io {
                    path: path_str.clone(),
                    source,
                }
            }
        })?;

        let glyphs = parse_vector_font(&text);
        tracing::debug!(path = %path_str, glyphs = glyphs.len(), "Loaded vector font file");

        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or(path_str);
        Self::from_glyphs(name, glyphs)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of glyphs in the table
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn glyph(&self, index: usize) -> Option<&StrokeGlyph> {
        self.glyphs.get(index)
    }

    /// Table index for a character, substituting `'?'` (or `' '` for a
    /// tab) when the character is outside the table.
    pub fn resolve_index(&self, c: char) -> usize {
        if let Some(index) = self.table_index(c) {
            return index;
        }

        let substitute = if c == '\t' { ' ' } else { FALLBACK_CHAR };
        // A table too short for the substitute falls back to its first glyph
        self.table_index(substitute).unwrap_or(0)
    }

    /// Glyph for a character; never fails
    pub fn resolve(&self, c: char) -> &StrokeGlyph {
        &self.glyphs[self.resolve_index(c)]
    }

    fn table_index(&self, c: char) -> Option<usize> {
        let index = (c as u32).checked_sub(FIRST_CODEPOINT as u32)? as usize;
        (index < self.glyphs.len()).then_some(index)
    }
}

impl GlyphSource for StrokeFont {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> FontKind {
        FontKind::Stroke
    }

    fn shape(&self, text: &str) -> Vec<ShapedGlyph> {
        text.char_indices()
            .map(|(cluster, c)| {
                let index = self.resolve_index(c);
                ShapedGlyph {
                    glyph_id: index as u32,
                    advance: self.glyphs[index].width(),
                    offset: Vec2::ZERO,
                    cluster,
                }
            })
            .collect()
    }

    fn max_advance(&self) -> f32 {
        self.max_advance
    }

    fn glyph_shape(&self, glyph_id: u32) -> GlyphShape<'_> {
        let strokes = self
            .glyphs
            .get(glyph_id as usize)
            .map(StrokeGlyph::strokes)
            .unwrap_or(&[]);
        GlyphShape::Strokes(strokes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_uses_declared_width() {
        let strokes = vec![vec![Vec2::new(0.2, -0.5), Vec2::new(0.3, 0.25)]];
        let bbox = compute_bounding_box(&strokes, 0.8);
        assert_eq!(bbox.min, Vec2::new(0.0, -0.5));
        assert_eq!(bbox.max, Vec2::new(0.8, 0.25));
    }

    #[test]
    fn test_bounding_box_without_points() {
        let bbox = compute_bounding_box(&[], 0.5);
        assert_eq!(bbox.min, Vec2::new(0.0, 0.0));
        assert_eq!(bbox.max, Vec2::new(0.5, 0.0));
    }

    #[test]
    fn test_resolve_substitutes_question_mark() {
        let font = StrokeFont::embedded();
        let expected = ('?' as usize) - (' ' as usize);
        assert_eq!(font.resolve_index('\u{1}'), expected);
        assert_eq!(font.resolve_index('\u{2603}'), expected);
        assert!(std::ptr::eq(font.resolve('\u{7}'), font.glyph(expected).unwrap()));
    }

    #[test]
    fn test_resolve_tab_substitutes_space() {
        let font = StrokeFont::embedded();
        assert_eq!(font.resolve_index('\t'), 0);
    }

    #[test]
    fn test_resolve_in_table() {
        let font = StrokeFont::embedded();
        assert_eq!(font.resolve_index('A'), 33);
        assert_eq!(font.resolve_index('~'), 94);
    }

    #[test]
    fn test_short_table_falls_back_to_first_glyph() {
        let font = StrokeFont::from_records("tiny", ["JZ", "MWRFRT"]).unwrap();
        assert_eq!(font.len(), 2);
        assert_eq!(font.resolve_index('!'), 1);
        assert_eq!(font.resolve_index('Z'), 0);
    }

    #[test]
    fn test_empty_table_is_rejected() {
        let result = StrokeFont::from_records("empty", std::iter::empty());
        assert!(matches!(result, Err(TextError::InvalidFontFile { .. })));
    }

    #[test]
    fn test_shape_one_glyph_per_char() {
        let font = StrokeFont::embedded();
        let shaped = font.shape("AB");
        assert_eq!(shaped.len(), 2);
        assert_eq!(shaped[0].glyph_id, 33);
        assert_eq!(shaped[1].cluster, 1);
        assert_eq!(shaped[0].advance, font.resolve('A').width());
    }

    #[test]
    fn test_max_advance_is_widest_glyph() {
        let font = StrokeFont::embedded();
        let widest = (0..font.len())
            .filter_map(|i| font.glyph(i))
            .map(StrokeGlyph::width)
            .fold(0.0, f32::max);
        assert_eq!(font.max_advance(), widest);
        assert!(font.max_advance() >= font.resolve('W').width());
    }
}
