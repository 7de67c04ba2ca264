//! Font loading and glyph lookup
//!
//! Two kinds of fonts feed the same layout engine:
//! - stroke fonts ([`StrokeFont`]): glyphs made of open polylines, either
//!   the embedded default table or a vector font file
//! - outline fonts ([`OutlineFont`]): scalable TrueType/OpenType fonts
//!   shaped with rustybuzz and flattened into filled contours
//!
//! Both implement [`GlyphSource`], the seam the layout engine and the
//! renderer talk to.

pub mod outline;
pub mod stroke;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::geometry::Vec2;
use crate::Result;

pub use outline::{Contour, OutlineFont};
pub use stroke::{StrokeFont, StrokeGlyph};

/// Environment variable overriding the user font directory
pub const FONT_DIR_ENV: &str = "VFONT_FONT_DIR";

/// Kind of glyph geometry a font produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontKind {
    /// Open polylines drawn with the pen width
    Stroke,
    /// Closed contours that are filled
    Outline,
}

/// A glyph produced by shaping a run of text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapedGlyph {
    /// Glyph id in the font (table index for stroke fonts)
    pub glyph_id: u32,
    /// Horizontal advance in glyph units (1.0 = one glyph size)
    pub advance: f32,
    /// Offset from the pen position in glyph units
    pub offset: Vec2,
    /// Byte index of the source character in the run
    pub cluster: usize,
}

/// Geometry of a single glyph in glyph units, y growing downward
#[derive(Debug, Clone)]
pub enum GlyphShape<'a> {
    /// Pen strokes
    Strokes(&'a [Vec<Vec2>]),
    /// Flattened closed contours
    Contours(Arc<[Contour]>),
}

/// Source of glyph metrics and geometry
pub trait GlyphSource: Send + Sync {
    /// Font name, used for diagnostics
    fn name(&self) -> &str;

    fn kind(&self) -> FontKind;

    /// Map a run of characters to positioned glyphs.
    ///
    /// Every character yields at least one glyph; characters the font
    /// cannot represent are substituted, never dropped silently.
    fn shape(&self, text: &str) -> Vec<ShapedGlyph>;

    /// Advance of the widest glyph, in glyph units
    fn max_advance(&self) -> f32;

    /// Geometry of a glyph returned by [`GlyphSource::shape`]
    fn glyph_shape(&self, glyph_id: u32) -> GlyphShape<'_>;
}

/// Font lookup configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontConfig {
    /// Directory searched for `<name>.otf` / `<name>.ttf`
    pub user_font_dir: Option<PathBuf>,
    /// Query installed system fonts by family name when the file
    /// candidates fail
    pub system_fallback: bool,
}

impl FontConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration from the environment: `VFONT_FONT_DIR`, falling back
    /// to `$HOME/.local/share/fonts`.
    pub fn from_env() -> Self {
        let user_font_dir = std::env::var_os(FONT_DIR_ENV)
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("HOME")
                    .map(|home| Path::new(&home).join(".local").join("share").join("fonts"))
            });

        Self {
            user_font_dir,
            system_fallback: true,
        }
    }

    pub fn with_user_font_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.user_font_dir = Some(dir.into());
        self
    }

    pub fn with_system_fallback(mut self, enabled: bool) -> Self {
        self.system_fallback = enabled;
        self
    }
}

/// A font selected for drawing text
pub enum TextFont {
    /// The process-wide embedded stroke font
    Embedded,
    /// A stroke font loaded from a vector font file
    Stroke(StrokeFont),
    /// A scalable outline font
    Outline(OutlineFont),
}

impl TextFont {
    /// Load a font by name or path.
    ///
    /// `.jhf` files are read as vector stroke fonts; anything else goes
    /// through the outline font loader.
    pub fn load(name_or_path: &str, config: &FontConfig) -> Result<Self> {
        let is_stroke_file = Path::new(name_or_path)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("jhf"));

        if is_stroke_file {
            StrokeFont::load_file(name_or_path).map(TextFont::Stroke)
        } else {
            OutlineFont::load(name_or_path, config).map(TextFont::Outline)
        }
    }

    /// Load a font, falling back to the embedded stroke font on failure.
    pub fn load_or_default(name_or_path: &str, config: &FontConfig) -> Self {
        match Self::load(name_or_path, config) {
            Ok(font) => font,
            Err(err) => {
                tracing::warn!(
                    font = name_or_path,
                    error = %err,
                    "Font load failed, using embedded stroke font"
                );
                TextFont::Embedded
            }
        }
    }

    /// The glyph source backing this font
    pub fn source(&self) -> &dyn GlyphSource {
        match self {
            TextFont::Embedded => StrokeFont::embedded(),
            TextFont::Stroke(font) => font,
            TextFont::Outline(font) => font,
        }
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self, TextFont::Embedded)
    }
}

impl Default for TextFont {
    fn default() -> Self {
        TextFont::Embedded
    }
}

impl std::fmt::Debug for TextFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let source = self.source();
        f.debug_struct("TextFont")
            .field("name", &source.name())
            .field("kind", &source.kind())
            .finish()
    }
}
