//! Outline (TrueType / OpenType) fonts
//!
//! Runs are shaped with rustybuzz; glyph outlines come from ttf-parser and
//! are flattened into closed contours, memoized per glyph id.

mod flatten;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use rustybuzz::UnicodeBuffer;
use ttf_parser::{FaceParsingError, GlyphId};

use crate::font::{FontConfig, FontKind, GlyphShape, GlyphSource, ShapedGlyph};
use crate::geometry::Vec2;
use crate::{Result, TextError};

pub use flatten::{
    flatten_contour, Contour, ContourCollector, OutlinePoint, PointTag, MIN_CURVE_SEGMENTS,
};

/// A scalable outline font
pub struct OutlineFont {
    name: String,
    data: Vec<u8>,
    index: u32,
    units_per_em: u16,
    max_advance: f32,
    cache: RwLock<HashMap<u16, Arc<[Contour]>>>,
}

impl OutlineFont {
    /// Locate and load a font.
    ///
    /// Candidates, first match wins: the literal path, then
    /// `<user_font_dir>/<stem>.otf` and `<user_font_dir>/<stem>.ttf`, then
    /// (if enabled) installed system fonts by family name.
    pub fn load(name_or_path: &str, config: &FontConfig) -> Result<Self> {
        let path = Path::new(name_or_path);
        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| name_or_path.to_string());

        let mut candidates: Vec<PathBuf> = vec![path.to_path_buf()];
        if let Some(dir) = &config.user_font_dir {
            candidates.push(dir.join(format!("{stem}.otf")));
            candidates.push(dir.join(format!("{stem}.ttf")));
        }

        let mut first_error = None;

        for candidate in candidates.iter().filter(|c| c.is_file()) {
            let path_str = candidate.display().to_string();
            let loaded = std::fs::read(candidate)
                .map_err(|source| TextError::Io {
                    path: path_str.clone(),
                    source,
                })
                .and_then(|data| Self::from_bytes(stem.clone(), data, 0));

            match loaded {
                Ok(font) => {
                    tracing::debug!(path = %path_str, "Loaded outline font");
                    return Ok(font);
                }
                Err(err) => {
                    tracing::warn!(path = %path_str, error = %err, "Font candidate rejected");
                    first_error.get_or_insert(err);
                }
            }
        }

        if config.system_fallback {
            match Self::from_system(&stem) {
                Ok(font) => return Ok(font),
                Err(err) => {
                    tracing::warn!(family = %stem, error = %err, "No matching system font");
                }
            }
        }

        Err(first_error.unwrap_or_else(|| {
            tracing::warn!(font = name_or_path, "No outline font candidate found");
            TextError::FontNotFound(name_or_path.to_string())
        }))
    }

    /// Query installed fonts by family name
    pub fn from_system(family: &str) -> Result<Self> {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();

        let id = db
            .query(&fontdb::Query {
                families: &[fontdb::Family::Name(family)],
                ..Default::default()
            })
            .ok_or_else(|| TextError::FontNotFound(family.to_string()))?;

        let (data, index) = db
            .with_face_data(id, |data, index| (data.to_vec(), index))
            .ok_or_else(|| TextError::FontNotFound(family.to_string()))?;

        Self::from_bytes(family, data, index)
    }

    /// Load a font from memory
    pub fn from_bytes(name: impl Into<String>, data: Vec<u8>, index: u32) -> Result<Self> {
        let name = name.into();

        let face = ttf_parser::Face::parse(&data, index).map_err(|err| match err {
            FaceParsingError::UnknownMagic => TextError::UnsupportedFormat(name.clone()),
            other => TextError::FontParsing(format!("{name}: {other}")),
        })?;

        if rustybuzz::Face::from_slice(&data, index).is_none() {
            return Err(TextError::FontParsing(format!("{name}: cannot be shaped")));
        }

        let units_per_em = face.units_per_em();
        let widest = (0..face.number_of_glyphs())
            .filter_map(|id| face.glyph_hor_advance(GlyphId(id)))
            .max()
            .unwrap_or(units_per_em);
        let max_advance = f32::from(widest) / f32::from(units_per_em.max(1));

        tracing::debug!(
            font = %name,
            glyphs = face.number_of_glyphs(),
            units_per_em,
            "Parsed outline font"
        );

        Ok(Self {
            name,
            data,
            index,
            units_per_em,
            max_advance,
            cache: RwLock::new(HashMap::new()),
        })
    }

    /// Parsed face borrowing the font data
    pub fn face(&self) -> Option<ttf_parser::Face<'_>> {
        ttf_parser::Face::parse(&self.data, self.index).ok()
    }

    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    /// Flattened contours of a glyph in glyph units, y-down
    pub fn contours(&self, glyph_id: u16) -> Arc<[Contour]> {
        let cached = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&glyph_id)
            .cloned();
        if let Some(contours) = cached {
            return contours;
        }

        let contours: Arc<[Contour]> = match self.face() {
            Some(face) => self.flatten_glyph(&face, glyph_id).into(),
            None => Arc::from(Vec::new()),
        };
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(cache.entry(glyph_id).or_insert(contours))
    }

    /// Number of glyphs with memoized contours
    pub fn cached_glyphs(&self) -> usize {
        self.cache.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Flatten every uncached glyph of a shaped run with an already parsed
    /// face, so drawing the run never parses the font again.
    fn warm_cache(&self, face: &ttf_parser::Face<'_>, glyphs: &[ShapedGlyph]) {
        let missing: Vec<u16> = {
            let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
            glyphs
                .iter()
                .filter_map(|glyph| u16::try_from(glyph.glyph_id).ok())
                .filter(|id| !cache.contains_key(id))
                .collect()
        };
        if missing.is_empty() {
            return;
        }

        let flattened: Vec<(u16, Arc<[Contour]>)> = missing
            .into_iter()
            .map(|id| (id, self.flatten_glyph(face, id).into()))
            .collect();

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        for (id, contours) in flattened {
            cache.entry(id).or_insert(contours);
        }
    }

    fn flatten_glyph(&self, face: &ttf_parser::Face<'_>, glyph_id: u16) -> Vec<Contour> {
        let mut collector = ContourCollector::new(self.units_per_em);
        face.outline_glyph(GlyphId(glyph_id), &mut collector);
        collector.into_contours()
    }

    /// One `.notdef` per character, used when shaping is unavailable
    fn notdef_run(&self, text: &str) -> Vec<ShapedGlyph> {
        let advance = self
            .face()
            .and_then(|face| face.glyph_hor_advance(GlyphId(0)))
            .map_or(self.max_advance, |adv| {
                f32::from(adv) / f32::from(self.units_per_em.max(1))
            });

        text.char_indices()
            .map(|(cluster, _)| ShapedGlyph {
                glyph_id: 0,
                advance,
                offset: Vec2::ZERO,
                cluster,
            })
            .collect()
    }
}

impl GlyphSource for OutlineFont {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> FontKind {
        FontKind::Outline
    }

    fn shape(&self, text: &str) -> Vec<ShapedGlyph> {
        let Some(face) = rustybuzz::Face::from_slice(&self.data, self.index) else {
            return self.notdef_run(text);
        };

        let mut buffer = UnicodeBuffer::new();
        buffer.push_str(text);
        buffer.guess_segment_properties();

        let output = rustybuzz::shape(&face, &[], buffer);
        let scale = 1.0 / f32::from(self.units_per_em.max(1));

        let shaped: Vec<ShapedGlyph> = output
            .glyph_infos()
            .iter()
            .zip(output.glyph_positions())
            .map(|(info, pos)| ShapedGlyph {
                glyph_id: info.glyph_id,
                advance: pos.x_advance as f32 * scale,
                offset: Vec2::new(pos.x_offset as f32 * scale, -(pos.y_offset as f32) * scale),
                cluster: info.cluster as usize,
            })
            .collect();

        // rustybuzz::Face derefs to the ttf-parser face it wraps
        self.warm_cache(&face, &shaped);
        shaped
    }

    fn max_advance(&self) -> f32 {
        self.max_advance
    }

    fn glyph_shape(&self, glyph_id: u32) -> GlyphShape<'_> {
        let contours = match u16::try_from(glyph_id) {
            Ok(id) => self.contours(id),
            Err(_) => Arc::from(Vec::new()),
        };
        GlyphShape::Contours(contours)
    }
}

impl std::fmt::Debug for OutlineFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutlineFont")
            .field("name", &self.name)
            .field("index", &self.index)
            .field("units_per_em", &self.units_per_em)
            .field("bytes", &self.data.len())
            .finish()
    }
}
