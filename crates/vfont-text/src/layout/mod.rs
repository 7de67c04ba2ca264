//! Text layout
//!
//! [`scan`] is the one state machine behind every layout query. It walks
//! the markup tokens, shapes each run through the font and emits glyph and
//! decoration events in line-relative text space: x is the distance from
//! the line start in reading order, y is relative to the line's baseline.
//! The metrics functions and [`TextLayout`] are two projections of the same
//! event stream, so sizes and drawn geometry always agree.

mod frame;
mod metrics;

pub use frame::{GlyphPlacement, LineFrame};
pub use metrics::{interline, line_count, text_bounding_box, text_size};

use crate::attributes::TextAttributes;
use crate::font::GlyphSource;
use crate::geometry::{BoundingBox, Vec2};
use crate::markup::{tokenize, RunStyle, StyledToken};

/// Line pitch as a multiple of the glyph height
pub const INTERLINE_PITCH_RATIO: f32 = 1.61;

/// Overbar height above the baseline, in glyph heights
pub const OVERBAR_POSITION_FACTOR: f32 = 1.22;

/// Underline depth below the baseline, in glyph heights
pub const UNDERLINE_POSITION_FACTOR: f32 = 0.12;

/// Pen width multiplier for bold text
pub const BOLD_FACTOR: f32 = 1.3;

/// Horizontal shift per unit of height for italic text
pub const ITALIC_TILT: f32 = 1.0 / 8.0;

/// Tab stop spacing, in widest-glyph advances
pub const TAB_WIDTH_IN_GLYPHS: f32 = 4.0;

/// Fraction of a tab stop within which a cursor counts as sitting on it
const TAB_EPSILON: f32 = 1e-4;

/// Next tab stop strictly after `cursor`.
///
/// A cursor a rounding error short of a stop is treated as on it, so a tab
/// always advances by a visible amount.
fn next_tab_stop(cursor: f32, tab: f32) -> f32 {
    ((cursor / tab + TAB_EPSILON).floor() + 1.0) * tab
}

/// A glyph positioned in line-relative text space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedGlyph {
    pub glyph_id: u32,
    pub line: usize,
    /// Distance of the glyph origin from the line start
    pub x: f32,
    /// Baseline shift (scripts and shaping offsets), positive is down
    pub y: f32,
    /// Script scale
    pub scale: f32,
    pub overbar: bool,
}

/// A horizontal decoration in line-relative text space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub line: usize,
    pub start: f32,
    pub end: f32,
    /// Offset from the baseline, positive is down
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayoutEvent {
    Glyph(PlacedGlyph),
    Overbar(Segment),
    Underline(Segment),
    LineBreak,
}

/// Per-line extents gathered while scanning
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutSummary {
    /// Furthest cursor position reached on each line, in text space
    pub line_extents: Vec<f32>,
}

impl LayoutSummary {
    pub fn line_count(&self) -> usize {
        self.line_extents.len()
    }
}

struct Scanner<'a> {
    attrs: &'a TextAttributes,
    size: Vec2,
    tab: f32,
    events: Vec<LayoutEvent>,
    summary: LayoutSummary,
    line: usize,
    /// Cursor in glyph units
    cursor: f32,
    line_max: f32,
    line_has_glyphs: bool,
    overbar_start: Option<f32>,
}

impl<'a> Scanner<'a> {
    fn new(font: &dyn GlyphSource, attrs: &'a TextAttributes) -> Self {
        Self {
            attrs,
            size: attrs.abs_glyph_size(),
            tab: TAB_WIDTH_IN_GLYPHS * font.max_advance(),
            events: Vec::new(),
            summary: LayoutSummary::default(),
            line: 0,
            cursor: 0.0,
            line_max: 0.0,
            line_has_glyphs: false,
            overbar_start: None,
        }
    }

    fn open_overbar(&mut self) {
        if self.overbar_start.is_none() {
            self.overbar_start = Some(self.cursor);
        }
    }

    fn close_overbar(&mut self) {
        let Some(start) = self.overbar_start.take() else {
            return;
        };

        let y = -OVERBAR_POSITION_FACTOR * self.size.y;
        let mut start = start * self.size.x;
        if self.attrs.italic {
            start += OVERBAR_POSITION_FACTOR * self.size.y * ITALIC_TILT;
        }

        self.events.push(LayoutEvent::Overbar(Segment {
            line: self.line,
            start,
            end: self.cursor * self.size.x,
            y,
        }));
    }

    fn run(&mut self, font: &dyn GlyphSource, text: &str, style: RunStyle) {
        if style.overbar {
            self.open_overbar();
        } else {
            self.close_overbar();
        }

        let scale = style.scale();
        let shift = style.script.offset_factor() * self.size.y;

        for shaped in font.shape(text) {
            self.events.push(LayoutEvent::Glyph(PlacedGlyph {
                glyph_id: shaped.glyph_id,
                line: self.line,
                x: (self.cursor + shaped.offset.x * scale) * self.size.x,
                y: shift + shaped.offset.y * scale * self.size.y,
                scale,
                overbar: style.overbar,
            }));
            self.cursor += shaped.advance * scale;
            self.line_has_glyphs = true;
        }

        self.line_max = self.line_max.max(self.cursor);
    }

    fn tab(&mut self) {
        self.close_overbar();
        if self.tab > 0.0 {
            self.cursor = next_tab_stop(self.cursor, self.tab);
        }
        self.line_max = self.line_max.max(self.cursor);
    }

    fn end_line(&mut self) {
        self.close_overbar();

        if self.attrs.underline && self.line_has_glyphs {
            self.events.push(LayoutEvent::Underline(Segment {
                line: self.line,
                start: 0.0,
                end: self.cursor * self.size.x,
                y: UNDERLINE_POSITION_FACTOR * self.size.y,
            }));
        }

        self.summary.line_extents.push(self.line_max * self.size.x);
    }

    fn line_break(&mut self) {
        self.end_line();
        self.events.push(LayoutEvent::LineBreak);
        self.line += 1;
        self.cursor = 0.0;
        self.line_max = 0.0;
        self.line_has_glyphs = false;
    }

    fn finish(mut self) -> (Vec<LayoutEvent>, LayoutSummary) {
        self.end_line();
        (self.events, self.summary)
    }
}

/// Walk marked-up text and produce layout events in text space
pub fn scan(
    font: &dyn GlyphSource,
    text: &str,
    attrs: &TextAttributes,
) -> (Vec<LayoutEvent>, LayoutSummary) {
    let mut scanner = Scanner::new(font, attrs);

    for token in tokenize(text) {
        match token {
            StyledToken::Run { text, style } => scanner.run(font, &text, style),
            StyledToken::Tab => scanner.tab(),
            StyledToken::LineBreak => scanner.line_break(),
        }
    }

    scanner.finish()
}

/// A world-space decoration line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecorationLine {
    pub start: Vec2,
    pub end: Vec2,
}

/// Text laid out in world space
#[derive(Debug, Clone)]
pub struct TextLayout {
    /// Width of the widest line, pen included
    pub width: f32,
    /// `line_count * interline`
    pub height: f32,
    pub line_count: usize,
    pub interline: f32,
    /// Width of each line, pen included
    pub line_widths: Vec<f32>,
    pub glyphs: Vec<GlyphPlacement>,
    pub overbars: Vec<DecorationLine>,
    pub underlines: Vec<DecorationLine>,
    pub bounding_box: BoundingBox,
    /// Pen width used for strokes and decorations
    pub pen_width: f32,
}

impl TextLayout {
    /// Lay out `text` anchored at `position`
    pub fn compute(
        font: &dyn GlyphSource,
        text: &str,
        position: Vec2,
        attrs: &TextAttributes,
    ) -> Self {
        let (events, summary) = scan(font, text, attrs);
        let frame = LineFrame::new(attrs, position, &summary);

        let mut glyphs = Vec::new();
        let mut overbars = Vec::new();
        let mut underlines = Vec::new();

        for event in &events {
            match event {
                LayoutEvent::Glyph(glyph) => glyphs.push(frame.place(glyph)),
                LayoutEvent::Overbar(segment) => overbars.push(frame.segment(segment)),
                LayoutEvent::Underline(segment) => underlines.push(frame.segment(segment)),
                LayoutEvent::LineBreak => {}
            }
        }

        tracing::trace!(
            glyphs = glyphs.len(),
            lines = frame.line_count(),
            "Computed text layout"
        );

        Self {
            width: frame.width(),
            height: frame.height(),
            line_count: frame.line_count(),
            interline: frame.interline(),
            line_widths: frame.line_widths().to_vec(),
            glyphs,
            overbars,
            underlines,
            bounding_box: frame.bounding_box(),
            pen_width: attrs.pen_width(),
        }
    }

    /// Size of the laid out block: widest line by total height
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::StrokeFont;
    use crate::markup::SCRIPT_SCALE;

    fn glyphs(events: &[LayoutEvent]) -> Vec<PlacedGlyph> {
        events
            .iter()
            .filter_map(|event| match event {
                LayoutEvent::Glyph(glyph) => Some(*glyph),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_scan_advances_by_glyph_width() {
        let font = StrokeFont::embedded();
        let attrs = TextAttributes::new().with_size(2.0, 2.0);
        let (events, summary) = scan(font, "AB", &attrs);

        let placed = glyphs(&events);
        assert_eq!(placed.len(), 2);
        assert_eq!(placed[0].x, 0.0);
        assert_eq!(placed[1].x, font.resolve('A').width() * 2.0);

        let expected = (font.resolve('A').width() + font.resolve('B').width()) * 2.0;
        assert!((summary.line_extents[0] - expected).abs() < 1e-5);
    }

    #[test]
    fn test_tab_snaps_to_next_stop() {
        let font = StrokeFont::embedded();
        let attrs = TextAttributes::new();
        let tab = TAB_WIDTH_IN_GLYPHS * font.max_advance();

        let (events, _) = scan(font, "A\tB\tC", &attrs);
        let placed = glyphs(&events);
        assert!((placed[1].x - tab).abs() < 1e-5);
        assert!((placed[2].x - 2.0 * tab).abs() < 1e-5);
    }

    #[test]
    fn test_tab_at_stop_moves_forward() {
        let font = StrokeFont::embedded();
        let tab = TAB_WIDTH_IN_GLYPHS * font.max_advance();
        let (events, _) = scan(font, "\t\tX", &TextAttributes::new());
        assert!((glyphs(&events)[0].x - 2.0 * tab).abs() < 1e-5);
    }

    #[test]
    fn test_tab_just_short_of_a_stop_skips_it() {
        assert_eq!(next_tab_stop(0.0, 1.0), 1.0);
        assert_eq!(next_tab_stop(1.5, 1.0), 2.0);
        assert_eq!(next_tab_stop(2.0, 1.0), 3.0);
        assert_eq!(next_tab_stop(2.0 - 1e-6, 1.0), 3.0);

        // Accumulated advances rarely land exactly on a stop
        let tab = 0.3_f32;
        let cursor = (0..10).map(|_| 0.03_f32).sum::<f32>();
        assert!((next_tab_stop(cursor, tab) - 2.0 * tab).abs() < 1e-5);
    }

    #[test]
    fn test_one_overbar_per_run() {
        let font = StrokeFont::embedded();
        let (events, _) = scan(font, "~AB~ C", &TextAttributes::new());

        let bars: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, LayoutEvent::Overbar(_)))
            .collect();
        assert_eq!(bars.len(), 1);

        let LayoutEvent::Overbar(bar) = bars[0] else {
            unreachable!()
        };
        let ab = font.resolve('A').width() + font.resolve('B').width();
        assert_eq!(bar.start, 0.0);
        assert!((bar.end - ab).abs() < 1e-5);
        assert!((bar.y + OVERBAR_POSITION_FACTOR).abs() < 1e-6);
    }

    #[test]
    fn test_underline_per_line() {
        let font = StrokeFont::embedded();
        let attrs = TextAttributes::new().underline(true);
        let (events, summary) = scan(font, "ab\n\ncd", &attrs);

        let underlines: Vec<Segment> = events
            .iter()
            .filter_map(|e| match e {
                LayoutEvent::Underline(segment) => Some(*segment),
                _ => None,
            })
            .collect();

        // The empty middle line gets no underline
        assert_eq!(underlines.len(), 2);
        assert_eq!(underlines[1].line, 2);
        assert_eq!(summary.line_count(), 3);
    }

    #[test]
    fn test_superscript_is_scaled_and_raised() {
        let font = StrokeFont::embedded();
        let attrs = TextAttributes::new().with_size(1.0, 2.0);
        let (events, summary) = scan(font, "x^{2}", &attrs);
        let placed = glyphs(&events);

        assert_eq!(placed[1].scale, SCRIPT_SCALE);
        assert!((placed[1].y + 0.6).abs() < 1e-6);

        let expected = font.resolve('x').width() + font.resolve('2').width() * SCRIPT_SCALE;
        assert!((summary.line_extents[0] - expected).abs() < 1e-5);
    }

    #[test]
    fn test_subscript_is_scaled_and_lowered() {
        let font = StrokeFont::embedded();
        let attrs = TextAttributes::new().with_size(1.0, 2.0);
        let (events, _) = scan(font, "x_{2}", &attrs);
        let placed = glyphs(&events);

        assert_eq!(placed.len(), 2);
        assert_eq!(placed[0].y, 0.0);
        assert_eq!(placed[1].scale, SCRIPT_SCALE);
        assert!((placed[1].y - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_italic_overbar_moves_only_its_start() {
        let font = StrokeFont::embedded();
        let height = 2.0;
        let attrs = TextAttributes::new().with_size(1.0, height).italic(true);
        let (events, _) = scan(font, "~AB~", &attrs);

        let bars: Vec<Segment> = events
            .iter()
            .filter_map(|e| match e {
                LayoutEvent::Overbar(segment) => Some(*segment),
                _ => None,
            })
            .collect();
        assert_eq!(bars.len(), 1);

        let ab = font.resolve('A').width() + font.resolve('B').width();
        assert!((bars[0].start - OVERBAR_POSITION_FACTOR * height * ITALIC_TILT).abs() < 1e-6);
        assert!((bars[0].end - ab).abs() < 1e-5);
        assert!((bars[0].y + OVERBAR_POSITION_FACTOR * height).abs() < 1e-6);
    }

    #[test]
    fn test_mirrored_italic_overbar_is_reflected() {
        let font = StrokeFont::embedded();
        let attrs = TextAttributes::new().with_size(1.0, 2.0).italic(true);
        let plain = TextLayout::compute(font, "~AB~", Vec2::ZERO, &attrs);
        let mirrored = TextLayout::compute(font, "~AB~", Vec2::ZERO, &attrs.clone().mirrored(true));

        assert_eq!(plain.overbars.len(), 1);
        assert_eq!(mirrored.overbars.len(), 1);

        let (a, b) = (plain.overbars[0], mirrored.overbars[0]);
        assert!((a.start.x + b.start.x).abs() < 1e-5);
        assert!((a.end.x + b.end.x).abs() < 1e-5);
        assert!((a.start.y - b.start.y).abs() < 1e-6);
        assert!((a.end.y - b.end.y).abs() < 1e-6);
    }

    #[test]
    fn test_empty_text_is_one_line() {
        let font = StrokeFont::embedded();
        let (events, summary) = scan(font, "", &TextAttributes::new());
        assert!(events.is_empty());
        assert_eq!(summary.line_extents, vec![0.0]);
    }
}
