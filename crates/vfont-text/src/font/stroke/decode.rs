//! Stroke glyph record decoding
//!
//! Records are sequences of 2-character coordinate pairs, each character
//! biased by `'R'`. The first pair holds the glyph's left and right
//! extents; the pair `" R"` lifts the pen and ends the current stroke.
//!
//! Vector font files wrap records over several physical lines and prefix
//! them with an 8-column header: a 5-column glyph index followed by a
//! 3-digit vertex count (which includes the extents pair).

use super::StrokeGlyph;
use crate::geometry::Vec2;

/// Quantization step of stroke coordinates
pub const STROKE_FONT_SCALE: f32 = 1.0 / 21.0;

/// Vertical bias placing the baseline near y = 0
pub const FONT_OFFSET: i32 = -10;

/// Width of the glyph index and vertex count columns in font files
pub const FILE_RECORD_HEADER: usize = 8;

const BIAS: u8 = b'R';
const PEN_UP: [u8; 2] = [b' ', b'R'];
const INDEX_COLUMNS: usize = 5;

fn coord(byte: u8) -> i32 {
    i32::from(byte) - i32::from(BIAS)
}

/// Decode one headerless record.
///
/// A trailing odd byte is ignored. Records shorter than one pair decode
/// to an empty, zero-width glyph.
pub fn decode_glyph(record: &[u8]) -> StrokeGlyph {
    let mut pairs = record.chunks_exact(2);

    let Some(extents) = pairs.next() else {
        return StrokeGlyph::new(Vec::new(), 0.0);
    };

    let start_x = coord(extents[0]) as f32 * STROKE_FONT_SCALE;
    let end_x = coord(extents[1]) as f32 * STROKE_FONT_SCALE;

    let mut strokes: Vec<Vec<Vec2>> = Vec::new();
    let mut current: Vec<Vec2> = Vec::new();

    for pair in pairs {
        if pair == PEN_UP {
            if !current.is_empty() {
                strokes.push(std::mem::take(&mut current));
            }
            continue;
        }

        current.push(Vec2::new(
            coord(pair[0]) as f32 * STROKE_FONT_SCALE - start_x,
            (coord(pair[1]) + FONT_OFFSET) as f32 * STROKE_FONT_SCALE,
        ));
    }

    if !current.is_empty() {
        strokes.push(current);
    }

    StrokeGlyph::new(strokes, end_x - start_x)
}

/// A physical line continues the previous record when any of its first
/// five columns holds something other than a space or a digit.
pub fn is_continuation_line(line: &str) -> bool {
    line.bytes()
        .take(INDEX_COLUMNS)
        .any(|b| b != b' ' && !b.is_ascii_digit())
}

/// Parse the text of a vector font file into glyphs, in file order.
pub fn parse_vector_font(text: &str) -> Vec<StrokeGlyph> {
    let mut glyphs = Vec::new();
    let mut record = String::new();

    for line in text.lines() {
        let line = line.trim_end_matches('\r');

        if !is_continuation_line(line) && !record.is_empty() {
            flush_record(&record, &mut glyphs);
            record.clear();
        }

        record.push_str(line);
    }

    if !record.is_empty() {
        flush_record(&record, &mut glyphs);
    }

    glyphs
}

fn flush_record(record: &str, glyphs: &mut Vec<StrokeGlyph>) {
    let bytes = record.as_bytes();

    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return;
    }

    if bytes.len() < FILE_RECORD_HEADER + 2 {
        tracing::warn!(record, "Skipping truncated vector font record");
        return;
    }

    let body = &bytes[FILE_RECORD_HEADER..];

    // The vertex count bounds the pairs we read; an unreadable count
    // means the whole body is used.
    let count = std::str::from_utf8(&bytes[INDEX_COLUMNS..FILE_RECORD_HEADER])
        .ok()
        .and_then(|digits| digits.trim().parse::<usize>().ok());
    let body = match count {
        Some(count) if count > 0 => &body[..body.len().min(count * 2)],
        _ => body,
    };

    glyphs.push(decode_glyph(body));
}
