//! Outline capture and flattening
//!
//! `ttf-parser` reports glyph outlines as drawing commands. They are
//! captured as tagged points (on-curve, quadratic control, cubic control)
//! grouped per contour, then flattened into closed polylines.

use ttf_parser::OutlineBuilder;

use crate::geometry::Vec2;

/// Segments used to flatten one curve
pub const MIN_CURVE_SEGMENTS: usize = 50;

/// Role of an outline point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointTag {
    /// On the curve
    On,
    /// Quadratic control point
    Conic,
    /// Cubic control point
    Cubic,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlinePoint {
    pub position: Vec2,
    pub tag: PointTag,
}

impl OutlinePoint {
    pub fn new(position: Vec2, tag: PointTag) -> Self {
        Self { position, tag }
    }

    pub fn on(x: f32, y: f32) -> Self {
        Self::new(Vec2::new(x, y), PointTag::On)
    }

    pub fn conic(x: f32, y: f32) -> Self {
        Self::new(Vec2::new(x, y), PointTag::Conic)
    }

    pub fn cubic(x: f32, y: f32) -> Self {
        Self::new(Vec2::new(x, y), PointTag::Cubic)
    }
}

/// A flattened closed region of an outline glyph, in glyph units
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contour {
    pub points: Vec<Vec2>,
}

impl Contour {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Collects outline commands as tagged points.
///
/// Font units are scaled by `1 / units_per_em` and y is flipped so the
/// result is in y-down glyph space.
pub struct ContourCollector {
    scale: f32,
    current: Vec<OutlinePoint>,
    contours: Vec<Vec<OutlinePoint>>,
}

impl ContourCollector {
    pub fn new(units_per_em: u16) -> Self {
        Self {
            scale: 1.0 / f32::from(units_per_em.max(1)),
            current: Vec::new(),
            contours: Vec::new(),
        }
    }

    fn push(&mut self, x: f32, y: f32, tag: PointTag) {
        let position = Vec2::new(x * self.scale, -y * self.scale);
        self.current.push(OutlinePoint::new(position, tag));
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            self.contours.push(std::mem::take(&mut self.current));
        }
    }

    /// Tagged point lists, one per contour
    pub fn finish(mut self) -> Vec<Vec<OutlinePoint>> {
        self.flush();
        self.contours
    }

    /// Flattened contours, dropping degenerate ones
    pub fn into_contours(self) -> Vec<Contour> {
        self.finish()
            .iter()
            .map(|points| flatten_contour(points, MIN_CURVE_SEGMENTS))
            .filter(|contour| contour.len() >= 3)
            .collect()
    }
}

impl OutlineBuilder for ContourCollector {
    fn move_to(&mut self, x: f32, y: f32) {
        self.flush();
        self.push(x, y, PointTag::On);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.push(x, y, PointTag::On);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.push(x1, y1, PointTag::Conic);
        self.push(x, y, PointTag::On);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.push(x1, y1, PointTag::Cubic);
        self.push(x2, y2, PointTag::Cubic);
        self.push(x, y, PointTag::On);
    }

    fn close(&mut self) {
        self.flush();
    }
}

/// Flatten one closed contour of tagged points.
///
/// Two consecutive quadratic controls imply an on-curve point at their
/// midpoint. A contour without any on-curve point starts at the midpoint
/// of its last and first points. Each curve contributes `segments`
/// points; the closing point is dropped when it repeats the start.
pub fn flatten_contour(points: &[OutlinePoint], segments: usize) -> Contour {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return Contour::default();
    };
    let segments = segments.max(1);

    let (start, rest): (Vec2, Vec<OutlinePoint>) =
        match points.iter().position(|p| p.tag == PointTag::On) {
            Some(index) => {
                let rest = points[index + 1..]
                    .iter()
                    .chain(&points[..index])
                    .copied()
                    .collect();
                (points[index].position, rest)
            }
            None => (first.position.midpoint(last.position), points.to_vec()),
        };

    let mut out = vec![start];
    let mut cursor = start;
    let mut controls: Vec<OutlinePoint> = Vec::new();

    let closing = OutlinePoint::new(start, PointTag::On);
    for point in rest.iter().chain(std::iter::once(&closing)) {
        match point.tag {
            PointTag::On => {
                emit_segment(&mut out, cursor, &controls, point.position, segments);
                cursor = point.position;
                controls.clear();
            }
            PointTag::Conic => {
                if let Some(prev) = controls.last().filter(|p| p.tag == PointTag::Conic) {
                    let mid = prev.position.midpoint(point.position);
                    emit_segment(&mut out, cursor, &controls, mid, segments);
                    cursor = mid;
                    controls.clear();
                }
                controls.push(*point);
            }
            PointTag::Cubic => controls.push(*point),
        }
    }

    if out.len() > 1 && out.last() == Some(&start) {
        out.pop();
    }

    Contour { points: out }
}

fn emit_segment(
    out: &mut Vec<Vec2>,
    from: Vec2,
    controls: &[OutlinePoint],
    to: Vec2,
    segments: usize,
) {
    let (c1, c2) = match controls {
        [] => {
            out.push(to);
            return;
        }
        [only] if only.tag == PointTag::Conic => {
            // Degree elevation of the quadratic
            let c = only.position;
            (from + (c - from) * (2.0 / 3.0), to + (c - to) * (2.0 / 3.0))
        }
        [only] => (only.position, only.position),
        [c1, .., c2] => (c1.position, c2.position),
    };

    for i in 1..=segments {
        if i == segments {
            out.push(to);
        } else {
            out.push(cubic_point(from, c1, c2, to, i as f32 / segments as f32));
        }
    }
}

fn cubic_point(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let mt = 1.0 - t;
    p0 * (mt * mt * mt) + p1 * (3.0 * mt * mt * t) + p2 * (3.0 * mt * t * t) + p3 * (t * t * t)
}
