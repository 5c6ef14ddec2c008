//! Distance and projection helpers shared by snapping, hit testing and topology.

use kurbo::Point;

/// Euclidean distance between two points.
pub fn distance(p: Point, q: Point) -> f64 {
    let dx = q.x - p.x;
    let dy = q.y - p.y;
    (dx * dx + dy * dy).sqrt()
}

/// Parametric position of `p` projected onto the infinite line through `a` and `b`.
///
/// Returns `None` for a degenerate segment.
fn line_parameter(p: Point, a: Point, b: Point) -> Option<f64> {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return None;
    }
    Some(((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq)
}

fn lerp(a: Point, b: Point, t: f64) -> Point {
    Point::new(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y))
}

/// Closest point to `p` on the segment `a`–`b`.
///
/// The parametric position is clamped to `[0, 1]`, so the result always lies
/// on the segment. A degenerate segment projects everything onto `a`.
pub fn project_onto_segment(p: Point, a: Point, b: Point) -> Point {
    match line_parameter(p, a, b) {
        Some(t) => lerp(a, b, t.clamp(0.0, 1.0)),
        None => a,
    }
}

/// Closest point to `p` on the infinite line through `a` and `b` (unclamped).
pub fn project_onto_line(p: Point, a: Point, b: Point) -> Point {
    match line_parameter(p, a, b) {
        Some(t) => lerp(a, b, t),
        None => a,
    }
}

/// Distance from `p` to the segment `a`–`b`.
///
/// A zero-length segment degrades to the distance to its single point.
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    distance(p, project_onto_segment(p, a, b))
}

/// Clamped parametric position of `p` along `a`–`b` (0 at `a`, 1 at `b`).
pub fn segment_parameter(p: Point, a: Point, b: Point) -> f64 {
    line_parameter(p, a, b).map_or(0.0, |t| t.clamp(0.0, 1.0))
}

/// Midpoint of two points.
pub fn midpoint(a: Point, b: Point) -> Point {
    lerp(a, b, 0.5)
}
