//! Snap functionality for aligning points to walls, corners and grids.
//!
//! Wall drawing resolves a raw point through strictly ordered tiers, stopping
//! at the first one that produces a candidate:
//!
//! 1. nearest wall endpoint within the snap tolerance,
//! 2. nearest projection onto a wall line that falls inside the wall,
//! 3. nearest corner within the snap tolerance,
//! 4. the background grid.
//!
//! Openings bypass the tiers and use a fine sub-grid, always applied after
//! projecting onto the host wall. Ties go to the first candidate enumerated.

use crate::config::EditorConfig;
use crate::geometry;
use crate::plan::Wall;
use crate::topology::Corner;
use kurbo::Point;

/// Which rule produced a snapped point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapKind {
    /// Endpoint of an existing wall.
    WallEndpoint,
    /// Projection onto an existing wall.
    WallLine,
    /// Existing corner point.
    Corner,
    /// Background grid intersection.
    Grid,
    /// Opening sub-grid.
    OpeningGrid,
}

/// Result of a snap operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    /// The snapped point.
    pub point: Point,
    /// The rule that produced it.
    pub kind: SnapKind,
}

impl SnapResult {
    fn new(point: Point, kind: SnapKind) -> Self {
        Self { point, kind }
    }
}

/// Nearest of `candidates` strictly within `tolerance` of `point`.
fn nearest_within(point: Point, candidates: impl Iterator<Item = Point>, tolerance: f64) -> Option<Point> {
    let mut best: Option<(Point, f64)> = None;
    for candidate in candidates {
        let dist = geometry::distance(point, candidate);
        if dist < tolerance && best.is_none_or(|(_, best_dist)| dist < best_dist) {
            best = Some((candidate, dist));
        }
    }
    best.map(|(p, _)| p)
}

/// Snap to the nearest wall endpoint.
pub fn snap_to_wall_endpoints(point: Point, walls: &[Wall], tolerance: f64) -> Option<Point> {
    nearest_within(
        point,
        walls.iter().flat_map(|w| [w.start, w.end]),
        tolerance,
    )
}

/// Snap onto the nearest wall line.
///
/// The projection is taken onto the infinite line and accepted only if its
/// distance to each endpoint is no more than the wall length, i.e. it lies
/// on the wall itself.
pub fn snap_to_wall_lines(point: Point, walls: &[Wall], tolerance: f64) -> Option<Point> {
    nearest_within(
        point,
        walls.iter().filter_map(|wall| {
            let projected = geometry::project_onto_line(point, wall.start, wall.end);
            let length = wall.length();
            (geometry::distance(projected, wall.start) <= length
                && geometry::distance(projected, wall.end) <= length)
                .then_some(projected)
        }),
        tolerance,
    )
}

/// Index of the nearest corner within `tolerance`.
pub fn find_corner(point: Point, corners: &[Corner], tolerance: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, corner) in corners.iter().enumerate() {
        let dist = geometry::distance(point, corner.position);
        if dist < tolerance && best.is_none_or(|(_, best_dist)| dist < best_dist) {
            best = Some((index, dist));
        }
    }
    best.map(|(i, _)| i)
}

/// Snap to the nearest corner.
pub fn snap_to_corners(point: Point, corners: &[Corner], tolerance: f64) -> Option<Point> {
    find_corner(point, corners, tolerance).map(|i| corners[i].position)
}

/// Snap a point to the nearest grid intersection, each axis independently.
pub fn snap_to_grid(point: Point, grid_size: f64) -> Point {
    Point::new(
        (point.x / grid_size).round() * grid_size,
        (point.y / grid_size).round() * grid_size,
    )
}

/// Snap an angle to the nearest increment. Both are in degrees.
pub fn snap_angle(angle_degrees: f64, increment: f64) -> f64 {
    (angle_degrees / increment).round() * increment
}

/// Result of quantizing a wall direction.
#[derive(Debug, Clone, Copy)]
pub struct AngleSnapResult {
    /// The recomputed end point.
    pub point: Point,
    /// The snapped direction in degrees.
    pub angle_degrees: f64,
    /// The drawn direction in degrees.
    pub original_angle_degrees: f64,
    /// Distance from start, preserved from the drawn segment.
    pub distance: f64,
}

/// Rotate `end` about `start` to the nearest `increment`-degree direction.
///
/// The start point and the length are preserved; only the orientation changes.
pub fn snap_wall_end(start: Point, end: Point, increment: f64) -> AngleSnapResult {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let distance = (dx * dx + dy * dy).sqrt();
    let original_angle = dy.atan2(dx).to_degrees();

    if distance == 0.0 {
        return AngleSnapResult {
            point: end,
            angle_degrees: original_angle,
            original_angle_degrees: original_angle,
            distance,
        };
    }

    let snapped_angle = snap_angle(original_angle, increment);
    let radians = snapped_angle.to_radians();
    AngleSnapResult {
        point: Point::new(start.x + distance * radians.cos(), start.y + distance * radians.sin()),
        angle_degrees: snapped_angle,
        original_angle_degrees: original_angle,
        distance,
    }
}

/// Snap engine bound to an editor configuration.
#[derive(Debug, Clone, Copy)]
pub struct SnapEngine<'a> {
    config: &'a EditorConfig,
}

impl<'a> SnapEngine<'a> {
    pub fn new(config: &'a EditorConfig) -> Self {
        Self { config }
    }

    /// Resolve a wall-drawing point through the tiered snap chain.
    pub fn resolve_wall_point(&self, point: Point, walls: &[Wall], corners: &[Corner]) -> SnapResult {
        let tolerance = self.config.snap_tolerance();

        if let Some(p) = snap_to_wall_endpoints(point, walls, tolerance) {
            return SnapResult::new(p, SnapKind::WallEndpoint);
        }
        if let Some(p) = snap_to_wall_lines(point, walls, tolerance) {
            return SnapResult::new(p, SnapKind::WallLine);
        }
        if let Some(p) = snap_to_corners(point, corners, tolerance) {
            return SnapResult::new(p, SnapKind::Corner);
        }
        SnapResult::new(snap_to_grid(point, self.config.grid_pitch()), SnapKind::Grid)
    }

    /// Snap a point to the opening sub-grid, each axis independently.
    pub fn snap_to_opening_grid(&self, point: Point) -> SnapResult {
        let units = &self.config.units;
        let step = self.config.opening_grid_cm;
        SnapResult::new(
            Point::new(units.round_to_cm_step(point.x, step), units.round_to_cm_step(point.y, step)),
            SnapKind::OpeningGrid,
        )
    }

    /// Project a point onto a host wall, then apply the opening sub-grid.
    pub fn snap_onto_wall(&self, point: Point, wall: &Wall) -> Point {
        self.snap_to_opening_grid(wall.project(point)).point
    }

    /// Place the centre of an opening on its host wall.
    ///
    /// The centre is kept at least `half_length` from either wall end so the
    /// whole opening stays on the wall, then snapped to the sub-grid. An
    /// opening as long as the wall is centred on it.
    pub fn slide_onto_wall(&self, center: Point, half_length: f64, wall: &Wall) -> Point {
        let length = wall.length();
        let (lo, hi) = if length > 2.0 * half_length {
            (half_length / length, 1.0 - half_length / length)
        } else {
            (0.5, 0.5)
        };
        let t = geometry::segment_parameter(center, wall.start, wall.end).clamp(lo, hi);
        let snapped = self.snap_to_opening_grid(wall.start.lerp(wall.end, t)).point;

        // Rounding to the sub-grid can step back over a limit.
        let snapped_t = geometry::segment_parameter(snapped, wall.start, wall.end);
        if (lo..=hi).contains(&snapped_t) {
            snapped
        } else {
            wall.start.lerp(wall.end, snapped_t.clamp(lo, hi))
        }
    }

    /// Quantize the direction of a wall being committed.
    pub fn snap_wall_direction(&self, start: Point, end: Point) -> AngleSnapResult {
        snap_wall_end(start, end, self.config.angle_step_degrees)
    }

    /// Pick the host wall for an opening drawn from `start` to `end`.
    ///
    /// Both points must be within the snap tolerance of the wall; among those
    /// walls the one with the smallest mean distance wins.
    pub fn find_host_wall(&self, start: Point, end: Point, walls: &[Wall]) -> Option<usize> {
        let tolerance = self.config.snap_tolerance();
        let mut best: Option<(usize, f64)> = None;
        for (index, wall) in walls.iter().enumerate() {
            let d1 = wall.distance_to(start);
            let d2 = wall.distance_to(end);
            if d1 < tolerance && d2 < tolerance {
                let mean = (d1 + d2) / 2.0;
                if best.is_none_or(|(_, best_mean)| mean < best_mean) {
                    best = Some((index, mean));
                }
            }
        }
        best.map(|(i, _)| i)
    }
}
