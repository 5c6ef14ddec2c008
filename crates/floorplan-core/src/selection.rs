//! Edit-mode hit testing.
//!
//! An edit gesture acts on exactly one target, chosen when the pointer goes
//! down: a corner first, then an opening, then a wall.

use crate::config::EditorConfig;
use crate::geometry;
use crate::plan::{FloorPlan, SegmentEnd};
use crate::snap;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// What an edit drag acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum EditTarget {
    #[default]
    None,
    /// Move a whole wall.
    WallWhole(usize),
    /// Move one end of a wall.
    WallEndpoint(usize, SegmentEnd),
    /// Move a corner and every wall end meeting at it.
    Corner(usize),
    /// Slide an opening along its host wall.
    OpeningWhole(usize),
    /// Stretch one end of an opening along its host wall.
    OpeningEndpoint(usize, SegmentEnd),
}

impl EditTarget {
    pub fn is_none(&self) -> bool {
        matches!(self, EditTarget::None)
    }

    /// Whether editing this target changes the wall structure.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            EditTarget::WallWhole(_) | EditTarget::WallEndpoint(..) | EditTarget::Corner(_)
        )
    }
}

/// Find the edit target under a world point.
pub fn resolve_edit_target(point: Point, plan: &FloorPlan, config: &EditorConfig) -> EditTarget {
    if let Some(corner) = snap::find_corner(point, plan.corners(), config.corner_hit_tolerance()) {
        return EditTarget::Corner(corner);
    }

    let tolerance = config.edit_tolerance();
    if let Some(target) = hit_opening(point, plan, tolerance) {
        return target;
    }
    hit_wall(point, plan, tolerance).unwrap_or_default()
}

fn hit_opening(point: Point, plan: &FloorPlan, tolerance: f64) -> Option<EditTarget> {
    let mut best: Option<(usize, f64)> = None;
    for (index, opening) in plan.openings().iter().enumerate() {
        let dist = opening.distance_to(point);
        if dist < tolerance && best.is_none_or(|(_, best_dist)| dist < best_dist) {
            best = Some((index, dist));
        }
    }

    let (index, _) = best?;
    let opening = &plan.openings()[index];
    if geometry::distance(point, opening.center()) < tolerance {
        Some(EditTarget::OpeningWhole(index))
    } else {
        Some(EditTarget::OpeningEndpoint(index, opening.nearer_end(point)))
    }
}

fn hit_wall(point: Point, plan: &FloorPlan, tolerance: f64) -> Option<EditTarget> {
    let mut best: Option<(EditTarget, f64)> = None;
    for (index, wall) in plan.walls().iter().enumerate() {
        let to_mid = geometry::distance(point, wall.midpoint());
        let to_start = geometry::distance(point, wall.start);
        let to_end = geometry::distance(point, wall.end);

        // Midpoint, then start, then end on ties.
        let (target, dist) = if to_mid <= to_start && to_mid <= to_end {
            (EditTarget::WallWhole(index), to_mid)
        } else if to_start <= to_end {
            (EditTarget::WallEndpoint(index, SegmentEnd::Start), to_start)
        } else {
            (EditTarget::WallEndpoint(index, SegmentEnd::End), to_end)
        };

        if dist < tolerance && best.is_none_or(|(_, best_dist)| dist < best_dist) {
            best = Some((target, dist));
        }
    }
    best.map(|(target, _)| target)
}
