//! Windows and doors anchored to a host wall.

use super::{SegmentEnd, Wall};
use crate::geometry;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Kind of opening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OpeningKind {
    Window,
    Door,
}

/// A window or door lying on the line of its host wall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "OpeningRecord", into = "OpeningRecord")]
pub struct Opening {
    pub start: Point,
    pub end: Point,
    pub kind: OpeningKind,
    /// Index of the host wall in the plan's wall list.
    pub wall: usize,
}

/// Persisted form of an opening.
#[derive(Serialize, Deserialize)]
struct OpeningRecord {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    #[serde(alias = "type")]
    kind: OpeningKind,
    #[serde(rename = "parentWallIndex")]
    parent_wall_index: usize,
}

impl From<OpeningRecord> for Opening {
    fn from(r: OpeningRecord) -> Self {
        Self {
            start: Point::new(r.x1, r.y1),
            end: Point::new(r.x2, r.y2),
            kind: r.kind,
            wall: r.parent_wall_index,
        }
    }
}

impl From<Opening> for OpeningRecord {
    fn from(o: Opening) -> Self {
        Self {
            x1: o.start.x,
            y1: o.start.y,
            x2: o.end.x,
            y2: o.end.y,
            kind: o.kind,
            parent_wall_index: o.wall,
        }
    }
}

impl Opening {
    pub fn new(start: Point, end: Point, kind: OpeningKind, wall: usize) -> Self {
        Self { start, end, kind, wall }
    }

    pub fn length(&self) -> f64 {
        geometry::distance(self.start, self.end)
    }

    pub fn center(&self) -> Point {
        geometry::midpoint(self.start, self.end)
    }

    pub fn endpoint(&self, end: SegmentEnd) -> Point {
        match end {
            SegmentEnd::Start => self.start,
            SegmentEnd::End => self.end,
        }
    }

    pub fn endpoint_mut(&mut self, end: SegmentEnd) -> &mut Point {
        match end {
            SegmentEnd::Start => &mut self.start,
            SegmentEnd::End => &mut self.end,
        }
    }

    /// Distance from `point` to the opening's endpoints or segment, whichever is nearest.
    pub fn distance_to(&self, point: Point) -> f64 {
        geometry::distance_to_segment(point, self.start, self.end)
    }

    /// Both endpoints clamped onto the host wall segment.
    pub fn projected_on(&self, wall: &Wall) -> (Point, Point) {
        (wall.project(self.start), wall.project(self.end))
    }

    /// The endpoint nearer to `point`; the start wins only when strictly nearer.
    pub fn nearer_end(&self, point: Point) -> SegmentEnd {
        if geometry::distance(point, self.start) < geometry::distance(point, self.end) {
            SegmentEnd::Start
        } else {
            SegmentEnd::End
        }
    }
}
