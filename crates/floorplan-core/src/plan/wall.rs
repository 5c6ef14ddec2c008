//! Wall segment.

use super::SegmentEnd;
use crate::geometry;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// A straight wall between two points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WallRecord", into = "WallRecord")]
pub struct Wall {
    /// Start point in world coordinates.
    pub start: Point,
    /// End point in world coordinates.
    pub end: Point,
    /// Thickness in centimetres.
    pub thickness: u32,
}

/// Persisted form of a wall.
#[derive(Serialize, Deserialize)]
struct WallRecord {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    thickness: u32,
}

impl From<WallRecord> for Wall {
    fn from(r: WallRecord) -> Self {
        Self::new(Point::new(r.x1, r.y1), Point::new(r.x2, r.y2), r.thickness)
    }
}

impl From<Wall> for WallRecord {
    fn from(w: Wall) -> Self {
        Self {
            x1: w.start.x,
            y1: w.start.y,
            x2: w.end.x,
            y2: w.end.y,
            thickness: w.thickness,
        }
    }
}

impl Wall {
    pub fn new(start: Point, end: Point, thickness: u32) -> Self {
        Self { start, end, thickness }
    }

    /// Length in world units.
    pub fn length(&self) -> f64 {
        geometry::distance(self.start, self.end)
    }

    pub fn midpoint(&self) -> Point {
        geometry::midpoint(self.start, self.end)
    }

    /// Unit normal of the wall. Very short walls use a length of 1 to stay finite.
    pub fn normal(&self) -> Vec2 {
        let d = self.end - self.start;
        let length = self.length().max(1.0);
        Vec2::new(-d.y / length, d.x / length)
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

    /// Distance from `point` to the wall segment.
    pub fn distance_to(&self, point: Point) -> f64 {
        geometry::distance_to_segment(point, self.start, self.end)
    }

    /// Closest point on the wall segment.
    pub fn project(&self, point: Point) -> Point {
        geometry::project_onto_segment(point, self.start, self.end)
    }

    /// Translate the whole wall.
    pub fn translate(&mut self, delta: Vec2) {
        self.start += delta;
        self.end += delta;
    }
}
