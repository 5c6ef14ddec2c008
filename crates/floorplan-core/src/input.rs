//! Pointer events and the two-pointer pan/zoom gesture.

use crate::camera::Camera;
use crate::geometry;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Minimum pointer spacing, in screen pixels, for a pinch to scale.
const MIN_PINCH_SPACING: f64 = 10.0;

/// Pointer event in screen coordinates.
///
/// Each variant carries the positions of every pointer currently involved,
/// in the order the input dispatcher reports them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    /// A pointer touched down.
    Down { positions: Vec<Point> },
    /// One or more pointers moved.
    Move { positions: Vec<Point> },
    /// A pointer lifted. `positions` includes the lifted pointer.
    Up { positions: Vec<Point> },
    /// The platform aborted the gesture.
    Cancel,
}

impl PointerEvent {
    /// Positions carried by the event.
    pub fn positions(&self) -> &[Point] {
        match self {
            PointerEvent::Down { positions }
            | PointerEvent::Move { positions }
            | PointerEvent::Up { positions } => positions,
            PointerEvent::Cancel => &[],
        }
    }

    /// Number of pointers involved.
    pub fn pointer_count(&self) -> usize {
        self.positions().len()
    }

    /// Position of the primary pointer, if any.
    pub fn primary(&self) -> Option<Point> {
        self.positions().first().copied()
    }
}

/// Tracks a two-pointer pan/zoom gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pinch {
    previous_mid: Point,
    previous_spacing: f64,
}

impl Pinch {
    /// Start tracking from the first two pointer positions.
    pub fn begin(a: Point, b: Point) -> Self {
        Self {
            previous_mid: geometry::midpoint(a, b),
            previous_spacing: geometry::distance(a, b),
        }
    }

    /// Pan by the midpoint movement, then scale about the new midpoint.
    ///
    /// Scaling is skipped while the previous spacing is too small to give a
    /// stable ratio.
    pub fn update(&mut self, a: Point, b: Point, camera: &mut Camera) {
        let mid = geometry::midpoint(a, b);
        camera.pan(mid - self.previous_mid);
        self.previous_mid = mid;

        let spacing = geometry::distance(a, b);
        if self.previous_spacing > MIN_PINCH_SPACING {
            camera.zoom_at(mid, spacing / self.previous_spacing);
            self.previous_spacing = spacing;
        }
    }
}
