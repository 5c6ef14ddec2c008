//! The floor plan model: walls, openings and derived corners.

mod opening;
mod wall;

pub use opening::{Opening, OpeningKind};
pub use wall::Wall;

use crate::geometry;
use crate::topology::{self, Corner, Topology};
use kurbo::Vec2;
use serde::{Deserialize, Serialize};

/// One end of a wall or opening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentEnd {
    Start,
    End,
}

/// Authoritative store of walls and openings.
///
/// The wall list is the ground truth. Corners and the closed-shape flag are
/// recomputed from it after every structural edit. Openings address their
/// host wall by index; removing a wall cascades to its openings and renumbers
/// the rest so that no opening ever points at a missing wall.
#[derive(Debug, Clone)]
pub struct FloorPlan {
    walls: Vec<Wall>,
    openings: Vec<Opening>,
    topology: Topology,
    merge_tolerance: f64,
}

impl FloorPlan {
    /// Create an empty plan whose corners merge endpoints closer than `merge_tolerance`.
    pub fn new(merge_tolerance: f64) -> Self {
        Self {
            walls: Vec::new(),
            openings: Vec::new(),
            topology: Topology::default(),
            merge_tolerance,
        }
    }

    /// Create a plan from stored walls and openings.
    ///
    /// Openings whose host index does not address a wall are dropped.
    pub fn from_parts(walls: Vec<Wall>, openings: Vec<Opening>, merge_tolerance: f64) -> Self {
        let mut plan = Self::new(merge_tolerance);
        plan.replace(walls, openings);
        plan
    }

    /// Replace the whole content and rebuild the topology.
    pub fn replace(&mut self, walls: Vec<Wall>, openings: Vec<Opening>) {
        let wall_count = walls.len();
        self.walls = walls;
        self.openings = openings
            .into_iter()
            .filter(|o| {
                let live = o.wall < wall_count;
                if !live {
                    log::warn!("Skipping opening with missing host wall {}", o.wall);
                }
                live
            })
            .collect();
        self.rebuild_topology();
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    pub fn openings(&self) -> &[Opening] {
        &self.openings
    }

    pub fn corners(&self) -> &[Corner] {
        &self.topology.corners
    }

    pub fn is_closed(&self) -> bool {
        self.topology.closed
    }

    pub fn wall(&self, index: usize) -> Option<&Wall> {
        self.walls.get(index)
    }

    /// Mutable access for drag updates. Call [`Self::rebuild_topology`] once the drag ends.
    pub fn wall_mut(&mut self, index: usize) -> Option<&mut Wall> {
        self.walls.get_mut(index)
    }

    pub fn opening(&self, index: usize) -> Option<&Opening> {
        self.openings.get(index)
    }

    pub fn opening_mut(&mut self, index: usize) -> Option<&mut Opening> {
        self.openings.get_mut(index)
    }

    pub fn corner(&self, index: usize) -> Option<&Corner> {
        self.topology.corners.get(index)
    }

    /// Openings paired with their host wall. Orphans are skipped.
    pub fn openings_on_walls(&self) -> impl Iterator<Item = (&Opening, &Wall)> {
        self.openings
            .iter()
            .filter_map(|o| self.walls.get(o.wall).map(|w| (o, w)))
    }

    pub fn is_empty(&self) -> bool {
        self.walls.is_empty() && self.openings.is_empty()
    }

    /// Append a wall and rebuild the topology. Returns its index.
    pub fn add_wall(&mut self, wall: Wall) -> usize {
        self.walls.push(wall);
        self.rebuild_topology();
        self.walls.len() - 1
    }

    /// Append an opening. Returns `None` if its host wall does not exist.
    pub fn add_opening(&mut self, opening: Opening) -> Option<usize> {
        if opening.wall >= self.walls.len() {
            log::warn!("Rejecting opening for missing wall {}", opening.wall);
            return None;
        }
        self.openings.push(opening);
        Some(self.openings.len() - 1)
    }

    pub fn remove_opening(&mut self, index: usize) -> Option<Opening> {
        (index < self.openings.len()).then(|| self.openings.remove(index))
    }

    /// Remove a wall, its openings, and shift higher host indices down by one.
    pub fn remove_wall(&mut self, index: usize) -> Option<Wall> {
        let wall = self.detach_wall(index)?;
        self.rebuild_topology();
        Some(wall)
    }

    /// Remove a corner together with every wall meeting at it.
    ///
    /// Each wall removal cascades to its openings. Returns the removed walls.
    pub fn remove_corner(&mut self, index: usize) -> Vec<Wall> {
        let Some(corner) = self.topology.corners.get(index) else {
            return Vec::new();
        };
        let mut wall_indices = corner.walls.clone();
        // Highest first so the remaining indices stay valid.
        wall_indices.sort_unstable_by(|a, b| b.cmp(a));

        let removed: Vec<Wall> = wall_indices
            .into_iter()
            .filter_map(|i| self.detach_wall(i))
            .collect();
        self.rebuild_topology();
        removed
    }

    fn detach_wall(&mut self, index: usize) -> Option<Wall> {
        if index >= self.walls.len() {
            return None;
        }
        let wall = self.walls.remove(index);
        self.openings.retain(|o| o.wall != index);
        for opening in &mut self.openings {
            if opening.wall > index {
                opening.wall -= 1;
            }
        }
        Some(wall)
    }

    /// Translate a corner and every wall endpoint coincident with its old position.
    ///
    /// Only walls registered at the corner are considered; an endpoint counts as
    /// coincident when it lies within `tolerance` of the corner before the move.
    /// The corner cache is updated in place; it is rebuilt when the drag ends.
    pub fn move_corner(&mut self, index: usize, delta: Vec2, tolerance: f64) {
        let Some(corner) = self.topology.corners.get_mut(index) else {
            return;
        };
        let old = corner.position;
        corner.position += delta;

        for &wall_index in &corner.walls {
            let Some(wall) = self.walls.get_mut(wall_index) else {
                continue;
            };
            if geometry::distance(wall.start, old) < tolerance {
                wall.start += delta;
            }
            if geometry::distance(wall.end, old) < tolerance {
                wall.end += delta;
            }
        }
    }

    /// Recompute corners and the closed-shape flag from the wall list.
    pub fn rebuild_topology(&mut self) {
        let was_closed = self.topology.closed;
        self.topology = topology::analyze(&self.walls, self.merge_tolerance);
        log::debug!(
            "Rebuilt topology: {} walls, {} corners",
            self.walls.len(),
            self.topology.corners.len()
        );
        if self.topology.closed && !was_closed {
            log::info!("Closed shape detected");
        }
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.walls.clear();
        self.openings.clear();
        self.topology = Topology::default();
    }
}
