//! Corner points and closed-shape classification derived from the wall list.
//!
//! Nothing here is authoritative: [`analyze`] rebuilds everything from the
//! walls and the result is thrown away on the next structural edit.

use crate::geometry;
use crate::plan::Wall;
use kurbo::Point;

/// A vertex shared by one or more wall endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct Corner {
    /// Position in world coordinates (the first endpoint that created it).
    pub position: Point,
    /// Indices of the walls with an endpoint at this corner, without duplicates.
    pub walls: Vec<usize>,
}

impl Corner {
    fn new(position: Point) -> Self {
        Self {
            position,
            walls: Vec::new(),
        }
    }

    /// Number of distinct walls meeting here.
    pub fn degree(&self) -> usize {
        self.walls.len()
    }

    fn register(&mut self, wall: usize) {
        if !self.walls.contains(&wall) {
            self.walls.push(wall);
        }
    }
}

/// Derived topology of a wall list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Topology {
    /// Corners in creation order.
    pub corners: Vec<Corner>,
    /// Whether the walls form a closed loop.
    pub closed: bool,
}

/// Rebuild corners and the closed-shape flag from scratch.
///
/// Endpoints closer than `merge_tolerance` to an existing corner join it;
/// corners are scanned in creation order and the first match wins.
pub fn analyze(walls: &[Wall], merge_tolerance: f64) -> Topology {
    let mut corners: Vec<Corner> = Vec::new();
    // Corner index of (start, end) for every wall.
    let mut edges = Vec::with_capacity(walls.len());

    for (index, wall) in walls.iter().enumerate() {
        let a = find_or_create(&mut corners, wall.start, merge_tolerance);
        corners[a].register(index);
        let b = find_or_create(&mut corners, wall.end, merge_tolerance);
        corners[b].register(index);
        edges.push((a, b));
    }

    let closed = is_closed(&corners, &edges);
    Topology { corners, closed }
}

fn find_or_create(corners: &mut Vec<Corner>, point: Point, tolerance: f64) -> usize {
    if let Some(index) = corners
        .iter()
        .position(|c| geometry::distance(c.position, point) < tolerance)
    {
        return index;
    }
    corners.push(Corner::new(point));
    corners.len() - 1
}

/// Closed iff there are at least three corners, every corner joins two or
/// more walls, and the corner graph contains a cycle.
fn is_closed(corners: &[Corner], edges: &[(usize, usize)]) -> bool {
    // No test on the distance between the first and last corner: corner order
    // follows wall creation order, so such a test rejects a closed triangle
    // drawn out of sequence. The cycle search below covers it.
    if corners.len() < 3 || corners.iter().any(|c| c.degree() < 2) {
        return false;
    }

    let mut parent: Vec<usize> = (0..corners.len()).collect();
    for &(a, b) in edges {
        // Walls collapsed onto a single corner are not edges.
        if a == b {
            continue;
        }
        let root_a = find_root(&mut parent, a);
        let root_b = find_root(&mut parent, b);
        if root_a == root_b {
            return true;
        }
        parent[root_a] = root_b;
    }
    false
}

fn find_root(parent: &mut [usize], mut node: usize) -> usize {
    while parent[node] != node {
        parent[node] = parent[parent[node]];
        node = parent[node];
    }
    node
}
