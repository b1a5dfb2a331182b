//! Enclosure validator.
//!
//! Walls are the canonical fence edges plus every pen perimeter. A region is
//! enclosed when a 4-connected fill from a cell can never step across an open
//! edge onto a cell outside the farm. Nothing is cached: fences and pens can
//! change between placements.

use std::collections::{BTreeSet, HashSet};

use crate::shared::*;

/// A closed region of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enclosure {
    pub cells: BTreeSet<GridPos>,
}

impl Enclosure {
    pub fn area(&self) -> usize {
        self.cells.len()
    }

    /// Smallest cell of the region; identifies it while walls stay put.
    pub fn anchor(&self) -> Option<GridPos> {
        self.cells.first().copied()
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        self.cells.contains(&pos)
    }
}

/// Find the enclosure containing `start`, or `None` if the region leaks.
pub fn find_enclosure(structures: &Structures, start: GridPos) -> Option<Enclosure> {
    flood_fill(&structures.wall_edges(), start)
}

/// Iterative fill over an explicit stack. Leaving the farm means the region
/// is open.
pub fn flood_fill(walls: &HashSet<FenceEdge>, start: GridPos) -> Option<Enclosure> {
    if !start.in_bounds() {
        return None;
    }

    let mut region = BTreeSet::new();
    let mut stack = vec![start];
    region.insert(start);

    while let Some(cell) = stack.pop() {
        for side in Side::ALL {
            if walls.contains(&FenceEdge::new(cell, side).canonical()) {
                continue;
            }
            let next = cell.neighbor(side);
            if !next.in_bounds() {
                return None;
            }
            if region.insert(next) {
                stack.push(next);
            }
        }
    }

    let enclosure = Enclosure { cells: region };
    is_closed(walls, &enclosure).then_some(enclosure)
}

/// Every edge of every cell is either walled or shared with another cell of
/// the region.
fn is_closed(walls: &HashSet<FenceEdge>, enclosure: &Enclosure) -> bool {
    enclosure.cells.iter().all(|&cell| {
        Side::ALL.into_iter().all(|side| {
            walls.contains(&FenceEdge::new(cell, side).canonical())
                || enclosure.contains(cell.neighbor(side))
        })
    })
}

/// Canonical edges ringing a `w × h` rectangle. Handy for building fences.
pub fn rectangle_perimeter(top_left: GridPos, w: i32, h: i32) -> Vec<FenceEdge> {
    let mut edges = Vec::new();
    for dx in 0..w {
        edges.push(FenceEdge::new(GridPos::new(top_left.x + dx, top_left.y), Side::North).canonical());
        edges.push(FenceEdge::new(GridPos::new(top_left.x + dx, top_left.y + h - 1), Side::South).canonical());
    }
    for dy in 0..h {
        edges.push(FenceEdge::new(GridPos::new(top_left.x, top_left.y + dy), Side::West).canonical());
        edges.push(FenceEdge::new(GridPos::new(top_left.x + w - 1, top_left.y + dy), Side::East).canonical());
    }
    edges
}
