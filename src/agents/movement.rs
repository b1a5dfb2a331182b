//! Grid-step and continuous movement helpers shared by all agents.
//!
//! Thieves step one cell along the axis with the larger gap, tossing a coin
//! only on an exact diagonal. Planters toss whenever both gaps are non-zero.
//! Guard pets glide along the true bearing.

use bevy::prelude::*;
use rand::Rng;

use crate::shared::*;

/// One cell toward `to` along the axis with the larger gap.
pub fn step_toward(from: GridPos, to: GridPos, rng: &mut impl Rng) -> GridPos {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let along_x = match dx.abs().cmp(&dy.abs()) {
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Less => false,
        std::cmp::Ordering::Equal if dx == 0 => return from,
        std::cmp::Ordering::Equal => rng.gen_bool(0.5),
    };
    step_axis(from, dx, dy, along_x)
}

/// One cell toward `to`, picking the axis by coin toss when both gaps are
/// non-zero.
pub fn step_toward_coin(from: GridPos, to: GridPos, rng: &mut impl Rng) -> GridPos {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let along_x = match (dx != 0, dy != 0) {
        (false, false) => return from,
        (true, false) => true,
        (false, true) => false,
        (true, true) => rng.gen_bool(0.5),
    };
    step_axis(from, dx, dy, along_x)
}

fn step_axis(from: GridPos, dx: i32, dy: i32, along_x: bool) -> GridPos {
    if along_x {
        GridPos::new(from.x + dx.signum(), from.y)
    } else {
        GridPos::new(from.x, from.y + dy.signum())
    }
}

/// One cell directly away from `threat`, along the axis it is closer on.
pub fn step_away(from: GridPos, threat: Vec2, rng: &mut impl Rng) -> GridPos {
    let delta = from.as_vec2() - threat;
    let (ax, ay) = (delta.x.abs(), delta.y.abs());

    if ax == 0.0 && ay == 0.0 {
        let side = Side::ALL[rng.gen_range(0..Side::ALL.len())];
        return from.neighbor(side);
    }

    let along_x = if ax > ay {
        true
    } else if ay > ax {
        false
    } else {
        rng.gen_bool(0.5)
    };

    if along_x {
        GridPos::new(from.x + delta.x.signum() as i32, from.y)
    } else {
        GridPos::new(from.x, from.y + delta.y.signum() as i32)
    }
}

/// The closest cell just off the farm. Ties go West, East, North, South.
pub fn nearest_exit(pos: GridPos) -> GridPos {
    let exits = [
        (pos.x + 1, GridPos::new(-1, pos.y)),
        (GRID_SIZE - pos.x, GridPos::new(GRID_SIZE, pos.y)),
        (pos.y + 1, GridPos::new(pos.x, -1)),
        (GRID_SIZE - pos.y, GridPos::new(pos.x, GRID_SIZE)),
    ];
    let mut best = exits[0];
    for exit in &exits[1..] {
        if exit.0 < best.0 {
            best = *exit;
        }
    }
    best.1
}

/// Closest candidate by Euclidean distance; the first one seen wins ties.
pub fn nearest(origin: GridPos, candidates: impl IntoIterator<Item = GridPos>) -> Option<GridPos> {
    let mut best: Option<(f32, GridPos)> = None;
    for cell in candidates {
        let d = origin.distance(cell);
        if best.map_or(true, |(best_d, _)| d < best_d) {
            best = Some((d, cell));
        }
    }
    best.map(|(_, cell)| cell)
}

/// Move `speed` along the bearing to `to`, stopping on it rather than past it.
pub fn move_toward(from: Vec2, to: Vec2, speed: f32) -> Vec2 {
    let gap = to - from;
    let dist = gap.length();
    if dist <= speed || dist == 0.0 {
        to
    } else {
        from + gap / dist * speed
    }
}
