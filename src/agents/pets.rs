//! Guard pets, resolved on every fine tick.

use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::TAU;

use crate::shared::*;
use super::movement::move_toward;
use super::{AgentId, AgentRegistry, GuardPet};

/// Patrol points closer than this count as reached.
const ARRIVE_EPSILON: f32 = 0.1;

/// Chase the nearest thief in range, otherwise patrol around home.
///
/// Returns the thief caught this tick, if any.
pub fn advance_guard(
    guard: &mut GuardPet,
    thieves: &[(AgentId, Vec2)],
    config: &SimConfig,
    rng: &mut impl Rng,
) -> Option<AgentId> {
    let range = guard.kind.range();
    let prey = thieves
        .iter()
        .copied()
        .filter(|(_, pos)| pos.distance(guard.pos) <= range)
        .min_by(|a, b| a.1.distance(guard.pos).total_cmp(&b.1.distance(guard.pos)));

    if let Some((thief, thief_pos)) = prey {
        guard.patrol = None;
        guard.pos = move_toward(guard.pos, thief_pos, guard.kind.chase_speed());
        return (guard.pos.distance(thief_pos) <= config.catch_radius).then_some(thief);
    }

    let radius = guard.kind.patrol_radius()?;
    let target = *guard
        .patrol
        .get_or_insert_with(|| patrol_point(guard.home, radius, rng));
    guard.pos = move_toward(guard.pos, target, guard.kind.patrol_speed());
    if guard.pos.distance(target) < ARRIVE_EPSILON {
        guard.patrol = None;
    }
    None
}

/// A random point within `radius` of `home`, kept on the farm.
fn patrol_point(home: Vec2, radius: f32, rng: &mut impl Rng) -> Vec2 {
    let angle = rng.gen_range(0.0..TAU);
    let dist = rng.gen_range(0.0..=radius);
    let max = (GRID_SIZE - 1) as f32;
    (home + Vec2::from_angle(angle) * dist).clamp(Vec2::ZERO, Vec2::splat(max))
}

/// Move every guard pet and remove the thieves they catch.
pub fn step_guards(
    registry: &mut AgentRegistry,
    config: &SimConfig,
    rng: &mut impl Rng,
) -> Vec<(AgentId, GridPos)> {
    let mut thieves: Vec<(AgentId, Vec2)> = registry
        .thieves()
        .map(|(id, thief)| (id, thief.pos.as_vec2()))
        .collect();

    let mut caught = Vec::new();
    for (_, guard) in registry.guards_mut() {
        if let Some(thief) = advance_guard(guard, &thieves, config, rng) {
            if let Some(index) = thieves.iter().position(|(id, _)| *id == thief) {
                let (_, pos) = thieves.swap_remove(index);
                caught.push((thief, GridPos::from_vec2(pos)));
            }
        }
    }

    for (thief, _) in &caught {
        registry.remove(*thief);
    }
    caught
}

// ─────────────────────────────────────────────────────────────────────────────
// System
// ─────────────────────────────────────────────────────────────────────────────

pub fn on_fine_tick(
    mut ticks: EventReader<FineTickEvent>,
    mut registry: ResMut<AgentRegistry>,
    config: Res<SimConfig>,
    mut rng: ResMut<SimRng>,
    mut removed_events: EventWriter<ThiefRemovedEvent>,
) {
    for _tick in ticks.read() {
        if registry.guards().next().is_none() {
            continue;
        }
        for (thief, pos) in step_guards(&mut registry, &config, &mut rng.0) {
            info!("[Agents] Guard caught thief {} at {:?}", thief, pos);
            removed_events.send(ThiefRemovedEvent {
                thief,
                pos,
                reason: ThiefExit::Caught,
            });
        }
    }
}
