//! Agent creation: random thief arrivals and paid helpers.

use bevy::prelude::*;
use rand::Rng;

use crate::shared::*;
use super::{Agent, AgentId, AgentRegistry, AutoPlanter, GuardPet, Thief};

// ─────────────────────────────────────────────────────────────────────────────
// Thieves
// ─────────────────────────────────────────────────────────────────────────────

/// Put a thief on the farm, respecting the concurrent cap. Thieves are free.
pub fn spawn_thief(
    registry: &mut AgentRegistry,
    config: &SimConfig,
    pos: GridPos,
) -> Result<AgentId, Rejection> {
    if !pos.in_bounds() {
        return Err(Rejection::OutOfBounds(pos));
    }
    let active = registry.thief_count();
    if active >= config.max_thieves {
        return Err(Rejection::ThiefCap(active));
    }
    Ok(registry.spawn(Agent::Thief(Thief::new(pos))))
}

/// A uniformly random cell on a uniformly random border of the farm.
pub fn random_edge_cell(rng: &mut impl Rng) -> GridPos {
    let along = rng.gen_range(0..GRID_SIZE);
    match Side::ALL[rng.gen_range(0..Side::ALL.len())] {
        Side::North => GridPos::new(along, 0),
        Side::South => GridPos::new(along, GRID_SIZE - 1),
        Side::West => GridPos::new(0, along),
        Side::East => GridPos::new(GRID_SIZE - 1, along),
    }
}

/// One spawn roll. Thieves only come for ready crops.
pub fn roll_for_thief(
    registry: &mut AgentRegistry,
    farm_state: &FarmState,
    config: &SimConfig,
    rng: &mut impl Rng,
) -> Option<(AgentId, GridPos)> {
    if !farm_state.has_ready_crop() || registry.thief_count() >= config.max_thieves {
        return None;
    }
    if !rng.gen_bool(config.thief_spawn_chance.clamp(0.0, 1.0)) {
        return None;
    }
    let pos = random_edge_cell(rng);
    spawn_thief(registry, config, pos).ok().map(|id| (id, pos))
}

pub fn roll_thief_spawn(
    mut rolls: EventReader<SpawnRollEvent>,
    mut registry: ResMut<AgentRegistry>,
    farm_state: Res<FarmState>,
    config: Res<SimConfig>,
    mut rng: ResMut<SimRng>,
    mut spawned_events: EventWriter<ThiefSpawnedEvent>,
) {
    for _roll in rolls.read() {
        if let Some((thief, pos)) = roll_for_thief(&mut registry, &farm_state, &config, &mut rng.0) {
            info!("[Agents] Thief {} appeared at {:?}", thief, pos);
            spawned_events.send(ThiefSpawnedEvent { thief, pos });
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Paid helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Buy an auto-planter standing on soil at `pos`.
pub fn buy_planter(
    registry: &mut AgentRegistry,
    farm_state: &FarmState,
    economy: &mut Economy,
    config: &SimConfig,
    pos: GridPos,
) -> Result<AgentId, Rejection> {
    if !pos.in_bounds() {
        return Err(Rejection::OutOfBounds(pos));
    }
    if !farm_state.has_soil(pos) {
        return Err(Rejection::NoSoil(pos));
    }
    economy.try_debit(config.planter_price)?;
    Ok(registry.spawn(Agent::Planter(AutoPlanter::new(pos))))
}

/// Buy a guard pet at `pos`.
pub fn buy_pet(
    registry: &mut AgentRegistry,
    structures: &Structures,
    economy: &mut Economy,
    kind: PetKind,
    pos: GridPos,
) -> Result<AgentId, Rejection> {
    if !pos.in_bounds() {
        return Err(Rejection::OutOfBounds(pos));
    }
    if structures.is_built(pos) {
        return Err(Rejection::Occupied(pos));
    }
    economy.try_debit(kind.price())?;
    Ok(registry.spawn(Agent::Guard(GuardPet::new(kind, pos))))
}

pub fn handle_spawn_npc(
    mut events: EventReader<SpawnNpcEvent>,
    mut registry: ResMut<AgentRegistry>,
    farm_state: Res<FarmState>,
    mut economy: ResMut<Economy>,
    config: Res<SimConfig>,
    mut spawned_events: EventWriter<ThiefSpawnedEvent>,
    mut purchased_events: EventWriter<AgentPurchasedEvent>,
    mut money_events: EventWriter<MoneyChangeEvent>,
) {
    for ev in events.read() {
        match ev.kind {
            NpcKind::Thief => match spawn_thief(&mut registry, &config, ev.pos) {
                Ok(thief) => {
                    info!("[Agents] Thief {} placed at {:?}", thief, ev.pos);
                    spawned_events.send(ThiefSpawnedEvent { thief, pos: ev.pos });
                }
                Err(reason) => debug!("[Agents] Thief at {:?} rejected: {}", ev.pos, reason),
            },
            NpcKind::Planter => {
                match buy_planter(&mut registry, &farm_state, &mut economy, &config, ev.pos) {
                    Ok(agent) => {
                        info!("[Agents] Planter {} bought at {:?}", agent, ev.pos);
                        purchased_events.send(AgentPurchasedEvent {
                            agent,
                            item: BuildItem::Planter,
                            pos: ev.pos,
                        });
                        money_events.send(MoneyChangeEvent {
                            amount: -i64::from(config.planter_price),
                            reason: "auto-planter".to_string(),
                        });
                    }
                    Err(reason) => debug!("[Agents] Planter at {:?} rejected: {}", ev.pos, reason),
                }
            }
        }
    }
}

pub fn handle_spawn_pet(
    mut events: EventReader<SpawnPetEvent>,
    mut registry: ResMut<AgentRegistry>,
    structures: Res<Structures>,
    mut economy: ResMut<Economy>,
    mut purchased_events: EventWriter<AgentPurchasedEvent>,
    mut money_events: EventWriter<MoneyChangeEvent>,
) {
    for ev in events.read() {
        match buy_pet(&mut registry, &structures, &mut economy, ev.kind, ev.pos) {
            Ok(agent) => {
                info!("[Agents] {:?} {} bought at {:?}", ev.kind, agent, ev.pos);
                let item = match ev.kind {
                    PetKind::Dog => BuildItem::Dog,
                };
                purchased_events.send(AgentPurchasedEvent {
                    agent,
                    item,
                    pos: ev.pos,
                });
                money_events.send(MoneyChangeEvent {
                    amount: -i64::from(ev.kind.price()),
                    reason: format!("{:?}", ev.kind),
                });
            }
            Err(reason) => debug!("[Agents] {:?} at {:?} rejected: {}", ev.kind, ev.pos, reason),
        }
    }
}
