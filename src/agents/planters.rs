//! Auto-planters: walk the soil, harvest what is ready, replant what is bare.

use bevy::prelude::*;
use rand::Rng;

use crate::shared::*;
use super::movement::{nearest, step_toward_coin};
use super::{AgentId, AgentRegistry, AutoPlanter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanterOutcome {
    Harvested { kind: CropKind, pos: GridPos },
    Planted { kind: CropKind, pos: GridPos },
}

/// Resolve one agent tick for a single planter.
pub fn advance_planter(
    planter: &mut AutoPlanter,
    farm_state: &mut FarmState,
    economy: &mut Economy,
    config: &SimConfig,
    rng: &mut impl Rng,
) -> Option<PlanterOutcome> {
    let here = planter.pos;

    if farm_state.is_ready(here) {
        planter.target = None;
        planter.countdown = None;
        let kind = farm_state.harvest(here, economy).ok()?;
        return Some(PlanterOutcome::Harvested { kind, pos: here });
    }

    match planter.countdown {
        None if farm_state.is_empty_soil(here) => {
            planter.countdown = Some(config.plant_delay_ticks);
            None
        }
        Some(remaining) if remaining > 1 => {
            planter.countdown = Some(remaining - 1);
            None
        }
        Some(_) => {
            planter.countdown = None;
            planter.target = None;
            if !farm_state.is_empty_soil(here) {
                return None;
            }
            let kind = CropKind::ALL[rng.gen_range(0..CropKind::ALL.len())];
            farm_state.plant(here, kind).ok()?;
            Some(PlanterOutcome::Planted { kind, pos: here })
        }
        None => {
            let still_useful = planter
                .target
                .is_some_and(|target| farm_state.is_ready(target) || farm_state.is_empty_soil(target));
            if !still_useful {
                planter.target = pick_target(here, farm_state);
            }
            if let Some(target) = planter.target {
                planter.pos = step_toward_coin(here, target, rng);
                if planter.pos == target {
                    planter.target = None;
                }
            }
            None
        }
    }
}

/// Nearest ready crop, else nearest bare soil.
fn pick_target(pos: GridPos, farm_state: &FarmState) -> Option<GridPos> {
    nearest(pos, farm_state.ready_crops()).or_else(|| {
        nearest(
            pos,
            farm_state
                .soil
                .iter()
                .copied()
                .filter(|cell| !farm_state.crops.contains_key(cell)),
        )
    })
}

pub fn step_planters(
    registry: &mut AgentRegistry,
    farm_state: &mut FarmState,
    economy: &mut Economy,
    config: &SimConfig,
    rng: &mut impl Rng,
) -> Vec<(AgentId, PlanterOutcome)> {
    let mut outcomes = Vec::new();
    for (id, planter) in registry.planters_mut() {
        if let Some(outcome) = advance_planter(planter, farm_state, economy, config, rng) {
            outcomes.push((id, outcome));
        }
    }
    outcomes
}

// ─────────────────────────────────────────────────────────────────────────────
// System
// ─────────────────────────────────────────────────────────────────────────────

pub fn on_agent_tick(
    mut ticks: EventReader<AgentTickEvent>,
    mut registry: ResMut<AgentRegistry>,
    mut farm_state: ResMut<FarmState>,
    mut economy: ResMut<Economy>,
    config: Res<SimConfig>,
    mut rng: ResMut<SimRng>,
    mut harvested_events: EventWriter<CropHarvestedEvent>,
) {
    for _tick in ticks.read() {
        let outcomes = step_planters(
            &mut registry,
            &mut farm_state,
            &mut economy,
            &config,
            &mut rng.0,
        );
        for (planter, outcome) in outcomes {
            match outcome {
                PlanterOutcome::Harvested { kind, pos } => {
                    info!("[Agents] Planter {} harvested {:?} at {:?}", planter, kind, pos);
                    harvested_events.send(CropHarvestedEvent {
                        kind,
                        pos,
                        by: Harvester::Planter(planter),
                    });
                }
                PlanterOutcome::Planted { kind, pos } => {
                    debug!("[Agents] Planter {} planted {:?} at {:?}", planter, kind, pos);
                }
            }
        }
    }
}
