//! Thief behaviour, resolved once per agent tick.
//!
//! A thief walks to the nearest ready crop, stands on it for the steal delay
//! and takes it without paying anyone. With nothing ready it walks off the
//! nearest border. A guard pet inside the alert radius overrides everything:
//! the thief runs straight away from the closest one.

use bevy::prelude::*;
use rand::Rng;

use crate::shared::*;
use super::movement::{nearest, nearest_exit, step_away, step_toward};
use super::{AgentId, AgentRegistry, Thief, ThiefMode};

/// What happened to a thief on one tick, beyond moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThiefOutcome {
    Stole { kind: CropKind, pos: GridPos },
    Left { pos: GridPos, reason: ThiefExit },
}

/// Resolve one agent tick for a single thief.
pub fn advance_thief(
    thief: &mut Thief,
    farm_state: &mut FarmState,
    guards: &[Vec2],
    config: &SimConfig,
    rng: &mut impl Rng,
) -> Option<ThiefOutcome> {
    // ── Guard alert ────────────────────────────────────────────────────────
    let here = thief.pos.as_vec2();
    let threat = guards
        .iter()
        .copied()
        .filter(|guard| guard.distance(here) <= config.alert_radius)
        .min_by(|a, b| a.distance(here).total_cmp(&b.distance(here)));

    if let Some(guard) = threat {
        if GridPos::from_vec2(guard) == thief.pos {
            return Some(ThiefOutcome::Left {
                pos: thief.pos,
                reason: ThiefExit::Caught,
            });
        }
        thief.mode = ThiefMode::Fleeing;
        thief.pos = step_away(thief.pos, guard, rng);
        return (!thief.pos.in_bounds()).then_some(ThiefOutcome::Left {
            pos: thief.pos,
            reason: ThiefExit::Escaped,
        });
    }

    // ── Steal countdown ────────────────────────────────────────────────────
    if let ThiefMode::Stealing { target, remaining } = thief.mode {
        if farm_state.is_ready(target) {
            let remaining = remaining.saturating_sub(1);
            if remaining > 0 {
                thief.mode = ThiefMode::Stealing { target, remaining };
                return None;
            }
            let stolen = farm_state.take_ready(target).ok();
            thief.mode = choose_goal(thief.pos, farm_state);
            return stolen.map(|crop| ThiefOutcome::Stole {
                kind: crop.kind,
                pos: target,
            });
        }
    }

    // ── Retarget and step ──────────────────────────────────────────────────
    thief.mode = choose_goal(thief.pos, farm_state);
    match thief.mode {
        ThiefMode::Approaching { target } => {
            if thief.pos != target {
                thief.pos = step_toward(thief.pos, target, rng);
            }
            if thief.pos == target {
                thief.mode = ThiefMode::Stealing {
                    target,
                    remaining: config.steal_delay_ticks,
                };
            }
            None
        }
        ThiefMode::Escaping { exit } => {
            thief.pos = step_toward(thief.pos, exit, rng);
            (!thief.pos.in_bounds()).then_some(ThiefOutcome::Left {
                pos: thief.pos,
                reason: ThiefExit::Escaped,
            })
        }
        _ => None,
    }
}

/// Nearest ready crop, or the nearest way off the farm.
fn choose_goal(pos: GridPos, farm_state: &FarmState) -> ThiefMode {
    match nearest(pos, farm_state.ready_crops()) {
        Some(target) => ThiefMode::Approaching { target },
        None => ThiefMode::Escaping {
            exit: nearest_exit(pos),
        },
    }
}

/// Advance every thief and drop those that left. Outcomes are in id order.
pub fn step_thieves(
    registry: &mut AgentRegistry,
    farm_state: &mut FarmState,
    config: &SimConfig,
    rng: &mut impl Rng,
) -> Vec<(AgentId, ThiefOutcome)> {
    let guards: Vec<Vec2> = registry.guards().map(|(_, guard)| guard.pos).collect();

    let mut outcomes = Vec::new();
    for (id, thief) in registry.thieves_mut() {
        if let Some(outcome) = advance_thief(thief, farm_state, &guards, config, rng) {
            outcomes.push((id, outcome));
        }
    }

    for (id, outcome) in &outcomes {
        if let ThiefOutcome::Left { .. } = outcome {
            registry.remove(*id);
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
    config: Res<SimConfig>,
    mut rng: ResMut<SimRng>,
    mut stolen_events: EventWriter<CropStolenEvent>,
    mut removed_events: EventWriter<ThiefRemovedEvent>,
) {
    for _tick in ticks.read() {
        for (thief, outcome) in step_thieves(&mut registry, &mut farm_state, &config, &mut rng.0) {
            match outcome {
                ThiefOutcome::Stole { kind, pos } => {
                    info!("[Agents] Thief {} stole {:?} at {:?}", thief, kind, pos);
                    stolen_events.send(CropStolenEvent { kind, pos, thief });
                }
                ThiefOutcome::Left { pos, reason } => {
                    info!("[Agents] Thief {} {:?} at {:?}", thief, reason, pos);
                    removed_events.send(ThiefRemovedEvent { thief, pos, reason });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::Agent;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ready_at(farm: &mut FarmState, pos: GridPos) {
        farm.soil.insert(pos);
        farm.crops.insert(
            pos,
            Crop {
                kind: CropKind::Carrot,
                stage: CropStage::Ready,
                timer: 0,
            },
        );
    }

    #[test]
    fn test_thief_targets_nearest_ready_crop() {
        let mut farm = FarmState::default();
        ready_at(&mut farm, GridPos::new(10, 0));
        ready_at(&mut farm, GridPos::new(3, 0));
        farm.soil.insert(GridPos::new(1, 0));
        farm.plant(GridPos::new(1, 0), CropKind::Wheat).unwrap();

        let mut thief = Thief::new(GridPos::new(0, 0));
        let mut rng = StdRng::seed_from_u64(1);
        advance_thief(&mut thief, &mut farm, &[], &SimConfig::default(), &mut rng);

        assert_eq!(thief.pos, GridPos::new(1, 0));
        assert_eq!(thief.mode, ThiefMode::Approaching { target: GridPos::new(3, 0) });
    }

    #[test]
    fn test_steal_countdown_then_crop_vanishes_uncredited() {
        let mut farm = FarmState::default();
        let crop = GridPos::new(2, 0);
        ready_at(&mut farm, crop);
        let config = SimConfig::default();
        let mut rng = StdRng::seed_from_u64(2);
        let mut thief = Thief::new(GridPos::new(0, 0));

        // two steps to arrive
        assert_eq!(advance_thief(&mut thief, &mut farm, &[], &config, &mut rng), None);
        assert_eq!(advance_thief(&mut thief, &mut farm, &[], &config, &mut rng), None);
        assert_eq!(thief.steal_countdown(), Some(5));

        for _ in 0..4 {
            assert_eq!(advance_thief(&mut thief, &mut farm, &[], &config, &mut rng), None);
            assert_eq!(thief.pos, crop);
        }
        assert_eq!(thief.steal_countdown(), Some(1));

        let outcome = advance_thief(&mut thief, &mut farm, &[], &config, &mut rng);
        assert_eq!(
            outcome,
            Some(ThiefOutcome::Stole {
                kind: CropKind::Carrot,
                pos: crop
            })
        );
        assert!(farm.crops.is_empty());
        assert!(matches!(thief.mode, ThiefMode::Escaping { .. }));
    }

    #[test]
    fn test_thief_retargets_when_crop_harvested_mid_countdown() {
        let mut farm = FarmState::default();
        let mut economy = Economy::default();
        ready_at(&mut farm, GridPos::new(1, 0));
        ready_at(&mut farm, GridPos::new(1, 4));
        let config = SimConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let mut thief = Thief::new(GridPos::new(0, 0));

        advance_thief(&mut thief, &mut farm, &[], &config, &mut rng);
        assert_eq!(thief.steal_countdown(), Some(5));

        farm.harvest(GridPos::new(1, 0), &mut economy).unwrap();
        advance_thief(&mut thief, &mut farm, &[], &config, &mut rng);
        assert_eq!(thief.mode, ThiefMode::Approaching { target: GridPos::new(1, 4) });
        assert_eq!(thief.pos, GridPos::new(1, 1));
    }

    #[test]
    fn test_thief_walks_off_farm_without_targets() {
        let mut farm = FarmState::default();
        let config = SimConfig::default();
        let mut rng = StdRng::seed_from_u64(4);
        let mut thief = Thief::new(GridPos::new(1, 9));

        assert_eq!(advance_thief(&mut thief, &mut farm, &[], &config, &mut rng), None);
        assert_eq!(thief.pos, GridPos::new(0, 9));
        assert_eq!(
            advance_thief(&mut thief, &mut farm, &[], &config, &mut rng),
            Some(ThiefOutcome::Left {
                pos: GridPos::new(-1, 9),
                reason: ThiefExit::Escaped
            })
        );
    }

    #[test]
    fn test_guard_in_radius_interrupts_steal() {
        let mut farm = FarmState::default();
        let crop = GridPos::new(10, 10);
        ready_at(&mut farm, crop);
        let config = SimConfig::default();
        let mut rng = StdRng::seed_from_u64(5);
        let mut thief = Thief {
            pos: crop,
            mode: ThiefMode::Stealing {
                target: crop,
                remaining: 3,
            },
        };

        let guard = Vec2::new(8.0, 10.0);
        assert_eq!(advance_thief(&mut thief, &mut farm, &[guard], &config, &mut rng), None);
        assert_eq!(thief.mode, ThiefMode::Fleeing);
        assert_eq!(thief.pos, GridPos::new(11, 10));
        assert!(farm.is_ready(crop));
    }

    #[test]
    fn test_guard_on_thief_cell_catches() {
        let mut farm = FarmState::default();
        let config = SimConfig::default();
        let mut rng = StdRng::seed_from_u64(6);
        let mut thief = Thief::new(GridPos::new(4, 4));

        let outcome = advance_thief(&mut thief, &mut farm, &[Vec2::new(4.2, 3.9)], &config, &mut rng);
        assert_eq!(
            outcome,
            Some(ThiefOutcome::Left {
                pos: GridPos::new(4, 4),
                reason: ThiefExit::Caught
            })
        );
    }

    #[test]
    fn test_step_thieves_drops_departed() {
        let mut registry = AgentRegistry::default();
        let mut farm = FarmState::default();
        let config = SimConfig::default();
        let mut rng = StdRng::seed_from_u64(8);
        let leaving = registry.spawn(Agent::Thief(Thief::new(GridPos::new(0, 5))));
        let staying = registry.spawn(Agent::Thief(Thief::new(GridPos::new(9, 9))));

        let outcomes = step_thieves(&mut registry, &mut farm, &config, &mut rng);
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].0, leaving);
        assert!(registry.get(leaving).is_none());
        assert!(registry.get(staying).is_some());
    }
}
