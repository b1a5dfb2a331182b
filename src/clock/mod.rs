//! Clock domain — the heartbeat of the simulation.
//!
//! Responsible for:
//! - Turning frame time into growth, agent, fine and spawn ticks
//! - Ordering the simulation sets within a frame
//! - Pausing / unpausing on `TogglePauseEvent`
//!
//! Each rate has its own repeating timer; a long frame emits as many ticks as
//! the timer finished, so no tick is lost to frame jitter.

use bevy::prelude::*;
use std::time::Duration;

use crate::shared::*;

/// Shortest interval a timer accepts.
const MIN_INTERVAL_SECS: f32 = 0.001;

#[derive(Resource, Debug, Clone)]
pub struct SimClock {
    pub growth: Timer,
    pub agent: Timer,
    pub fine: Timer,
    pub spawn: Timer,
}

/// How many times each rate fired during one advance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClockTicks {
    pub growth: u32,
    pub agent: u32,
    pub fine: u32,
    pub spawn: u32,
}

impl SimClock {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            growth: repeating(config.growth_interval_secs),
            agent: repeating(config.agent_interval_secs),
            fine: repeating(config.fine_interval_secs),
            spawn: repeating(config.spawn_interval_secs),
        }
    }

    pub fn advance(&mut self, delta: Duration) -> ClockTicks {
        ClockTicks {
            growth: self.growth.tick(delta).times_finished_this_tick(),
            agent: self.agent.tick(delta).times_finished_this_tick(),
            fine: self.fine.tick(delta).times_finished_this_tick(),
            spawn: self.spawn.tick(delta).times_finished_this_tick(),
        }
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::from_config(&SimConfig::default())
    }
}

fn repeating(secs: f32) -> Timer {
    Timer::new(
        Duration::from_secs_f32(secs.max(MIN_INTERVAL_SECS)),
        TimerMode::Repeating,
    )
}

pub struct ClockPlugin;

impl Plugin for ClockPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimClock>()
            .configure_sets(
                Update,
                (
                    SimSet::Build,
                    SimSet::Commands,
                    SimSet::Clock,
                    SimSet::Growth,
                    SimSet::Spawn,
                    SimSet::Agents,
                    SimSet::Fine,
                )
                    .chain()
                    .run_if(in_state(SimState::Running)),
            )
            // Config is final once loading ends.
            .add_systems(OnExit(SimState::Loading), configure_clock)
            .add_systems(Update, tick_sim_clock.in_set(SimSet::Clock))
            .add_systems(
                Update,
                toggle_pause.run_if(sim_started),
            );
    }
}

// ─── Run Conditions ───────────────────────────────────────────────────────────

fn sim_started(state: Res<State<SimState>>) -> bool {
    *state.get() != SimState::Loading
}

// ─── Systems ──────────────────────────────────────────────────────────────────

fn configure_clock(config: Res<SimConfig>, mut clock: ResMut<SimClock>) {
    *clock = SimClock::from_config(&config);
    info!(
        "[Clock] growth {}s, agents {}s, fine {}s, spawn roll {}s",
        config.growth_interval_secs,
        config.agent_interval_secs,
        config.fine_interval_secs,
        config.spawn_interval_secs
    );
}

pub fn tick_sim_clock(
    time: Res<Time>,
    mut clock: ResMut<SimClock>,
    mut growth_events: EventWriter<GrowthTickEvent>,
    mut agent_events: EventWriter<AgentTickEvent>,
    mut fine_events: EventWriter<FineTickEvent>,
    mut spawn_events: EventWriter<SpawnRollEvent>,
) {
    let ticks = clock.advance(time.delta());

    for _ in 0..ticks.growth {
        growth_events.send(GrowthTickEvent);
    }
    for _ in 0..ticks.spawn {
        spawn_events.send(SpawnRollEvent);
    }
    for _ in 0..ticks.agent {
        agent_events.send(AgentTickEvent);
    }
    for _ in 0..ticks.fine {
        fine_events.send(FineTickEvent);
    }
}

fn toggle_pause(
    mut events: EventReader<TogglePauseEvent>,
    state: Res<State<SimState>>,
    mut next_state: ResMut<NextState<SimState>>,
) {
    // Several toggles in one frame collapse to their parity.
    if events.read().count() % 2 == 0 {
        return;
    }
    match state.get() {
        SimState::Running => {
            next_state.set(SimState::Paused);
            info!("[Clock] Paused");
        }
        SimState::Paused => {
            next_state.set(SimState::Running);
            info!("[Clock] Resumed");
        }
        SimState::Loading => {}
    }
}
