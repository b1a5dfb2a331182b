//! Read-only view of the farm for renderers and HUDs.
//!
//! Rebuilt once per frame in `PostUpdate`, after every simulation set has
//! run, and exposed through [`LatestSnapshot`]. Everything is sorted so two
//! snapshots of the same state serialize identically.

use bevy::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::agents::{AgentId, AgentRegistry, ThiefMode};
use crate::economy::stats::FarmStats;
use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════
// VIEW TYPES
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CropView {
    pub pos: GridPos,
    pub kind: CropKind,
    pub stage: CropStage,
    pub timer: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildingView {
    pub pos: GridPos,
    pub kind: BuildingKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThiefView {
    pub id: AgentId,
    pub pos: GridPos,
    pub target: Option<GridPos>,
    pub steal_countdown: Option<u32>,
    pub fleeing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PetView {
    pub id: AgentId,
    pub kind: PetKind,
    /// Continuous position in cell units.
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanterView {
    pub id: AgentId,
    pub pos: GridPos,
    pub target: Option<GridPos>,
    pub countdown: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FarmSnapshot {
    pub grid_size: i32,
    pub money: u32,
    pub inventory: BTreeMap<CropKind, u32>,
    pub player: GridPos,
    pub soil: Vec<GridPos>,
    pub crops: Vec<CropView>,
    pub buildings: Vec<BuildingView>,
    pub pens: Vec<GridPos>,
    pub fences: Vec<FenceEdge>,
    pub animals: Vec<PlacedAnimal>,
    pub thieves: Vec<ThiefView>,
    pub pets: Vec<PetView>,
    pub planters: Vec<PlanterView>,
}

impl FarmSnapshot {
    pub fn capture(
        farm_state: &FarmState,
        economy: &Economy,
        structures: &Structures,
        registry: &AgentRegistry,
        player: &PlayerPosition,
    ) -> Self {
        let mut buildings: Vec<BuildingView> = structures
            .buildings
            .iter()
            .map(|(pos, kind)| BuildingView { pos: *pos, kind: *kind })
            .collect();
        buildings.sort_by_key(|view| view.pos);

        let mut fences: Vec<FenceEdge> = structures.fences.iter().copied().collect();
        fences.sort();

        let mut pens: Vec<GridPos> = structures.pens.iter().map(|pen| pen.top_left).collect();
        pens.sort();

        Self {
            grid_size: GRID_SIZE,
            money: economy.money,
            inventory: economy.inventory.clone(),
            player: player.0,
            soil: farm_state.soil.iter().copied().collect(),
            crops: farm_state
                .crops
                .iter()
                .map(|(pos, crop)| CropView {
                    pos: *pos,
                    kind: crop.kind,
                    stage: crop.stage,
                    timer: crop.timer,
                })
                .collect(),
            buildings,
            pens,
            fences,
            animals: structures.animals.clone(),
            thieves: registry
                .thieves()
                .map(|(id, thief)| ThiefView {
                    id,
                    pos: thief.pos,
                    target: thief.target(),
                    steal_countdown: thief.steal_countdown(),
                    fleeing: thief.mode == ThiefMode::Fleeing,
                })
                .collect(),
            pets: registry
                .guards()
                .map(|(id, guard)| PetView {
                    id,
                    kind: guard.kind,
                    x: guard.pos.x,
                    y: guard.pos.y,
                })
                .collect(),
            planters: registry
                .planters()
                .map(|(id, planter)| PlanterView {
                    id,
                    pos: planter.pos,
                    target: planter.target,
                    countdown: planter.countdown,
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// The snapshot from the end of the last frame, plus running totals.
#[derive(Resource, Debug, Clone, Default)]
pub struct LatestSnapshot {
    pub frame: u64,
    pub snapshot: FarmSnapshot,
    pub stats: FarmStats,
}

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct SnapshotPlugin;

impl Plugin for SnapshotPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LatestSnapshot>()
            .add_systems(PostUpdate, publish_snapshot.run_if(sim_started));
    }
}

fn sim_started(state: Res<State<SimState>>) -> bool {
    *state.get() != SimState::Loading
}

fn publish_snapshot(
    farm_state: Res<FarmState>,
    economy: Res<Economy>,
    structures: Res<Structures>,
    registry: Res<AgentRegistry>,
    player: Res<PlayerPosition>,
    stats: Res<FarmStats>,
    mut latest: ResMut<LatestSnapshot>,
) {
    latest.frame += 1;
    latest.snapshot = FarmSnapshot::capture(&farm_state, &economy, &structures, &registry, &player);
    latest.stats = stats.clone();
}
