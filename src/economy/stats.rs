use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════
// FARM STATS — running totals fed by outcome events
// ═══════════════════════════════════════════════════════════════════════

#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct FarmStats {
    pub harvested: BTreeMap<CropKind, u32>,
    /// Subset of `harvested` collected by auto-planters.
    pub harvested_by_planters: u32,
    pub stolen: BTreeMap<CropKind, u32>,
    pub thieves_caught: u32,
    pub thieves_escaped: u32,
    pub money_earned: u64,
    pub money_spent: u64,
}

impl FarmStats {
    pub fn total_harvested(&self) -> u32 {
        self.harvested.values().sum()
    }

    pub fn total_stolen(&self) -> u32 {
        self.stolen.values().sum()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

pub fn track_crop_harvests(
    mut events: EventReader<CropHarvestedEvent>,
    mut stats: ResMut<FarmStats>,
) {
    for ev in events.read() {
        *stats.harvested.entry(ev.kind).or_insert(0) += 1;
        if let Harvester::Planter(_) = ev.by {
            stats.harvested_by_planters += 1;
        }
    }
}

pub fn track_crop_thefts(
    mut events: EventReader<CropStolenEvent>,
    mut stats: ResMut<FarmStats>,
) {
    for ev in events.read() {
        *stats.stolen.entry(ev.kind).or_insert(0) += 1;
        info!(
            "[Economy/Stats] {:?} stolen at {:?}. Total lost: {}",
            ev.kind,
            ev.pos,
            stats.total_stolen()
        );
    }
}

pub fn track_thief_removals(
    mut events: EventReader<ThiefRemovedEvent>,
    mut stats: ResMut<FarmStats>,
) {
    for ev in events.read() {
        match ev.reason {
            ThiefExit::Caught => stats.thieves_caught += 1,
            ThiefExit::Escaped => stats.thieves_escaped += 1,
        }
    }
}
