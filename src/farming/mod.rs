//! Farming domain — soil placement, planting, crop growth, harvest.
//!
//! Communicates with other domains exclusively through crate::shared events/resources.

use bevy::prelude::*;
use crate::shared::*;

pub mod crops;
pub mod events_handler;
pub mod harvest;
pub mod soil;

pub struct FarmingPlugin;

impl Plugin for FarmingPlugin {
    fn build(&self, app: &mut App) {
        app
            // ------------------------------------------------------------------
            // Player commands
            // ------------------------------------------------------------------
            .add_systems(Update, soil::handle_place_soil.in_set(SimSet::Build))
            .add_systems(
                Update,
                (crops::handle_plant_seed, harvest::handle_harvest_crop)
                    .chain()
                    .in_set(SimSet::Commands),
            )
            // ------------------------------------------------------------------
            // Growth ticks — must land before agents read crop readiness
            // ------------------------------------------------------------------
            .add_systems(Update, events_handler::on_growth_tick.in_set(SimSet::Growth));
    }
}
