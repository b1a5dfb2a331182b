//! Economy domain — structure purchases, selling, money tracking, farm statistics.
//!
//! All cross-domain communication goes through `crate::shared::*` events and resources.
//! No other domain module is imported here.

use bevy::prelude::*;
use crate::shared::*;

pub mod buildings;
pub mod gold;
pub mod selling;
pub mod stats;

use buildings::{handle_place_building, handle_place_pen};
use gold::track_money_changes;
use selling::handle_sell_inventory;
use stats::{track_crop_harvests, track_crop_thefts, track_thief_removals, FarmStats};

// ─────────────────────────────────────────────────────────────────────────────
// Plugin
// ─────────────────────────────────────────────────────────────────────────────

pub struct EconomyPlugin;

impl Plugin for EconomyPlugin {
    fn build(&self, app: &mut App) {
        // ── Resources ──────────────────────────────────────────────────────
        app.init_resource::<FarmStats>();

        // ── Systems: player commands ───────────────────────────────────────
        app.add_systems(
            Update,
            (handle_place_building, handle_place_pen)
                .chain()
                .in_set(SimSet::Build),
        )
        .add_systems(Update, handle_sell_inventory.in_set(SimSet::Commands));

        // ── Systems: passive listeners ─────────────────────────────────────
        // Outcome events can come from any domain, so these run after agents.
        app.add_systems(
            Update,
            (
                track_money_changes,
                track_crop_harvests,
                track_crop_thefts,
                track_thief_removals,
            )
                .after(SimSet::Fine)
                .run_if(in_state(SimState::Running)),
        );

        info!("[Economy] EconomyPlugin registered.");
    }
}
