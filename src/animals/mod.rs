//! Animals domain — fence segments, enclosure validation, penned animals.

use bevy::prelude::*;
use crate::shared::*;

// ─────────────────────────────────────────────────────────────────────────────
// Sub-modules
// ─────────────────────────────────────────────────────────────────────────────
mod enclosure;
mod fences;
mod placement;

pub use enclosure::*;
pub use fences::*;
pub use placement::*;

// ─────────────────────────────────────────────────────────────────────────────
// Plugin
// ─────────────────────────────────────────────────────────────────────────────

pub struct AnimalPlugin;

impl Plugin for AnimalPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, handle_place_fence.in_set(SimSet::Build))
            .add_systems(Update, handle_place_animal.in_set(SimSet::Commands));
    }
}
