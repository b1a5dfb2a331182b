//! Growth-tick handler: runs the crop state machine once per clock tick.

use bevy::prelude::*;
use crate::shared::*;
use super::crops::advance_crop_growth;

pub fn on_growth_tick(
    mut ticks: EventReader<GrowthTickEvent>,
    mut farm_state: ResMut<FarmState>,
    crop_registry: Res<CropRegistry>,
    mut ready_events: EventWriter<CropReadyEvent>,
) {
    for _tick in ticks.read() {
        if farm_state.crops.is_empty() {
            continue;
        }

        for (pos, kind) in advance_crop_growth(&mut farm_state, &crop_registry) {
            debug!("[Farming] {:?} at {:?} is ready", kind, pos);
            ready_events.send(CropReadyEvent { kind, pos });
        }
    }
}
