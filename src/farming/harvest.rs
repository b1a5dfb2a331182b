//! Harvest system — player collects ready crops into the inventory.

use bevy::prelude::*;
use crate::shared::*;

pub fn handle_harvest_crop(
    mut harvest_events: EventReader<HarvestCropEvent>,
    mut farm_state: ResMut<FarmState>,
    mut economy: ResMut<Economy>,
    mut harvested_events: EventWriter<CropHarvestedEvent>,
) {
    for event in harvest_events.read() {
        match farm_state.harvest(event.pos, &mut economy) {
            Ok(kind) => {
                info!("[Farming] Harvested {:?} at {:?}", kind, event.pos);
                harvested_events.send(CropHarvestedEvent {
                    kind,
                    pos: event.pos,
                    by: Harvester::Player,
                });
            }
            Err(reason) => debug!("[Farming] Harvest at {:?} ignored: {}", event.pos, reason),
        }
    }
}
