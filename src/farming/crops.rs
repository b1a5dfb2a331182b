//! Crop planting and growth-stage management.

use bevy::prelude::*;
use crate::shared::*;

// ─────────────────────────────────────────────────────────────────────────────
// Handle plant seed event
// ─────────────────────────────────────────────────────────────────────────────

/// Listen for PlantSeedEvent and plant the currently selected crop kind.
pub fn handle_plant_seed(
    mut plant_events: EventReader<PlantSeedEvent>,
    mut farm_state: ResMut<FarmState>,
    selection: Res<Selection>,
) {
    for event in plant_events.read() {
        match farm_state.plant(event.pos, selection.crop) {
            Ok(()) => debug!("[Farming] Planted {:?} at {:?}", selection.crop, event.pos),
            Err(reason) => debug!("[Farming] Plant at {:?} ignored: {}", event.pos, reason),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Crop growth advancement (called from events_handler::on_growth_tick)
// ─────────────────────────────────────────────────────────────────────────────

/// Advance every crop by one growth tick.
///
/// A seed whose timer has reached its sprout threshold becomes a sprout, a
/// sprout at its mature threshold becomes ready; either transition resets the
/// timer. Otherwise the timer counts up, including on ready crops.
///
/// Returns the crops that became ready on this tick.
pub fn advance_crop_growth(
    farm_state: &mut FarmState,
    crop_registry: &CropRegistry,
) -> Vec<(GridPos, CropKind)> {
    let mut ripened = Vec::new();

    for (pos, crop) in farm_state.crops.iter_mut() {
        let Some(def) = crop_registry.get(crop.kind) else {
            continue;
        };

        match crop.stage {
            CropStage::Seed if crop.timer >= def.sprout_ticks => {
                crop.stage = CropStage::Growing;
                crop.timer = 0;
            }
            CropStage::Growing if crop.timer >= def.mature_ticks => {
                crop.stage = CropStage::Ready;
                crop.timer = 0;
                ripened.push((*pos, crop.kind));
            }
            _ => crop.timer = crop.timer.saturating_add(1),
        }
    }

    ripened
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::populate_crops;

    fn registry() -> CropRegistry {
        let mut registry = CropRegistry::default();
        populate_crops(&mut registry);
        registry
    }

    #[test]
    fn test_timer_counts_until_threshold_then_resets() {
        let registry = registry();
        let mut farm = FarmState::default();
        let pos = GridPos::new(1, 1);
        farm.soil.insert(pos);
        farm.plant(pos, CropKind::Spinach).unwrap();

        // spinach sprouts after 2 ticks in seed
        advance_crop_growth(&mut farm, &registry);
        advance_crop_growth(&mut farm, &registry);
        assert_eq!(farm.crops[&pos].stage, CropStage::Seed);
        assert_eq!(farm.crops[&pos].timer, 2);

        advance_crop_growth(&mut farm, &registry);
        assert_eq!(farm.crops[&pos].stage, CropStage::Growing);
        assert_eq!(farm.crops[&pos].timer, 0);
    }

    #[test]
    fn test_ready_crop_never_regresses() {
        let registry = registry();
        let mut farm = FarmState::default();
        let pos = GridPos::new(0, 0);
        farm.soil.insert(pos);
        farm.crops.insert(
            pos,
            Crop {
                kind: CropKind::Wheat,
                stage: CropStage::Ready,
                timer: 0,
            },
        );

        for _ in 0..50 {
            let ripened = advance_crop_growth(&mut farm, &registry);
            assert!(ripened.is_empty());
        }
        assert_eq!(farm.crops[&pos].stage, CropStage::Ready);
        assert_eq!(farm.crops[&pos].timer, 50);
    }

    #[test]
    fn test_ripened_reports_each_crop_once() {
        let registry = registry();
        let mut farm = FarmState::default();
        let pos = GridPos::new(4, 2);
        farm.soil.insert(pos);
        farm.plant(pos, CropKind::Spinach).unwrap();

        let mut reports = Vec::new();
        for _ in 0..20 {
            reports.extend(advance_crop_growth(&mut farm, &registry));
        }
        assert_eq!(reports, vec![(pos, CropKind::Spinach)]);
    }
}
