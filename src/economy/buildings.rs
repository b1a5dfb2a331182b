//! Fixed-footprint structures: barns and pens.
//!
//! Both claim a 3×3 block that must be on the farm and clear of soil, crops,
//! buildings and other pens. Validation finishes before any money moves.

use bevy::prelude::*;
use crate::shared::*;

/// Check that every cell of the 3×3 block at `top_left` is free ground.
pub fn check_footprint(
    farm_state: &FarmState,
    structures: &Structures,
    top_left: GridPos,
) -> Result<Vec<GridPos>, Rejection> {
    // Both corners on the farm keeps the offsets below in range.
    let bottom_right = GridPos::new(
        top_left.x.saturating_add(FOOTPRINT - 1),
        top_left.y.saturating_add(FOOTPRINT - 1),
    );
    for corner in [top_left, bottom_right] {
        if !corner.in_bounds() {
            return Err(Rejection::OutOfBounds(corner));
        }
    }

    let cells: Vec<GridPos> = top_left.footprint(FOOTPRINT, FOOTPRINT).collect();
    for &cell in &cells {
        if farm_state.has_soil(cell)
            || farm_state.crops.contains_key(&cell)
            || structures.is_built(cell)
            || structures.pen_at(cell).is_some()
        {
            return Err(Rejection::Occupied(cell));
        }
    }
    Ok(cells)
}

/// Build `kind` on the 3×3 block at `top_left`. Returns the price paid.
pub fn place_building(
    farm_state: &FarmState,
    structures: &mut Structures,
    economy: &mut Economy,
    config: &SimConfig,
    kind: BuildingKind,
    top_left: GridPos,
) -> Result<u32, Rejection> {
    let cells = check_footprint(farm_state, structures, top_left)?;
    let price = config.building_price(kind);
    economy.try_debit(price)?;
    structures
        .buildings
        .extend(cells.into_iter().map(|cell| (cell, kind)));
    Ok(price)
}

/// Put a walled pen on the 3×3 block at `top_left`. Returns the price paid.
pub fn place_pen(
    farm_state: &FarmState,
    structures: &mut Structures,
    economy: &mut Economy,
    config: &SimConfig,
    top_left: GridPos,
) -> Result<u32, Rejection> {
    check_footprint(farm_state, structures, top_left)?;
    economy.try_debit(config.pen_price)?;
    structures.pens.push(Pen { top_left });
    Ok(config.pen_price)
}

// ─────────────────────────────────────────────────────────────────────────────
// Systems
// ─────────────────────────────────────────────────────────────────────────────

pub fn handle_place_building(
    mut events: EventReader<PlaceBuildingEvent>,
    farm_state: Res<FarmState>,
    mut structures: ResMut<Structures>,
    mut economy: ResMut<Economy>,
    config: Res<SimConfig>,
    mut money_events: EventWriter<MoneyChangeEvent>,
) {
    for ev in events.read() {
        match place_building(
            &farm_state,
            &mut structures,
            &mut economy,
            &config,
            ev.kind,
            ev.top_left,
        ) {
            Ok(price) => {
                info!("[Economy] Built {:?} at {:?}", ev.kind, ev.top_left);
                money_events.send(MoneyChangeEvent {
                    amount: -i64::from(price),
                    reason: format!("{:?}", ev.kind),
                });
            }
            Err(reason) => debug!(
                "[Economy] {:?} at {:?} rejected: {}",
                ev.kind, ev.top_left, reason
            ),
        }
    }
}

pub fn handle_place_pen(
    mut events: EventReader<PlacePenEvent>,
    farm_state: Res<FarmState>,
    mut structures: ResMut<Structures>,
    mut economy: ResMut<Economy>,
    config: Res<SimConfig>,
    mut money_events: EventWriter<MoneyChangeEvent>,
) {
    for ev in events.read() {
        match place_pen(
            &farm_state,
            &mut structures,
            &mut economy,
            &config,
            ev.top_left,
        ) {
            Ok(price) => {
                info!("[Economy] Pen placed at {:?}", ev.top_left);
                money_events.send(MoneyChangeEvent {
                    amount: -i64::from(price),
                    reason: "pen".to_string(),
                });
            }
            Err(reason) => debug!("[Economy] Pen at {:?} rejected: {}", ev.top_left, reason),
        }
    }
}
