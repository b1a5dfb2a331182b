//! Soil placement — paid, drag-selected rectangles of farmable ground.

use bevy::prelude::*;
use crate::shared::*;

/// Outcome of a successful soil placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoilPlacement {
    /// Cells that were not soil before.
    pub added: usize,
    pub cost: u32,
}

/// Turn every cell of the rectangle spanned by `from` and `to` into soil.
///
/// The whole rectangle must lie on the farm and be free of buildings and
/// pens. Every cell of the drag is charged at `soil_price`, soil or not, and
/// the total is checked against the balance before any cell changes.
pub fn place_soil_area(
    farm_state: &mut FarmState,
    structures: &Structures,
    economy: &mut Economy,
    config: &SimConfig,
    from: GridPos,
    to: GridPos,
) -> Result<SoilPlacement, Rejection> {
    // Corners first: the span arithmetic below assumes on-farm coordinates.
    for corner in [from, to] {
        if !corner.in_bounds() {
            return Err(Rejection::OutOfBounds(corner));
        }
    }

    let top_left = GridPos::new(from.x.min(to.x), from.y.min(to.y));
    let width = (from.x - to.x).abs() + 1;
    let height = (from.y - to.y).abs() + 1;

    let mut fresh = Vec::new();
    for cell in top_left.footprint(width, height) {
        if structures.is_built(cell) || structures.pen_at(cell).is_some() {
            return Err(Rejection::Occupied(cell));
        }
        if !farm_state.has_soil(cell) {
            fresh.push(cell);
        }
    }

    let area = (width * height) as u32;
    let cost = config.soil_price.saturating_mul(area);
    economy.try_debit(cost)?;

    let added = fresh.len();
    farm_state.soil.extend(fresh);
    Ok(SoilPlacement { added, cost })
}

pub fn handle_place_soil(
    mut soil_events: EventReader<PlaceSoilEvent>,
    mut farm_state: ResMut<FarmState>,
    structures: Res<Structures>,
    mut economy: ResMut<Economy>,
    config: Res<SimConfig>,
    mut money_events: EventWriter<MoneyChangeEvent>,
) {
    for event in soil_events.read() {
        match place_soil_area(
            &mut farm_state,
            &structures,
            &mut economy,
            &config,
            event.from,
            event.to,
        ) {
            Ok(placement) if placement.cost > 0 => {
                info!(
                    "[Farming] Laid {} soil cells for {}. Balance: {}",
                    placement.added, placement.cost, economy.money
                );
                money_events.send(MoneyChangeEvent {
                    amount: -i64::from(placement.cost),
                    reason: format!("{} soil", placement.added),
                });
            }
            Ok(_) => {}
            Err(reason) => debug!(
                "[Farming] Soil {:?}..{:?} ignored: {}",
                event.from, event.to, reason
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_charged_per_cell_of_area() {
        let mut farm = FarmState::default();
        let structures = Structures::default();
        let mut economy = Economy::default();
        let config = SimConfig::default();

        let placed = place_soil_area(
            &mut farm,
            &structures,
            &mut economy,
            &config,
            GridPos::new(4, 4),
            GridPos::new(2, 3),
        )
        .unwrap();

        assert_eq!(placed, SoilPlacement { added: 6, cost: 30 });
        assert_eq!(economy.money, 70);
        assert!(farm.has_soil(GridPos::new(2, 3)));
        assert!(farm.has_soil(GridPos::new(4, 4)));

        // Overlapping drag still pays for the whole rectangle.
        let placed = place_soil_area(
            &mut farm,
            &structures,
            &mut economy,
            &config,
            GridPos::new(2, 3),
            GridPos::new(5, 4),
        )
        .unwrap();
        assert_eq!(placed, SoilPlacement { added: 2, cost: 40 });
        assert_eq!(economy.money, 30);
        assert!(farm.has_soil(GridPos::new(5, 4)));
    }

    #[test]
    fn test_redrag_over_existing_soil_pays_full_area() {
        let mut farm = FarmState::default();
        farm.soil.insert(GridPos::new(2, 2));
        let structures = Structures::default();
        let mut economy = Economy::default();
        let config = SimConfig::default();

        let placed = place_soil_area(
            &mut farm,
            &structures,
            &mut economy,
            &config,
            GridPos::new(2, 2),
            GridPos::new(3, 2),
        )
        .unwrap();

        assert_eq!(placed, SoilPlacement { added: 1, cost: 10 });
        assert_eq!(economy.money, STARTING_MONEY - 10);
    }

    #[test]
    fn test_far_off_corners_rejected_without_panic() {
        let mut farm = FarmState::default();
        let structures = Structures::default();
        let mut economy = Economy::default();
        let config = SimConfig::default();

        for (from, to) in [
            (GridPos::new(i32::MIN, 0), GridPos::new(1, 0)),
            (GridPos::new(0, 0), GridPos::new(i32::MAX, i32::MAX)),
            (GridPos::new(i32::MIN, i32::MIN), GridPos::new(i32::MAX, i32::MAX)),
        ] {
            assert!(matches!(
                place_soil_area(&mut farm, &structures, &mut economy, &config, from, to),
                Err(Rejection::OutOfBounds(_))
            ));
        }
        assert!(farm.soil.is_empty());
        assert_eq!(economy.money, STARTING_MONEY);
    }

    #[test]
    fn test_unaffordable_rectangle_commits_nothing() {
        let mut farm = FarmState::default();
        let structures = Structures::default();
        let mut economy = Economy {
            money: 24,
            ..Default::default()
        };
        let config = SimConfig::default();

        let result = place_soil_area(
            &mut farm,
            &structures,
            &mut economy,
            &config,
            GridPos::new(0, 0),
            GridPos::new(4, 0),
        );

        assert_eq!(result, Err(Rejection::InsufficientFunds { need: 25, have: 24 }));
        assert!(farm.soil.is_empty());
        assert_eq!(economy.money, 24);
    }

    #[test]
    fn test_rectangle_over_building_or_edge_rejected() {
        let mut farm = FarmState::default();
        let mut structures = Structures::default();
        structures
            .buildings
            .insert(GridPos::new(6, 6), BuildingKind::Barn);
        let mut economy = Economy::default();
        let config = SimConfig::default();

        assert_eq!(
            place_soil_area(
                &mut farm,
                &structures,
                &mut economy,
                &config,
                GridPos::new(5, 5),
                GridPos::new(6, 6),
            ),
            Err(Rejection::Occupied(GridPos::new(6, 6)))
        );
        assert!(matches!(
            place_soil_area(
                &mut farm,
                &structures,
                &mut economy,
                &config,
                GridPos::new(GRID_SIZE - 1, 0),
                GridPos::new(GRID_SIZE, 0),
            ),
            Err(Rejection::OutOfBounds(_))
        ));
        assert!(farm.soil.is_empty());
        assert_eq!(economy.money, STARTING_MONEY);
    }
}
