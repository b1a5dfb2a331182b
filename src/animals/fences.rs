use bevy::prelude::*;
use crate::shared::*;

/// Put a fence segment on one edge of `pos`. Returns the price paid.
///
/// An edge already walled from either side, by a fence or a pen, is rejected.
pub fn place_fence(
    structures: &mut Structures,
    economy: &mut Economy,
    config: &SimConfig,
    pos: GridPos,
    side: Side,
) -> Result<u32, Rejection> {
    if !pos.in_bounds() {
        return Err(Rejection::OutOfBounds(pos));
    }
    let edge = FenceEdge::new(pos, side).canonical();
    if structures.wall_edges().contains(&edge) {
        return Err(Rejection::AlreadyFenced(edge));
    }
    economy.try_debit(config.fence_price)?;
    structures.fences.insert(edge);
    Ok(config.fence_price)
}

pub fn handle_place_fence(
    mut events: EventReader<PlaceFenceEvent>,
    mut structures: ResMut<Structures>,
    mut economy: ResMut<Economy>,
    config: Res<SimConfig>,
    mut money_events: EventWriter<MoneyChangeEvent>,
) {
    for ev in events.read() {
        match place_fence(&mut structures, &mut economy, &config, ev.pos, ev.side) {
            Ok(price) => {
                money_events.send(MoneyChangeEvent {
                    amount: -i64::from(price),
                    reason: "fence".to_string(),
                });
            }
            Err(reason) => debug!("[Animals] Fence {:?} {:?} rejected: {}", ev.pos, ev.side, reason),
        }
    }
}
