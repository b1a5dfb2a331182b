use bevy::prelude::*;
use crate::shared::*;

/// True when `player` is on or next to the merchant stall (diagonals count).
pub fn near_merchant(player: GridPos) -> bool {
    let dx = (i64::from(player.x) - i64::from(MERCHANT_POS.x)).abs();
    let dy = (i64::from(player.y) - i64::from(MERCHANT_POS.y)).abs();
    dx.max(dy) <= 1
}

/// Sell every crop in the inventory at its registry price.
///
/// Only works next to the merchant. Returns the amount credited; the
/// inventory is empty afterwards.
pub fn sell_inventory(
    economy: &mut Economy,
    crop_registry: &CropRegistry,
    player: GridPos,
) -> Result<u32, Rejection> {
    if !near_merchant(player) {
        return Err(Rejection::NotNearMerchant(player));
    }
    let total = economy
        .inventory
        .iter()
        .map(|(kind, count)| crop_registry.sell_price(*kind).saturating_mul(*count))
        .fold(0u32, u32::saturating_add);

    economy.inventory.clear();
    economy.credit(total);
    Ok(total)
}

pub fn handle_sell_inventory(
    mut sell_events: EventReader<SellInventoryEvent>,
    mut economy: ResMut<Economy>,
    crop_registry: Res<CropRegistry>,
    player: Res<PlayerPosition>,
    mut money_events: EventWriter<MoneyChangeEvent>,
) {
    for _ev in sell_events.read() {
        let sold: u32 = economy.inventory.values().sum();
        let earned = match sell_inventory(&mut economy, &crop_registry, player.0) {
            Ok(0) => {
                debug!("[Economy] Nothing to sell");
                continue;
            }
            Ok(earned) => earned,
            Err(reason) => {
                debug!("[Economy] Sell ignored: {}", reason);
                continue;
            }
        };
        money_events.send(MoneyChangeEvent {
            amount: i64::from(earned),
            reason: format!("sold {} crops", sold),
        });
    }
}
