use bevy::prelude::*;
use crate::shared::*;
use super::stats::FarmStats;

/// Folds `MoneyChangeEvent`s into the running totals.
///
/// The ledger has already been updated by whoever sent the event; this only
/// records and reports it.
pub fn track_money_changes(
    mut money_events: EventReader<MoneyChangeEvent>,
    economy: Res<Economy>,
    mut stats: ResMut<FarmStats>,
) {
    for ev in money_events.read() {
        let magnitude = ev.amount.unsigned_abs();
        if ev.amount >= 0 {
            stats.money_earned = stats.money_earned.saturating_add(magnitude);
            info!(
                "[Economy] +{}: {}. Balance: {}",
                format_money(magnitude),
                ev.reason,
                format_money(u64::from(economy.money))
            );
        } else {
            stats.money_spent = stats.money_spent.saturating_add(magnitude);
            info!(
                "[Economy] -{}: {}. Balance: {}",
                format_money(magnitude),
                ev.reason,
                format_money(u64::from(economy.money))
            );
        }
    }
}

/// Format a money amount for logs (e.g. "$1,234").
pub fn format_money(amount: u64) -> String {
    let digits = amount.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    result.push('$');
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result
}
