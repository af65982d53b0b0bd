//! Bid pricing engine
//!
//! Pure, total functions over the current line items. Nothing here touches
//! sessions, locks, or I/O; the dashboard recomputes these figures after every
//! ledger change. All outputs are plain f64 values; currency formatting is the
//! dashboard's concern.

use crate::ledger::LineItem;
use serde::Serialize;

/// Flat percentage added on top of marked-up cost in the recommended price
const COMPETITIVE_BUFFER: f64 = 0.05;

/// Derived money figures for a ledger
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BidSummary {
    pub item_count: usize,
    pub average_market_price: f64,
    pub total_cost: f64,
    pub total_profit: f64,
    pub final_bid: f64,
    pub recommended_price: f64,
}

/// Customer-facing total for one line: price x quantity x (1 + markup/100)
pub fn line_total(item: &LineItem) -> f64 {
    item.market_price * item.quantity as f64 * (1.0 + item.markup / 100.0)
}

/// Sum of price x quantity over all items; markup excluded
pub fn total_cost(items: &[LineItem]) -> f64 {
    items
        .iter()
        .map(|item| item.market_price * item.quantity as f64)
        .sum()
}

/// Sum of the markup portion of every line
pub fn total_profit(items: &[LineItem]) -> f64 {
    items
        .iter()
        .map(|item| item.market_price * item.quantity as f64 * item.markup / 100.0)
        .sum()
}

/// Cost plus profit; equals the sum of line totals
pub fn final_bid(items: &[LineItem]) -> f64 {
    total_cost(items) + total_profit(items)
}

/// Total cost divided by item count (not total quantity), 0 when empty.
///
/// The divisor is intentionally the number of ledger entries; quantities only
/// enter through the cost numerator.
pub fn average_market_price(items: &[LineItem]) -> f64 {
    if items.is_empty() {
        return 0.0;
    }
    total_cost(items) / items.len() as f64
}

/// Suggested bid: cost with the global markup applied plus a flat 5%
/// competitive buffer on cost, rounded to cents.
///
/// Uses the global markup setting, not the per-item markups.
pub fn recommended_price(items: &[LineItem], global_markup: f64) -> f64 {
    let base = total_cost(items);
    let profit = base * global_markup / 100.0;
    let buffer = base * COMPETITIVE_BUFFER;
    round2(base + profit + buffer)
}

/// Round to 2 decimal places, half away from zero on the scaled value
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compute every derived figure in one pass over the ledger
pub fn summarize(items: &[LineItem], global_markup: f64) -> BidSummary {
    BidSummary {
        item_count: items.len(),
        average_market_price: average_market_price(items),
        total_cost: total_cost(items),
        total_profit: total_profit(items),
        final_bid: final_bid(items),
        recommended_price: recommended_price(items, global_markup),
    }
}
