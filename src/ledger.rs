//! Bid line-item ledger
//!
//! Ordered collection of the items committed to the current bid, plus the
//! global markup applied to newly added items. The ledger is plain state with
//! pure-ish transition functions; all derived money figures live in
//! [`crate::pricing`].
//!
//! Each entry carries its own generated id. The catalog result id is kept only
//! as provenance, so adding the same catalog result twice yields two
//! independently addressable entries.

use crate::catalog::CatalogResult;
use crate::error::{AppError, Result};
use serde::Serialize;
use uuid::Uuid;

/// Markup applied to items when no other default has been set
pub const DEFAULT_GLOBAL_MARKUP: f64 = 20.0;

/// Unit price assumed for catalog results that carry none
pub const FALLBACK_MARKET_PRICE: f64 = 100.0;

/// A catalog result committed to the active bid
#[derive(Debug, Clone, Serialize)]
pub struct LineItem {
    /// Generated per ledger entry; the only key update/remove operate on
    pub entry_id: Uuid,
    /// Id of the catalog result this entry was created from (not unique)
    pub catalog_id: String,
    /// Display name: the query text at the time the item was added
    pub name: String,
    /// Unit market price, always positive
    pub market_price: f64,
    /// Clamped to a minimum of 1 on every update
    pub quantity: i32,
    /// Markup percent, floored at 0
    pub markup: f64,
    /// Provenance label of the originating catalog result
    pub source: String,
}

/// The ordered ledger for one bidding session
#[derive(Debug, Clone, Serialize)]
pub struct BidLedger {
    items: Vec<LineItem>,
    global_markup: f64,
}

impl Default for BidLedger {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            global_markup: DEFAULT_GLOBAL_MARKUP,
        }
    }
}

impl BidLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Items in insertion order
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Current default markup for newly added items
    pub fn global_markup(&self) -> f64 {
        self.global_markup
    }

    /// Append a line item built from a catalog result.
    ///
    /// Unit price falls back to [`FALLBACK_MARKET_PRICE`] when the result has
    /// none; quantity starts at 1; markup starts at the current global markup.
    pub fn add_item(&mut self, result: &CatalogResult, name: &str) -> LineItem {
        let item = LineItem {
            entry_id: Uuid::new_v4(),
            catalog_id: result.id.clone(),
            name: name.to_string(),
            market_price: result.price.unwrap_or(FALLBACK_MARKET_PRICE),
            quantity: 1,
            markup: self.global_markup,
            source: result.source.clone(),
        };

        self.items.push(item.clone());
        item
    }

    /// Remove the entry with the given id
    pub fn remove_item(&mut self, entry_id: Uuid) -> Result<LineItem> {
        let index = self
            .items
            .iter()
            .position(|item| item.entry_id == entry_id)
            .ok_or_else(|| AppError::NotFound(format!("Bid item not found: {}", entry_id)))?;

        Ok(self.items.remove(index))
    }

    /// Set an entry's quantity, clamped to a minimum of 1
    pub fn update_quantity(&mut self, entry_id: Uuid, quantity: i32) -> Result<LineItem> {
        let item = self.entry_mut(entry_id)?;
        item.quantity = quantity.max(1);
        Ok(item.clone())
    }

    /// Set an entry's markup percent, floored at 0.
    ///
    /// Non-finite input is rejected so the ledger can never hold NaN; the
    /// entry keeps its previous markup.
    pub fn update_markup(&mut self, entry_id: Uuid, markup: f64) -> Result<LineItem> {
        if !markup.is_finite() {
            return Err(AppError::Validation(format!(
                "Invalid markup value: {}",
                markup
            )));
        }

        let item = self.entry_mut(entry_id)?;
        item.markup = markup.max(0.0);
        Ok(item.clone())
    }

    /// Set the global markup, floored at 0. Applies only to items added
    /// afterwards; existing entries keep their markup.
    pub fn set_global_markup(&mut self, percent: f64) -> Result<f64> {
        if !percent.is_finite() {
            return Err(AppError::Validation(format!(
                "Invalid markup value: {}",
                percent
            )));
        }

        self.global_markup = percent.max(0.0);
        Ok(self.global_markup)
    }

    fn entry_mut(&mut self, entry_id: Uuid) -> Result<&mut LineItem> {
        self.items
            .iter_mut()
            .find(|item| item.entry_id == entry_id)
            .ok_or_else(|| AppError::NotFound(format!("Bid item not found: {}", entry_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn priced_result(id: &str, price: Option<f64>) -> CatalogResult {
        CatalogResult {
            id: id.to_string(),
            source: "Home Depot".to_string(),
            title: "Ready-Mix Concrete Pricing".to_string(),
            url: "https://www.homedepot.com/p/concrete".to_string(),
            price,
            description: "Ready-mix concrete pricing.".to_string(),
        }
    }

    #[test]
    fn test_add_item_defaults() {
        let mut ledger = BidLedger::new();
        let item = ledger.add_item(&priced_result("4", Some(120.0)), "concrete");

        assert_eq!(item.catalog_id, "4");
        assert_eq!(item.name, "concrete");
        assert_eq!(item.market_price, 120.0);
        assert_eq!(item.quantity, 1);
        assert_eq!(item.markup, DEFAULT_GLOBAL_MARKUP);
        assert_eq!(item.source, "Home Depot");
        assert_eq!(ledger.item_count(), 1);
    }

    #[test]
    fn test_add_item_price_fallback() {
        let mut ledger = BidLedger::new();
        let item = ledger.add_item(&priced_result("4", None), "concrete");
        assert_eq!(item.market_price, FALLBACK_MARKET_PRICE);
    }

    #[test]
    fn test_duplicate_catalog_results_get_distinct_entries() {
        let mut ledger = BidLedger::new();
        let result = priced_result("4", Some(120.0));
        let first = ledger.add_item(&result, "concrete");
        let second = ledger.add_item(&result, "concrete");

        assert_ne!(first.entry_id, second.entry_id);
        assert_eq!(first.catalog_id, second.catalog_id);

        // Updating one leaves the other untouched
        ledger.update_quantity(first.entry_id, 5).unwrap();
        let items = ledger.items();
        assert_eq!(items[0].quantity, 5);
        assert_eq!(items[1].quantity, 1);

        // Removing one leaves the other in place
        ledger.remove_item(first.entry_id).unwrap();
        assert_eq!(ledger.item_count(), 1);
        assert_eq!(ledger.items()[0].entry_id, second.entry_id);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut ledger = BidLedger::new();
        ledger.add_item(&priced_result("a", Some(10.0)), "first");
        ledger.add_item(&priced_result("b", Some(20.0)), "second");
        ledger.add_item(&priced_result("c", Some(30.0)), "third");

        let names: Vec<_> = ledger.items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_quantity_clamped_to_one() {
        let mut ledger = BidLedger::new();
        let item = ledger.add_item(&priced_result("4", Some(120.0)), "concrete");

        let updated = ledger.update_quantity(item.entry_id, 0).unwrap();
        assert_eq!(updated.quantity, 1);

        let updated = ledger.update_quantity(item.entry_id, -7).unwrap();
        assert_eq!(updated.quantity, 1);

        let updated = ledger.update_quantity(item.entry_id, 12).unwrap();
        assert_eq!(updated.quantity, 12);
    }

    #[test]
    fn test_markup_floor_and_nan_rejection() {
        let mut ledger = BidLedger::new();
        let item = ledger.add_item(&priced_result("4", Some(120.0)), "concrete");

        let updated = ledger.update_markup(item.entry_id, -5.0).unwrap();
        assert_eq!(updated.markup, 0.0);

        let updated = ledger.update_markup(item.entry_id, 35.5).unwrap();
        assert_eq!(updated.markup, 35.5);

        // NaN and infinities are rejected and the prior value retained
        assert!(ledger.update_markup(item.entry_id, f64::NAN).is_err());
        assert!(ledger.update_markup(item.entry_id, f64::INFINITY).is_err());
        assert_eq!(ledger.items()[0].markup, 35.5);
    }

    #[test]
    fn test_global_markup_applies_only_to_new_items() {
        let mut ledger = BidLedger::new();
        let before = ledger.add_item(&priced_result("4", Some(120.0)), "concrete");

        ledger.set_global_markup(35.0).unwrap();
        let after = ledger.add_item(&priced_result("5", Some(135.0)), "concrete");

        assert_eq!(ledger.items()[0].markup, DEFAULT_GLOBAL_MARKUP);
        assert_eq!(before.markup, DEFAULT_GLOBAL_MARKUP);
        assert_eq!(after.markup, 35.0);
    }

    #[test]
    fn test_global_markup_floor_and_nan_rejection() {
        let mut ledger = BidLedger::new();

        assert_eq!(ledger.set_global_markup(-10.0).unwrap(), 0.0);
        assert!(ledger.set_global_markup(f64::NAN).is_err());
        assert_eq!(ledger.global_markup(), 0.0);
    }

    #[test]
    fn test_unknown_entry_is_not_found() {
        let mut ledger = BidLedger::new();
        let missing = Uuid::new_v4();

        assert!(matches!(
            ledger.remove_item(missing),
            Err(AppError::NotFound(_))
        ));
        assert!(ledger.update_quantity(missing, 2).is_err());
        assert!(ledger.update_markup(missing, 10.0).is_err());
    }
}
