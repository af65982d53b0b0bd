//! Bid Service
//!
//! Ledger mutations and bid snapshots for a session. Every mutation returns
//! the affected entry so the dashboard can update in place; the snapshot
//! carries the full derived summary.

use crate::error::{AppError, Result};
use crate::ledger::LineItem;
use crate::pricing::{self, BidSummary};
use crate::state::BidSession;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

/// Serializable view of a session's bid: entries, global markup, and every
/// derived figure. This is the dashboard read model, not an export format.
#[derive(Debug, Clone, Serialize)]
pub struct BidSnapshot {
    pub session_id: String,
    pub items: Vec<LineItem>,
    pub global_markup: f64,
    pub summary: BidSummary,
}

/// Bid service for business logic
pub struct BidService;

impl BidService {
    /// Commit a catalog result from the session's current search to the bid.
    ///
    /// The entry's display name is the query that produced the result. The
    /// search state is cleared afterwards, mirroring the dashboard flow where
    /// adding an item dismisses the result list.
    pub fn add_item(session: &BidSession, result_id: &str) -> Result<LineItem> {
        let (result, query) = session.find_result(result_id).ok_or_else(|| {
            AppError::NotFound(format!("Catalog result not found: {}", result_id))
        })?;

        let item = session.ledger.write().add_item(&result, &query);
        session.clear_search();

        info!(
            "BidService::add_item - session={} entry={} catalog={}",
            session.session_id, item.entry_id, item.catalog_id
        );

        Ok(item)
    }

    /// Remove a bid entry
    pub fn remove_item(session: &BidSession, entry_id: &str) -> Result<LineItem> {
        let entry_id = parse_entry_id(entry_id)?;
        session.ledger.write().remove_item(entry_id)
    }

    /// Set an entry's quantity (clamped to a minimum of 1)
    pub fn update_quantity(session: &BidSession, entry_id: &str, quantity: i32) -> Result<LineItem> {
        let entry_id = parse_entry_id(entry_id)?;
        session.ledger.write().update_quantity(entry_id, quantity)
    }

    /// Set an entry's markup percent (floored at 0)
    pub fn update_markup(session: &BidSession, entry_id: &str, markup: f64) -> Result<LineItem> {
        let entry_id = parse_entry_id(entry_id)?;
        session.ledger.write().update_markup(entry_id, markup)
    }

    /// Set the global markup for subsequently added items
    pub fn set_global_markup(session: &BidSession, percent: f64) -> Result<f64> {
        session.ledger.write().set_global_markup(percent)
    }

    /// Snapshot the bid with all derived figures
    pub fn get_bid(session: &BidSession) -> BidSnapshot {
        let ledger = session.ledger.read();
        let summary = pricing::summarize(ledger.items(), ledger.global_markup());

        BidSnapshot {
            session_id: session.session_id.clone(),
            items: ledger.items().to_vec(),
            global_markup: ledger.global_markup(),
            summary,
        }
    }

    /// Save & Export Bid. No export format or destination has been specified
    /// by the product yet, so this fails loudly instead of inventing one.
    pub fn export_bid(session: &BidSession) -> Result<()> {
        let _ = session;
        Err(AppError::NotImplemented(
            "Bid export format is pending product specification".to_string(),
        ))
    }
}

fn parse_entry_id(entry_id: &str) -> Result<Uuid> {
    Uuid::parse_str(entry_id)
        .map_err(|_| AppError::Validation(format!("Invalid bid entry id: {}", entry_id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogResult;
    use crate::config::AppConfig;
    use crate::state::AppState;
    use std::sync::Arc;

    fn seeded_session() -> (AppState, Arc<crate::state::BidSession>) {
        let state = AppState::new(AppConfig::default()).unwrap();
        let session = state.open_session();

        let generation = session.begin_lookup();
        session.commit_lookup(
            generation,
            "concrete",
            &[
                CatalogResult {
                    id: "4".to_string(),
                    source: "Home Depot".to_string(),
                    title: "Ready-Mix Concrete Pricing".to_string(),
                    url: "https://www.homedepot.com/p/concrete".to_string(),
                    price: Some(120.0),
                    description: "Ready-mix concrete pricing.".to_string(),
                },
                CatalogResult {
                    id: "unpriced".to_string(),
                    source: "Local Supplier Network".to_string(),
                    title: "Regional Concrete Costs".to_string(),
                    url: "https://www.concretesuppliers.com".to_string(),
                    price: None,
                    description: "Wholesale pricing on request.".to_string(),
                },
            ],
        );

        (state, session)
    }

    #[test]
    fn test_add_item_uses_query_as_name_and_clears_search() {
        let (_state, session) = seeded_session();

        let item = BidService::add_item(&session, "4").unwrap();
        assert_eq!(item.name, "concrete");
        assert_eq!(item.market_price, 120.0);
        assert_eq!(item.quantity, 1);

        // The result list is dismissed after an add
        assert!(session.search_state().results.is_empty());
        assert!(matches!(
            BidService::add_item(&session, "4"),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_add_unpriced_item_falls_back() {
        let (_state, session) = seeded_session();
        let item = BidService::add_item(&session, "unpriced").unwrap();
        assert_eq!(item.market_price, 100.0);
    }

    #[test]
    fn test_mutations_round_trip() {
        let (_state, session) = seeded_session();
        let item = BidService::add_item(&session, "4").unwrap();
        let id = item.entry_id.to_string();

        let updated = BidService::update_quantity(&session, &id, 3).unwrap();
        assert_eq!(updated.quantity, 3);

        let updated = BidService::update_markup(&session, &id, 25.0).unwrap();
        assert_eq!(updated.markup, 25.0);

        BidService::remove_item(&session, &id).unwrap();
        assert_eq!(BidService::get_bid(&session).items.len(), 0);
    }

    #[test]
    fn test_malformed_entry_id_is_validation_error() {
        let (_state, session) = seeded_session();
        assert!(matches!(
            BidService::update_quantity(&session, "not-a-uuid", 2),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_snapshot_summary() {
        let (_state, session) = seeded_session();
        let item = BidService::add_item(&session, "4").unwrap();
        BidService::update_quantity(&session, &item.entry_id.to_string(), 3).unwrap();

        let snapshot = BidService::get_bid(&session);
        assert_eq!(snapshot.global_markup, 20.0);
        assert_eq!(snapshot.summary.item_count, 1);
        // 120 x 3 at the default 20% markup
        assert!((snapshot.summary.total_cost - 360.0).abs() < 1e-9);
        assert!((snapshot.summary.total_profit - 72.0).abs() < 1e-9);
        assert!((snapshot.summary.final_bid - 432.0).abs() < 1e-9);
        // round2(360 * 1.20 + 360 * 0.05) = 450
        assert!((snapshot.summary.recommended_price - 450.0).abs() < 1e-9);
    }

    #[test]
    fn test_export_is_explicitly_unimplemented() {
        let (_state, session) = seeded_session();
        assert!(matches!(
            BidService::export_bid(&session),
            Err(AppError::NotImplemented(_))
        ));
    }
}
