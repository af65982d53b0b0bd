//! Catalog Service
//!
//! Runs the lookup flow for a session: short-circuits empty queries, awaits
//! the configured provider, and commits the results only while the lookup is
//! still the newest one issued for the session.

use crate::catalog::CatalogResult;
use crate::error::Result;
use crate::state::{AppState, BidSession};
use serde::Serialize;
use tracing::{debug, info};

/// Result of one lookup as seen by its caller
#[derive(Debug, Clone, Serialize)]
pub struct LookupOutcome {
    pub query: String,
    pub results: Vec<CatalogResult>,
    /// True when a newer lookup was issued while this one was in flight; the
    /// results were returned to the caller but not committed to the session
    pub stale: bool,
}

/// Catalog service for business logic
pub struct CatalogService;

impl CatalogService {
    /// Look up priced candidates for a query within a session
    pub async fn search(
        state: &AppState,
        session: &BidSession,
        query: &str,
    ) -> Result<LookupOutcome> {
        // Empty and whitespace-only queries resolve synchronously: clear the
        // current results and invalidate anything still in flight
        if query.trim().is_empty() {
            session.clear_search();
            return Ok(LookupOutcome {
                query: query.to_string(),
                results: Vec::new(),
                stale: false,
            });
        }

        let provider = state.provider()?;
        let generation = session.begin_lookup();

        info!(
            "CatalogService::search - session={} generation={} query={}",
            session.session_id, generation, query
        );

        let results = provider.search(query).await?;

        let committed = session.commit_lookup(generation, query, &results);
        if !committed {
            debug!(
                "Discarding stale lookup generation {} for session {}",
                generation, session.session_id
            );
        }

        Ok(LookupOutcome {
            query: query.to_string(),
            results,
            stale: !committed,
        })
    }
}
