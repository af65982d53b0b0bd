//! Application state management

use crate::catalog::{CatalogProvider, CatalogRegistry, CatalogResult};
use crate::config::AppConfig;
use crate::error::{AppError, Result};
use crate::ledger::BidLedger;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Committed results of the most recent catalog lookup
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    /// The query that produced `results`; reused as the display name when a
    /// result is added to the bid
    pub query: String,
    pub results: Vec<CatalogResult>,
}

/// One dashboard user's ephemeral bidding session.
///
/// Everything lives in memory and dies with the session: the ledger, the
/// current search results, and the lookup generation counter.
pub struct BidSession {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    last_activity: RwLock<DateTime<Utc>>,
    pub ledger: RwLock<BidLedger>,
    search: RwLock<SearchState>,
    /// Generation of the newest issued lookup. A completed lookup may only
    /// commit its results while it is still the newest; stale completions are
    /// discarded instead of overwriting fresher results.
    lookup_generation: AtomicU64,
}

impl BidSession {
    fn new() -> Self {
        let now = Utc::now();
        Self {
            session_id: Uuid::new_v4().to_string(),
            created_at: now,
            last_activity: RwLock::new(now),
            ledger: RwLock::new(BidLedger::new()),
            search: RwLock::new(SearchState::default()),
            lookup_generation: AtomicU64::new(0),
        }
    }

    /// Record activity, deferring idle eviction
    pub fn touch(&self) {
        *self.last_activity.write() = Utc::now();
    }

    pub fn last_activity(&self) -> DateTime<Utc> {
        *self.last_activity.read()
    }

    /// Seconds since the last recorded activity
    pub fn idle_seconds(&self, now: DateTime<Utc>) -> i64 {
        (now - self.last_activity()).num_seconds()
    }

    /// Issue a new lookup generation
    pub fn begin_lookup(&self) -> u64 {
        self.lookup_generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Commit lookup results if no newer lookup has been issued since
    /// `generation`. Returns false when the results were stale and discarded.
    pub fn commit_lookup(&self, generation: u64, query: &str, results: &[CatalogResult]) -> bool {
        let mut search = self.search.write();
        if generation != self.lookup_generation.load(Ordering::SeqCst) {
            return false;
        }

        *search = SearchState {
            query: query.to_string(),
            results: results.to_vec(),
        };
        true
    }

    /// Drop the current results and invalidate any in-flight lookup
    pub fn clear_search(&self) {
        let mut search = self.search.write();
        self.lookup_generation.fetch_add(1, Ordering::SeqCst);
        *search = SearchState::default();
    }

    /// Snapshot of the committed search state
    pub fn search_state(&self) -> SearchState {
        self.search.read().clone()
    }

    /// Find a committed result by id, together with the query that produced it
    pub fn find_result(&self, result_id: &str) -> Option<(CatalogResult, String)> {
        let search = self.search.read();
        search
            .results
            .iter()
            .find(|result| result.id == result_id)
            .map(|result| (result.clone(), search.query.clone()))
    }

    #[cfg(test)]
    pub fn set_last_activity(&self, at: DateTime<Utc>) {
        *self.last_activity.write() = at;
    }
}

/// Application state shared across all handlers
pub struct AppState {
    pub config: AppConfig,

    /// Catalog provider registry
    pub catalog: Arc<CatalogRegistry>,

    /// Active bid sessions (session id -> session)
    pub sessions: DashMap<String, Arc<BidSession>>,
}

impl AppState {
    /// Create new application state
    pub fn new(config: AppConfig) -> Result<Self> {
        let catalog = Arc::new(CatalogRegistry::new(config.lookup_latency()));

        if catalog.get(&config.catalog.provider).is_none() {
            return Err(AppError::Config(format!(
                "Unknown catalog provider: {}",
                config.catalog.provider
            )));
        }

        tracing::info!("Catalog provider: {}", config.catalog.provider);

        Ok(Self {
            config,
            catalog,
            sessions: DashMap::new(),
        })
    }

    /// The configured catalog provider
    pub fn provider(&self) -> Result<Arc<dyn CatalogProvider>> {
        self.catalog.get(&self.config.catalog.provider).ok_or_else(|| {
            AppError::Config(format!(
                "Unknown catalog provider: {}",
                self.config.catalog.provider
            ))
        })
    }

    /// Create and register a new bid session
    pub fn open_session(&self) -> Arc<BidSession> {
        let session = Arc::new(BidSession::new());
        self.sessions
            .insert(session.session_id.clone(), session.clone());
        session
    }

    /// Get a session by id
    pub fn get_session(&self, session_id: &str) -> Option<Arc<BidSession>> {
        self.sessions
            .get(session_id)
            .map(|entry| entry.value().clone())
    }

    /// Remove a session; returns false if it did not exist
    pub fn close_session(&self, session_id: &str) -> bool {
        self.sessions.remove(session_id).is_some()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result(id: &str) -> CatalogResult {
        CatalogResult {
            id: id.to_string(),
            source: "Glassdoor".to_string(),
            title: "Average Construction Labor Hourly Rate 2024".to_string(),
            url: "https://www.glassdoor.com/salaries/construction-labor".to_string(),
            price: Some(75.0),
            description: "Current market rates for skilled construction labor.".to_string(),
        }
    }

    fn test_state() -> AppState {
        AppState::new(AppConfig::default()).unwrap()
    }

    #[test]
    fn test_session_lifecycle() {
        let state = test_state();
        assert_eq!(state.session_count(), 0);

        let session = state.open_session();
        assert_eq!(state.session_count(), 1);
        assert!(state.get_session(&session.session_id).is_some());

        assert!(state.close_session(&session.session_id));
        assert!(!state.close_session(&session.session_id));
        assert!(state.get_session(&session.session_id).is_none());
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let mut config = AppConfig::default();
        config.catalog.provider = "perplexity".to_string();
        assert!(AppState::new(config).is_err());
    }

    #[test]
    fn test_newest_lookup_wins() {
        let state = test_state();
        let session = state.open_session();

        let first = session.begin_lookup();
        let second = session.begin_lookup();

        // The older lookup finishes last but must not overwrite anything
        assert!(session.commit_lookup(second, "concrete", &[sample_result("4")]));
        assert!(!session.commit_lookup(first, "labor hourly", &[sample_result("1")]));

        let search = session.search_state();
        assert_eq!(search.query, "concrete");
        assert_eq!(search.results.len(), 1);
        assert_eq!(search.results[0].id, "4");
    }

    #[test]
    fn test_clear_search_invalidates_in_flight_lookup() {
        let state = test_state();
        let session = state.open_session();

        let generation = session.begin_lookup();
        session.clear_search();

        assert!(!session.commit_lookup(generation, "concrete", &[sample_result("4")]));
        assert!(session.search_state().results.is_empty());
    }

    #[test]
    fn test_find_result_returns_query_context() {
        let state = test_state();
        let session = state.open_session();

        let generation = session.begin_lookup();
        session.commit_lookup(generation, "labor hourly", &[sample_result("1")]);

        let (result, query) = session.find_result("1").unwrap();
        assert_eq!(result.id, "1");
        assert_eq!(query, "labor hourly");
        assert!(session.find_result("999").is_none());
    }
}
