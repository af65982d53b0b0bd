//! Catalog provider module
//!
//! The lookup that turns a free-text query into priced candidates lives behind
//! the `CatalogProvider` trait so the bundled fixture catalog can later be
//! replaced by a real pricing-search service without touching the services
//! layer.

pub mod fixture;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// A priced candidate returned by a lookup, not yet committed to a bid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogResult {
    /// Unique within a single lookup response
    pub id: String,
    /// Provenance label (e.g., "Home Depot")
    pub source: String,
    pub title: String,
    pub url: String,
    /// Absent when the source publishes no unit price
    pub price: Option<f64>,
    pub description: String,
}

/// Catalog provider trait that all pricing sources must implement
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Provider id (e.g., "fixture")
    fn id(&self) -> &'static str;

    /// Provider display name
    fn name(&self) -> &'static str;

    /// Look up priced candidates for a free-text query.
    ///
    /// Empty and whitespace-only queries yield an empty list. Queries that
    /// match nothing degrade to synthetic generic results, so a non-empty
    /// query always produces candidates.
    async fn search(&self, query: &str) -> Result<Vec<CatalogResult>>;
}

/// Catalog registry for managing multiple providers
pub struct CatalogRegistry {
    providers: HashMap<String, Arc<dyn CatalogProvider>>,
}

impl CatalogRegistry {
    /// Create new catalog registry with all bundled providers
    pub fn new(lookup_latency: Duration) -> Self {
        let mut providers: HashMap<String, Arc<dyn CatalogProvider>> = HashMap::new();

        providers.insert(
            "fixture".to_string(),
            Arc::new(fixture::FixtureCatalog::new(lookup_latency)),
        );

        Self { providers }
    }

    /// Get provider by ID
    pub fn get(&self, id: &str) -> Option<Arc<dyn CatalogProvider>> {
        self.providers.get(id).cloned()
    }

    /// List all available providers
    pub fn list(&self) -> Vec<Arc<dyn CatalogProvider>> {
        self.providers.values().cloned().collect()
    }
}
