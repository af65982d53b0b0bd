//! ContractSIG Bid Calculator - Contract Bidding Pricing Service
//!
//! Backend service for the ContractSIG dashboard's bid calculator: catalog
//! lookups for priced line items, an in-memory bid ledger per session, and a
//! pure pricing engine for totals, profit, and recommended bid prices.

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod ledger;
pub mod pricing;
pub mod scheduler;
pub mod services;
pub mod state;

use api::ApiServer;
use config::AppConfig;
use scheduler::SessionSweeper;
use state::AppState;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize and run the calculator service until shutdown
pub async fn run() -> anyhow::Result<()> {
    // Initialize tracing/logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "contractsig_calculator_lib=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting ContractSIG Bid Calculator...");

    let config = AppConfig::from_env()?;
    let state = Arc::new(AppState::new(config)?);

    // Evict abandoned sessions in the background
    SessionSweeper::new(state.clone()).start();

    let mut server = ApiServer::new(state);
    server.start().await?;

    tracing::info!("Service initialized");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");
    server.stop();

    Ok(())
}
