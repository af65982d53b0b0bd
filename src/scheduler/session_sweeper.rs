//! Idle session sweeper
//!
//! Bid sessions are ephemeral and nothing persists them, so abandoned ones
//! only disappear if something evicts them. This task wakes on a fixed
//! interval and drops every session that has been idle longer than the
//! configured timeout, the service-side equivalent of the dashboard's
//! ledger resetting on reload.

use crate::services::SessionService;
use crate::state::AppState;
use std::sync::Arc;
use tracing::{debug, info};

/// Periodic eviction of idle bid sessions
pub struct SessionSweeper {
    state: Arc<AppState>,
}

impl SessionSweeper {
    /// Create a new session sweeper
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Start the sweeper as a background task
    pub fn start(self) {
        let interval = self.state.config.sweep_interval();
        let timeout = self.state.config.idle_timeout();

        info!(
            "Session sweeper started: interval {}s, idle timeout {}s",
            interval.as_secs(),
            timeout.as_secs()
        );

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick fires immediately; skip it so a fresh process
            // doesn't sweep before anyone has connected
            ticker.tick().await;

            loop {
                ticker.tick().await;

                let evicted = SessionService::sweep_idle(&self.state);
                if evicted > 0 {
                    info!("Evicted {} idle bid sessions", evicted);
                } else {
                    debug!(
                        "Session sweep: nothing to evict ({} active)",
                        self.state.session_count()
                    );
                }
            }
        });
    }
}
