//! Session Service
//!
//! Bid sessions are ephemeral: opened when the dashboard loads the
//! calculator, discarded on close or after sitting idle. Nothing is ever
//! persisted.

use crate::error::{AppError, Result};
use crate::state::{AppState, BidSession};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Public view of a session
#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
}

/// Session service for business logic
pub struct SessionService;

impl SessionService {
    /// Open a new bid session
    pub fn open_session(state: &AppState) -> SessionInfo {
        let session = state.open_session();
        info!("Opened bid session {}", session.session_id);

        SessionInfo {
            session_id: session.session_id.clone(),
            created_at: session.created_at,
        }
    }

    /// Fetch a session and record the activity
    pub fn get_session(state: &AppState, session_id: &str) -> Result<Arc<BidSession>> {
        let session = state
            .get_session(session_id)
            .ok_or_else(|| AppError::Session(format!("Unknown bid session: {}", session_id)))?;

        session.touch();
        Ok(session)
    }

    /// Close a session, discarding its ledger
    pub fn close_session(state: &AppState, session_id: &str) -> Result<()> {
        if !state.close_session(session_id) {
            return Err(AppError::Session(format!(
                "Unknown bid session: {}",
                session_id
            )));
        }

        info!("Closed bid session {}", session_id);
        Ok(())
    }

    /// Evict sessions idle longer than the configured timeout.
    /// Returns the number of evicted sessions.
    pub fn sweep_idle(state: &AppState) -> usize {
        let timeout = state.config.session.idle_timeout_secs as i64;
        let now = Utc::now();
        let before = state.session_count();

        state
            .sessions
            .retain(|_, session| session.idle_seconds(now) < timeout);

        before - state.session_count()
    }
}
