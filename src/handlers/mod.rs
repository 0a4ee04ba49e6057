//! HTTP handlers for the MediRank API
//!
//! - health: liveness and artifact readiness
//! - session: login, logout and session lookup
//! - ranking: selector options and the top-3 ranking
//! - metrics_handler: Prometheus exposition

pub mod health;
pub mod metrics_handler;
pub mod ranking;
pub mod session;

use std::sync::Arc;

use crate::{artifacts::ArtifactCache, credentials::CredentialStore, sessions::SessionStore};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub credentials: Arc<CredentialStore>,
    pub sessions: Arc<SessionStore>,
    pub artifacts: Arc<ArtifactCache>,
}

impl AppState {
    pub fn new(credentials: CredentialStore, artifacts: ArtifactCache) -> Self {
        Self {
            credentials: Arc::new(credentials),
            sessions: Arc::new(SessionStore::new()),
            artifacts: Arc::new(artifacts),
        }
    }
}
