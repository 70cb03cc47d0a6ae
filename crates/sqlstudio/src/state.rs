use std::sync::Arc;

use sqlstudio_auth::AuthGate;
use sqlx::MySqlPool;

use crate::config::StudioConfig;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub pool: MySqlPool,
    pub gate: Arc<AuthGate>,
    pub config: StudioConfig,
}

impl AppState {
    pub fn new(pool: MySqlPool, gate: AuthGate, config: StudioConfig) -> Self {
        Self {
            pool,
            gate: Arc::new(gate),
            config,
        }
    }
}
