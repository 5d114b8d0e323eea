use config::Config;
use filter::AuditSink;
use session::SessionRegistry;
use std::sync::Arc;

pub mod config;
pub mod filter;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod session;
pub mod utils;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub sessions: Arc<SessionRegistry>,
}

impl AppState {
    pub fn new(config: Config, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            sessions: Arc::new(SessionRegistry::new(config.clone(), audit)),
            config,
        }
    }
}
