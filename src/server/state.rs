use std::sync::Arc;

use crate::config::Config;
use crate::engine::IngestionCoordinator;
use crate::server::auth::{Authenticator, StaticTokenVerifier, TokenVerifier};
use crate::storage::Storage;

pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    pub coordinator: IngestionCoordinator<dyn Storage>,
    pub authenticator: Authenticator
}

impl AppState {
    /// Builds state that verifies bearer tokens against the configured token table.
    pub fn new(config: Config, storage: Arc<dyn Storage>) -> Self {
        let verifier = Arc::new(StaticTokenVerifier::new(config.tokens.clone()));

        Self::with_verifier(config, storage, verifier)
    }

    pub fn with_verifier(config: Config, storage: Arc<dyn Storage>, verifier: Arc<dyn TokenVerifier>) -> Self {
        Self {
            coordinator: IngestionCoordinator::new(storage.clone(), config.marketplace_cut),
            authenticator: Authenticator::new(verifier, config.auth_cache_ttl),
            storage,
            config
        }
    }
}
