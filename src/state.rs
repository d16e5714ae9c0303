use std::sync::Arc;

use letsplay_auth::TokenService;
use letsplay_config::{CorsConfig, JwtConfig, StoreConfig};
use letsplay_db::{MemoryStore, SharedStore, init_store};

#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub tokens: TokenService,
    pub cors_config: CorsConfig,
}

impl AppState {
    pub fn new(store: SharedStore, jwt_config: &JwtConfig, cors_config: CorsConfig) -> Self {
        Self {
            store,
            tokens: TokenService::new(jwt_config),
            cors_config,
        }
    }

    /// Builds the state from environment variables, connecting to the
    /// configured store.
    pub async fn from_env() -> anyhow::Result<Self> {
        let store = init_store(&StoreConfig::from_env()).await?;
        Ok(Self::new(store, &JwtConfig::from_env(), CorsConfig::from_env()))
    }

    /// State over an empty [`MemoryStore`].
    pub fn in_memory(jwt_config: &JwtConfig) -> Self {
        Self::new(
            Arc::new(MemoryStore::new()),
            jwt_config,
            CorsConfig::from_env(),
        )
    }
}
