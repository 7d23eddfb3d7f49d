use std::sync::Arc;

use instawrite_infra::{InMemoryPostStore, PostSession, PostStore, PostgresPostStore, StoreError};

use crate::config::ApiConfig;

/// Shared handles for the router: just the post store.
#[derive(Clone)]
pub struct AppServices {
    store: Arc<dyn PostStore>,
}

impl AppServices {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self { store }
    }

    /// In-memory wiring (dev/test).
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryPostStore::new()))
    }

    /// Postgres when `DATABASE_URL` is set, in-memory otherwise.
    pub async fn from_config(config: &ApiConfig) -> Result<Self, StoreError> {
        let Some(url) = config.database_url.as_deref() else {
            tracing::warn!("DATABASE_URL not set; posts are kept in memory and lost on restart");
            return Ok(Self::in_memory());
        };

        let store = PostgresPostStore::connect(url, config.database_max_connections).await?;
        store.ensure_schema().await?;
        Ok(Self::new(Arc::new(store)))
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    /// Open the store session for the current request.
    pub async fn session(&self) -> Result<Box<dyn PostSession>, StoreError> {
        self.store.session().await
    }
}
