use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::config::AppConfig;
use crate::store::memory::{MemoryCredentialStore, MemoryTicketStore};
use crate::store::postgres::{PgCredentialStore, PgTicketStore};
use crate::store::{CredentialStore, TicketStore};

/// Shared application state. The stores are injected as trait objects so the
/// API layer never touches the persistence engine directly.
#[derive(Clone)]
pub struct AppState {
    pub tickets: Arc<dyn TicketStore>,
    pub credentials: Arc<dyn CredentialStore>,
}

impl AppState {
    pub async fn init(config: &AppConfig) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        if let Err(e) = sqlx::migrate!("./migrations").run(&pool).await {
            tracing::warn!(error = %e, "migration failed; continuing with existing schema");
        }

        Ok(Self::from_parts(
            Arc::new(PgTicketStore::new(pool.clone())),
            Arc::new(PgCredentialStore::new(pool)),
        ))
    }

    pub fn from_parts(
        tickets: Arc<dyn TicketStore>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            tickets,
            credentials,
        }
    }

    /// State backed by in-memory stores; no database required.
    pub fn in_memory() -> Self {
        Self::from_parts(
            Arc::new(MemoryTicketStore::default()),
            Arc::new(MemoryCredentialStore::default()),
        )
    }
}
