use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::events::{ActionKind, EventRecord, StoredRecord};

pub mod database;
pub mod entity;
pub mod memory;

pub use database::SqlActionStore;
pub use memory::MemoryActionStore;

/// Connection string that selects the in-process store.
pub const MEMORY_STORE_URL: &str = "memory";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] sea_orm::DbErr),
    #[error("stored record {id} has unknown action `{action}`")]
    UnknownAction { id: String, action: String },
}

/// Append-only history of classified webhook events.
#[async_trait]
pub trait ActionStore: Send + Sync {
    /// Appends `record` and returns its storage identifier.
    async fn append(&self, record: &EventRecord) -> Result<String, StoreError>;

    async fn contains(&self, request_id: &str, action: ActionKind) -> Result<bool, StoreError>;

    /// All records, most recent timestamp first.
    async fn list_recent(&self) -> Result<Vec<StoredRecord>, StoreError>;
}

pub async fn connect(database_url: &str) -> Result<Arc<dyn ActionStore>, StoreError> {
    if database_url == MEMORY_STORE_URL {
        tracing::warn!("Using in-memory action store; history is lost on restart");
        return Ok(Arc::new(MemoryActionStore::new()));
    }

    let store = SqlActionStore::connect(database_url).await?;
    Ok(Arc::new(store))
}
