use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ActionStore, StoreError};
use crate::events::{ActionKind, EventRecord, StoredRecord};

#[derive(Default)]
struct Inner {
    next_id: u64,
    records: Vec<StoredRecord>,
}

/// Process-local action history, used for tests and `DATABASE_URL=memory`.
#[derive(Default)]
pub struct MemoryActionStore {
    inner: RwLock<Inner>,
}

impl MemoryActionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ActionStore for MemoryActionStore {
    async fn append(&self, record: &EventRecord) -> Result<String, StoreError> {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let id = inner.next_id.to_string();
        inner.records.push(StoredRecord {
            id: id.clone(),
            record: record.clone(),
        });
        Ok(id)
    }

    async fn contains(&self, request_id: &str, action: ActionKind) -> Result<bool, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .records
            .iter()
            .any(|s| s.record.request_id.as_deref() == Some(request_id) && s.record.action == action))
    }

    async fn list_recent(&self) -> Result<Vec<StoredRecord>, StoreError> {
        let inner = self.inner.read().await;
        // Newest insert first, then a stable sort so equal timestamps keep that order.
        let mut records: Vec<StoredRecord> = inner.records.iter().rev().cloned().collect();
        records.sort_by(|a, b| b.record.timestamp.cmp(&a.record.timestamp));
        Ok(records)
    }
}
