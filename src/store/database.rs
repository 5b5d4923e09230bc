use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectOptions, ConnectionTrait, Database,
    DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Schema, Set,
};

use super::entity::{self, Entity as Actions};
use super::{ActionStore, StoreError};
use crate::events::{ActionKind, EventRecord, StoredRecord};

/// Action history backed by a SQL database through sea-orm.
pub struct SqlActionStore {
    db: DatabaseConnection,
}

impl SqlActionStore {
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let mut opt = ConnectOptions::new(database_url);
        opt.sqlx_logging(false);
        // Every pooled connection to `sqlite::memory:` would see its own empty database.
        if database_url.contains(":memory:") {
            opt.max_connections(1).min_connections(1);
        } else {
            opt.max_connections(10);
        }

        let db = Database::connect(opt).await?;
        let store = Self::from_connection(db);
        store.init_schema().await?;
        tracing::info!("Connected to action store");
        Ok(store)
    }

    pub fn from_connection(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn init_schema(&self) -> Result<(), StoreError> {
        let backend = self.db.get_database_backend();
        let schema = Schema::new(backend);

        let mut stmt = schema.create_table_from_entity(Actions);
        stmt.if_not_exists();
        self.db.execute(backend.build(&stmt)).await?;

        self.db
            .execute_unprepared(
                "CREATE INDEX IF NOT EXISTS idx_actions_timestamp ON actions(timestamp)",
            )
            .await?;

        Ok(())
    }

    fn to_stored(model: entity::Model) -> Result<StoredRecord, StoreError> {
        let id = model.id.to_string();
        let action = model
            .action
            .parse::<ActionKind>()
            .map_err(|_| StoreError::UnknownAction {
                id: id.clone(),
                action: model.action.clone(),
            })?;

        Ok(StoredRecord {
            id,
            record: EventRecord {
                request_id: model.request_id,
                author: model.author,
                action,
                from_branch: model.from_branch,
                to_branch: model.to_branch,
                timestamp: model.timestamp,
            },
        })
    }
}

#[async_trait]
impl ActionStore for SqlActionStore {
    async fn append(&self, record: &EventRecord) -> Result<String, StoreError> {
        let row = entity::ActiveModel {
            id: NotSet,
            request_id: Set(record.request_id.clone()),
            author: Set(record.author.clone()),
            action: Set(record.action.as_str().to_string()),
            from_branch: Set(record.from_branch.clone()),
            to_branch: Set(record.to_branch.clone()),
            timestamp: Set(record.timestamp.clone()),
        };

        let inserted = row.insert(&self.db).await?;
        Ok(inserted.id.to_string())
    }

    async fn contains(&self, request_id: &str, action: ActionKind) -> Result<bool, StoreError> {
        let count = Actions::find()
            .filter(entity::Column::RequestId.eq(request_id))
            .filter(entity::Column::Action.eq(action.as_str()))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn list_recent(&self) -> Result<Vec<StoredRecord>, StoreError> {
        Actions::find()
            .order_by_desc(entity::Column::Timestamp)
            .order_by_desc(entity::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Self::to_stored)
            .collect()
    }
}
