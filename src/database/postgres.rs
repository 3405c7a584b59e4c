use async_trait::async_trait;
use serde_json::Value;
use sqlx::types::Json;
use tracing::{debug, info};

use super::manager::{DatabaseError, DatabaseManager};
use super::store::{Collection, DocumentFilter, DocumentStore};

/// Document store on Postgres: one table per collection, one JSONB document
/// per row, keyed by the application identifier.
pub struct PgDocumentStore {
    manager: DatabaseManager,
}

impl PgDocumentStore {
    pub fn new(manager: DatabaseManager) -> Self {
        Self { manager }
    }

    pub fn manager(&self) -> &DatabaseManager {
        &self.manager
    }

    fn table(collection: Collection) -> String {
        DatabaseManager::quote_identifier(collection.table_name())
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn find(&self, collection: Collection, filter: &DocumentFilter) -> Result<Vec<Value>, DatabaseError> {
        let pool = self.manager.pool().await?;
        let sql = format!(
            "SELECT document FROM {} WHERE document @> $1 ORDER BY created_at DESC",
            Self::table(collection)
        );

        let rows: Vec<Json<Value>> = sqlx::query_scalar(&sql)
            .bind(Json(filter.to_value()))
            .fetch_all(pool)
            .await?;

        debug!("find {} -> {} documents", collection.table_name(), rows.len());
        Ok(rows.into_iter().map(|Json(doc)| doc).collect())
    }

    async fn find_one(&self, collection: Collection, id: &str) -> Result<Option<Value>, DatabaseError> {
        let pool = self.manager.pool().await?;
        let sql = format!("SELECT document FROM {} WHERE id = $1", Self::table(collection));

        let row: Option<Json<Value>> = sqlx::query_scalar(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(|Json(doc)| doc))
    }

    async fn insert(&self, collection: Collection, id: &str, document: Value) -> Result<(), DatabaseError> {
        let pool = self.manager.pool().await?;
        let sql = format!(
            "INSERT INTO {} (id, document) VALUES ($1, $2)",
            Self::table(collection)
        );

        sqlx::query(&sql)
            .bind(id)
            .bind(Json(document))
            .execute(pool)
            .await?;
        Ok(())
    }

    async fn replace(&self, collection: Collection, id: &str, document: Value) -> Result<bool, DatabaseError> {
        let pool = self.manager.pool().await?;
        let sql = format!(
            "UPDATE {} SET document = $2, updated_at = now() WHERE id = $1",
            Self::table(collection)
        );

        let result = sqlx::query(&sql)
            .bind(id)
            .bind(Json(document))
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<bool, DatabaseError> {
        let pool = self.manager.pool().await?;
        let sql = format!("DELETE FROM {} WHERE id = $1", Self::table(collection));

        let result = sqlx::query(&sql).bind(id).execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_many(&self, collection: Collection, filter: &DocumentFilter) -> Result<u64, DatabaseError> {
        let pool = self.manager.pool().await?;
        let sql = format!("DELETE FROM {} WHERE document @> $1", Self::table(collection));

        let result = sqlx::query(&sql)
            .bind(Json(filter.to_value()))
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn ensure_collections(&self) -> Result<(), DatabaseError> {
        let pool = self.manager.pool().await?;

        for collection in Collection::ALL {
            let name = collection.table_name();
            let create = format!(
                r#"
                CREATE TABLE IF NOT EXISTS {} (
                    id TEXT PRIMARY KEY,
                    document JSONB NOT NULL,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
                )
                "#,
                Self::table(collection)
            );
            sqlx::query(&create).execute(pool).await?;

            let index = format!(
                "CREATE INDEX IF NOT EXISTS {} ON {} USING GIN (document jsonb_path_ops)",
                DatabaseManager::quote_identifier(&format!("{}_document_idx", name)),
                Self::table(collection)
            );
            sqlx::query(&index).execute(pool).await?;

            info!("Collection ready: {}", name);
        }

        Ok(())
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        self.manager.health_check().await
    }
}
