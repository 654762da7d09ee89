//! The record store contract and its two backends.
//!
//! The contract is deliberately small: list, get, put, delete over JSON
//! documents in per-organization collections. [`PgStore`] keeps every
//! document in one JSONB table; [`MemStore`] backs tests and demos.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use sqlx::Row;

use crate::session::OrgContext;
use crate::DbPool;

/// Document id of the single `bank_info` record.
pub const BANK_INFO_DOC: &str = "main";
/// Document id of the single `settings` record.
pub const SETTINGS_DOC: &str = "global";

/// The collections the console stores records under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Collection {
    Families,
    Campaigns,
    Packages,
    Events,
    Locations,
    BankInfo,
    Settings,
}

impl Collection {
    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Families => "families",
            Collection::Campaigns => "campaigns",
            Collection::Packages => "packages",
            Collection::Events => "events",
            Collection::Locations => "locations",
            Collection::BankInfo => "bank_info",
            Collection::Settings => "settings",
        }
    }
}

/// Errors from the record-store layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Record serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Namespaced document operations, the full contract the domain layer
/// consumes. Implementations must be safe to share across tasks.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All documents of a collection, in unspecified order.
    async fn list(
        &self,
        ctx: &OrgContext,
        collection: Collection,
    ) -> Result<Vec<serde_json::Value>, StoreError>;

    /// One document by id, or `None` when absent.
    async fn get(
        &self,
        ctx: &OrgContext,
        collection: Collection,
        id: &str,
    ) -> Result<Option<serde_json::Value>, StoreError>;

    /// Insert or replace a document.
    async fn put(
        &self,
        ctx: &OrgContext,
        collection: Collection,
        id: &str,
        doc: serde_json::Value,
    ) -> Result<(), StoreError>;

    /// Remove a document. Deleting an absent id is not an error.
    async fn delete(
        &self,
        ctx: &OrgContext,
        collection: Collection,
        id: &str,
    ) -> Result<(), StoreError>;
}

/// Postgres-backed store: one JSONB row per document.
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgStore {
    async fn list(
        &self,
        ctx: &OrgContext,
        collection: Collection,
    ) -> Result<Vec<serde_json::Value>, StoreError> {
        let rows = sqlx::query(
            "SELECT doc FROM records WHERE org_id = $1 AND collection = $2 ORDER BY updated_at",
        )
        .bind(&ctx.org_id)
        .bind(collection.as_str())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|row| row.get("doc")).collect())
    }

    async fn get(
        &self,
        ctx: &OrgContext,
        collection: Collection,
        id: &str,
    ) -> Result<Option<serde_json::Value>, StoreError> {
        let row = sqlx::query(
            "SELECT doc FROM records WHERE org_id = $1 AND collection = $2 AND id = $3",
        )
        .bind(&ctx.org_id)
        .bind(collection.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|row| row.get("doc")))
    }

    async fn put(
        &self,
        ctx: &OrgContext,
        collection: Collection,
        id: &str,
        doc: serde_json::Value,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO records (org_id, collection, id, doc, updated_at)
             VALUES ($1, $2, $3, $4, NOW())
             ON CONFLICT (org_id, collection, id)
             DO UPDATE SET doc = EXCLUDED.doc, updated_at = NOW()",
        )
        .bind(&ctx.org_id)
        .bind(collection.as_str())
        .bind(id)
        .bind(doc)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(
        &self,
        ctx: &OrgContext,
        collection: Collection,
        id: &str,
    ) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM records WHERE org_id = $1 AND collection = $2 AND id = $3")
            .bind(&ctx.org_id)
            .bind(collection.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// In-memory store for tests and local demos.
///
/// A `BTreeMap` keeps listing order deterministic across runs.
#[derive(Default)]
pub struct MemStore {
    records: RwLock<BTreeMap<(String, String, String), serde_json::Value>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(ctx: &OrgContext, collection: Collection, id: &str) -> (String, String, String) {
        (
            ctx.org_id.clone(),
            collection.as_str().to_string(),
            id.to_string(),
        )
    }
}

#[async_trait]
impl RecordStore for MemStore {
    async fn list(
        &self,
        ctx: &OrgContext,
        collection: Collection,
    ) -> Result<Vec<serde_json::Value>, StoreError> {
        let records = self.records.read().expect("record store lock poisoned");
        Ok(records
            .iter()
            .filter(|((org, coll, _), _)| *org == ctx.org_id && coll == collection.as_str())
            .map(|(_, doc)| doc.clone())
            .collect())
    }

    async fn get(
        &self,
        ctx: &OrgContext,
        collection: Collection,
        id: &str,
    ) -> Result<Option<serde_json::Value>, StoreError> {
        let records = self.records.read().expect("record store lock poisoned");
        Ok(records.get(&Self::key(ctx, collection, id)).cloned())
    }

    async fn put(
        &self,
        ctx: &OrgContext,
        collection: Collection,
        id: &str,
        doc: serde_json::Value,
    ) -> Result<(), StoreError> {
        let mut records = self.records.write().expect("record store lock poisoned");
        records.insert(Self::key(ctx, collection, id), doc);
        Ok(())
    }

    async fn delete(
        &self,
        ctx: &OrgContext,
        collection: Collection,
        id: &str,
    ) -> Result<(), StoreError> {
        let mut records = self.records.write().expect("record store lock poisoned");
        records.remove(&Self::key(ctx, collection, id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn mem_store_round_trip() {
        let store = MemStore::new();
        let ctx = OrgContext::new("org-1");

        store
            .put(&ctx, Collection::Packages, "a", json!({"name": "Basic"}))
            .await
            .unwrap();

        let doc = store.get(&ctx, Collection::Packages, "a").await.unwrap();
        assert_eq!(doc, Some(json!({"name": "Basic"})));

        let all = store.list(&ctx, Collection::Packages).await.unwrap();
        assert_eq!(all.len(), 1);

        store.delete(&ctx, Collection::Packages, "a").await.unwrap();
        assert!(store
            .get(&ctx, Collection::Packages, "a")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn organizations_are_isolated() {
        let store = MemStore::new();
        let org_a = OrgContext::new("org-a");
        let org_b = OrgContext::new("org-b");

        store
            .put(&org_a, Collection::Families, "f", json!({"name": "Silva"}))
            .await
            .unwrap();

        assert!(store
            .get(&org_b, Collection::Families, "f")
            .await
            .unwrap()
            .is_none());
        assert!(store.list(&org_b, Collection::Families).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_of_absent_id_is_ok() {
        let store = MemStore::new();
        let ctx = OrgContext::new("org-1");
        store
            .delete(&ctx, Collection::Events, "missing")
            .await
            .unwrap();
    }
}
