use std::collections::HashSet;
use std::marker::PhantomData;

use async_trait::async_trait;
use common::EntityId;
use domain::{Criteria, Domain};
use indexmap::IndexMap;
use sqlx::{PgPool, Postgres, QueryBuilder, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{
    Entries, Entry, Result, StoreError,
    join::JoinIndex,
    store::Store,
};

/// Runs the database migrations for the `entries` and `links` tables.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    Ok(())
}

fn to_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// PostgreSQL-backed store implementation.
///
/// Every domain shares the `entries` table; rows are partitioned by the
/// domain name and values are stored as JSONB. Each criteria field compiles
/// to a JSONB equality on that top-level key, so nested arrays and objects
/// must match exactly.
pub struct PostgresStore<D> {
    pool: PgPool,
    _domain: PhantomData<fn() -> D>,
}

impl<D> Clone for PostgresStore<D> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _domain: PhantomData,
        }
    }
}

impl<D: Domain> PostgresStore<D> {
    /// Creates a new PostgreSQL store for domain `D`.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _domain: PhantomData,
        }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn row_to_entry(row: PgRow) -> Result<Entry<D>> {
        let id: Uuid = row.try_get("id")?;
        let value: serde_json::Value = row.try_get("value")?;
        Ok(Entry::new(
            EntityId::from_uuid(id),
            serde_json::from_value(value)?,
        ))
    }
}

#[async_trait]
impl<D: Domain> Store<D> for PostgresStore<D> {
    async fn get_one(&self, id: EntityId) -> Result<Option<Entry<D>>> {
        let row = sqlx::query("SELECT id, value FROM entries WHERE domain = $1 AND id = $2")
            .bind(D::NAME)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_entry).transpose()
    }

    async fn get_many(&self, criteria: &Criteria, skip: usize, limit: usize) -> Result<Entries<D>> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT id, value FROM entries WHERE domain = ");
        query.push_bind(D::NAME);
        for (field, expected) in criteria.fields() {
            query
                .push(" AND value -> ")
                .push_bind(field.as_str())
                .push(" = ")
                .push_bind(expected.clone());
        }
        query
            .push(" ORDER BY seq ASC OFFSET ")
            .push_bind(to_i64(skip))
            .push(" LIMIT ")
            .push_bind(to_i64(limit));

        let rows = query.build().fetch_all(&self.pool).await?;

        let mut entries = IndexMap::with_capacity(rows.len());
        for row in rows {
            let entry = Self::row_to_entry(row)?;
            entries.insert(entry.id, entry.value);
        }
        Ok(entries)
    }

    async fn create(&self, value: D) -> Result<EntityId> {
        let id = EntityId::new();
        let payload = serde_json::to_value(&value)?;

        let affected = sqlx::query("INSERT INTO entries (domain, id, value) VALUES ($1, $2, $3)")
            .bind(D::NAME)
            .bind(id.as_uuid())
            .bind(payload)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if affected != 1 {
            return Err(StoreError::Processing {
                domain: D::NAME,
                affected,
            });
        }
        Ok(id)
    }

    async fn update(&self, id: EntityId, value: D) -> Result<bool> {
        let payload = serde_json::to_value(&value)?;

        let affected = sqlx::query(
            r#"
            UPDATE entries
            SET value = $3, updated_at = now()
            WHERE domain = $1 AND id = $2
            "#,
        )
        .bind(D::NAME)
        .bind(id.as_uuid())
        .bind(payload)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(affected == 1)
    }

    async fn delete(&self, id: EntityId) -> Result<bool> {
        let affected = sqlx::query("DELETE FROM entries WHERE domain = $1 AND id = $2")
            .bind(D::NAME)
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(affected == 1)
    }

    async fn count(&self) -> Result<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM entries WHERE domain = $1")
            .bind(D::NAME)
            .fetch_one(&self.pool)
            .await?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}

/// PostgreSQL-backed join index.
///
/// All pairs share the `links` table, partitioned by root and extension
/// domain names.
#[derive(Clone)]
pub struct PostgresJoinIndex {
    pool: PgPool,
    root_domain: &'static str,
    extension_domain: &'static str,
}

impl PostgresJoinIndex {
    /// Creates the join index between two domains.
    pub fn new(pool: PgPool, root_domain: &'static str, extension_domain: &'static str) -> Self {
        Self {
            pool,
            root_domain,
            extension_domain,
        }
    }

    /// Creates the join index for the `T -> U` pair.
    pub fn between<T: Domain, U: Domain>(pool: PgPool) -> Self {
        Self::new(pool, T::NAME, U::NAME)
    }
}

#[async_trait]
impl JoinIndex for PostgresJoinIndex {
    async fn add(&self, root: EntityId, extension: EntityId) -> Result<bool> {
        let affected = sqlx::query(
            r#"
            INSERT INTO links (root_domain, extension_domain, root_id, extension_id)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(self.root_domain)
        .bind(self.extension_domain)
        .bind(root.as_uuid())
        .bind(extension.as_uuid())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(affected == 1)
    }

    async fn remove(&self, root: EntityId, extension: EntityId) -> Result<bool> {
        let affected = sqlx::query(
            r#"
            DELETE FROM links
            WHERE root_domain = $1 AND extension_domain = $2
              AND root_id = $3 AND extension_id = $4
            "#,
        )
        .bind(self.root_domain)
        .bind(self.extension_domain)
        .bind(root.as_uuid())
        .bind(extension.as_uuid())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(affected == 1)
    }

    async fn contains(&self, root: EntityId, extension: EntityId) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM links
                WHERE root_domain = $1 AND extension_domain = $2
                  AND root_id = $3 AND extension_id = $4
            )
            "#,
        )
        .bind(self.root_domain)
        .bind(self.extension_domain)
        .bind(root.as_uuid())
        .bind(extension.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn linked(&self, root: EntityId) -> Result<HashSet<EntityId>> {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            r#"
            SELECT extension_id FROM links
            WHERE root_domain = $1 AND extension_domain = $2 AND root_id = $3
            "#,
        )
        .bind(self.root_domain)
        .bind(self.extension_domain)
        .bind(root.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(ids.into_iter().map(EntityId::from_uuid).collect())
    }
}
