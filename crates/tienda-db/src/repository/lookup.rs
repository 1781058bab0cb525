//! # Lookup Repository
//!
//! Minimal writes for the users/clients name tables. Full account and
//! client management belongs to another system; these upserts exist for
//! the seed binary and for wiring up history projections in tests.

use sqlx::SqlitePool;

use crate::error::DbResult;

#[derive(Debug, Clone)]
pub struct LookupRepository {
    pool: SqlitePool,
}

impl LookupRepository {
    pub fn new(pool: SqlitePool) -> Self {
        LookupRepository { pool }
    }

    /// Inserts or renames a user.
    pub async fn upsert_user(&self, id: &str, username: &str) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO users (id, username) VALUES (?1, ?2) \
             ON CONFLICT(id) DO UPDATE SET username = excluded.username",
        )
        .bind(id)
        .bind(username)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Inserts or renames a client.
    pub async fn upsert_client(&self, id: &str, name: &str) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO clients (id, name) VALUES (?1, ?2) \
             ON CONFLICT(id) DO UPDATE SET name = excluded.name",
        )
        .bind(id)
        .bind(name)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
