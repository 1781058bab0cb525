//! # Till Repository
//!
//! Rows for cash-drawer sessions. Tills are append-style history: a row
//! is inserted Open, updated to Closed exactly once, and never deleted.
//! The `idx_tills_one_open_per_user` partial unique index backs the
//! one-open-till-per-user invariant at the storage layer.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use tienda_core::Till;

const TILL_COLUMNS: &str =
    "id, user_id, opened_at, closed_at, opening_cents, closing_cents, state";

/// Repository for till sessions.
#[derive(Debug, Clone)]
pub struct TillRepository {
    pool: SqlitePool,
}

impl TillRepository {
    pub fn new(pool: SqlitePool) -> Self {
        TillRepository { pool }
    }

    /// Inserts a new till inside a caller-supplied transaction, so the
    /// open-till existence check and the insert commit together. A
    /// concurrent open that slips between them still dies on the
    /// partial unique index.
    pub async fn insert(conn: &mut SqliteConnection, till: &Till) -> DbResult<()> {
        debug!(id = %till.id, user_id = %till.user_id, "inserting till");

        sqlx::query(
            "INSERT INTO tills \
             (id, user_id, opened_at, closed_at, opening_cents, closing_cents, state) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&till.id)
        .bind(&till.user_id)
        .bind(till.opened_at)
        .bind(till.closed_at)
        .bind(till.opening_cents)
        .bind(till.closing_cents)
        .bind(till.state)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// The user's currently open till, if any.
    pub async fn find_open_for_user(&self, user_id: &str) -> DbResult<Option<Till>> {
        let till = sqlx::query_as::<_, Till>(&format!(
            "SELECT {TILL_COLUMNS} FROM tills WHERE user_id = ?1 AND state = 'open'"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(till)
    }

    /// Same lookup on a transaction connection; the sale processor
    /// resolves the till on the connection it will write with.
    pub async fn find_open_for_user_tx(
        conn: &mut SqliteConnection,
        user_id: &str,
    ) -> DbResult<Option<Till>> {
        let till = sqlx::query_as::<_, Till>(&format!(
            "SELECT {TILL_COLUMNS} FROM tills WHERE user_id = ?1 AND state = 'open'"
        ))
        .bind(user_id)
        .fetch_optional(conn)
        .await?;

        Ok(till)
    }

    /// Closes a till. The `state = 'open'` guard makes close-once atomic:
    /// a till that was already closed (or never existed) matches zero
    /// rows and surfaces as NotFound.
    pub async fn close(
        &self,
        id: &str,
        closed_at: DateTime<Utc>,
        closing_cents: i64,
    ) -> DbResult<()> {
        debug!(id = %id, closing_cents = %closing_cents, "closing till");

        let result = sqlx::query(
            "UPDATE tills \
             SET state = 'closed', closed_at = ?2, closing_cents = ?3 \
             WHERE id = ?1 AND state = 'open'",
        )
        .bind(id)
        .bind(closed_at)
        .bind(closing_cents)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("open till", id));
        }

        Ok(())
    }

    /// Full till history, most recent first.
    pub async fn list_all(&self) -> DbResult<Vec<Till>> {
        let tills = sqlx::query_as::<_, Till>(&format!(
            "SELECT {TILL_COLUMNS} FROM tills ORDER BY opened_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(tills)
    }
}
