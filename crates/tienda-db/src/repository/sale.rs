//! # Sale Repository
//!
//! The append-only sales ledger. Headers and lines are only ever
//! inserted, always inside the processor's transaction; there is no
//! update or delete statement in this module on purpose.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use tienda_core::{Sale, SaleLine, SaleLineDetail, SaleSummary};

/// Repository for the sales ledger.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Inserts a sale header inside a caller-supplied transaction.
    pub async fn insert_sale(conn: &mut SqliteConnection, sale: &Sale) -> DbResult<()> {
        debug!(id = %sale.id, total_cents = %sale.total_cents, "inserting sale");

        sqlx::query(
            "INSERT INTO sales \
             (id, till_id, user_id, client_id, total_cents, payment_method, \
              tendered_cents, change_cents, reference, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )
        .bind(&sale.id)
        .bind(&sale.till_id)
        .bind(&sale.user_id)
        .bind(&sale.client_id)
        .bind(sale.total_cents)
        .bind(sale.payment_method)
        .bind(sale.tendered_cents)
        .bind(sale.change_cents)
        .bind(&sale.reference)
        .bind(sale.created_at)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Inserts one line, same transaction as its header. The unit price
    /// and subtotal are the frozen at-sale-time values.
    pub async fn insert_line(conn: &mut SqliteConnection, line: &SaleLine) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO sale_lines \
             (id, sale_id, product_id, quantity, unit_price_cents, subtotal_cents) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(&line.id)
        .bind(&line.sale_id)
        .bind(&line.product_id)
        .bind(line.quantity)
        .bind(line.unit_price_cents)
        .bind(line.subtotal_cents)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Fetches a sale header by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            "SELECT id, till_id, user_id, client_id, total_cents, payment_method, \
             tendered_cents, change_cents, reference, created_at \
             FROM sales WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Lines for a sale with product names resolved. The join reads the
    /// *current* catalog name for display; prices come from the frozen
    /// line columns, never from the catalog.
    pub async fn get_lines(&self, sale_id: &str) -> DbResult<Vec<SaleLineDetail>> {
        let lines = sqlx::query_as::<_, SaleLineDetail>(
            "SELECT l.id, l.sale_id, l.product_id, p.name AS product_name, \
             l.quantity, l.unit_price_cents, l.subtotal_cents \
             FROM sale_lines l \
             JOIN products p ON p.id = l.product_id \
             WHERE l.sale_id = ?1 \
             ORDER BY l.rowid",
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Sales history projection, most recent first. Walk-in customers
    /// have no client row; missing usernames fall back to the raw id so
    /// the row is still attributable.
    pub async fn list_summaries(&self) -> DbResult<Vec<SaleSummary>> {
        let summaries = sqlx::query_as::<_, SaleSummary>(
            "SELECT s.id, s.created_at, s.total_cents, \
             COALESCE(c.name, 'walk-in') AS client_name, \
             COALESCE(u.username, s.user_id) AS cashier \
             FROM sales s \
             LEFT JOIN clients c ON c.id = s.client_id \
             LEFT JOIN users u ON u.id = s.user_id \
             ORDER BY s.created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(summaries)
    }
}
