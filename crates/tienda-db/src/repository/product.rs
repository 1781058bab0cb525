//! # Product Repository
//!
//! Catalog reads, master-data writes, restocks, and the one statement
//! that matters most in this workspace: the guarded stock debit.
//!
//! ## Stock Update Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ❌ read-then-write absolute stock                                      │
//! │     SELECT stock ... ; UPDATE products SET stock = 7                    │
//! │     Two concurrent sales both read 10, both write their own result,     │
//! │     one debit is silently lost.                                         │
//! │                                                                         │
//! │  ✅ guarded relative debit (what debit_stock does)                      │
//! │     UPDATE products SET stock = stock - ?                               │
//! │     WHERE id = ? AND active = 1 AND stock >= ?                          │
//! │     The subtraction and the sufficiency check are one atomic            │
//! │     statement; zero rows affected means the guard lost the race         │
//! │     and the caller rolls its whole transaction back.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use tienda_core::Product;

const PRODUCT_COLUMNS: &str = "id, name, price_cents, stock, stock_minimum, \
     supplier_id, barcode, active, created_at, updated_at";

/// Repository for catalog products.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a new product.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, name = %product.name, "inserting product");

        sqlx::query(
            "INSERT INTO products \
             (id, name, price_cents, stock, stock_minimum, supplier_id, barcode, active, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(product.stock_minimum)
        .bind(&product.supplier_id)
        .bind(&product.barcode)
        .bind(product.active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Fetches a product by id, soft-deleted ones included.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Fetches an active product inside a caller-supplied transaction.
    ///
    /// The sale processor prices and validates against this read; doing
    /// it on the transaction connection keeps the view consistent with
    /// the debits that follow.
    pub async fn fetch_active(
        conn: &mut SqliteConnection,
        id: &str,
    ) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1 AND active = 1"
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(product)
    }

    /// Debits stock inside a caller-supplied transaction.
    ///
    /// Returns `true` when the guard held and a row was debited. `false`
    /// means the product vanished, was deactivated, or no longer has
    /// `stock >= quantity`; the caller must roll back.
    pub async fn debit_stock(
        conn: &mut SqliteConnection,
        id: &str,
        quantity: i64,
    ) -> DbResult<bool> {
        debug!(id = %id, quantity = %quantity, "debiting stock");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products \
             SET stock = stock - ?2, updated_at = ?3 \
             WHERE id = ?1 AND active = 1 AND stock >= ?2",
        )
        .bind(id)
        .bind(quantity)
        .bind(now)
        .execute(conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Adds stock to a product (restock / goods reception). Relative
    /// update, so concurrent restocks cannot clobber each other. Returns
    /// the refreshed product.
    pub async fn add_stock(&self, id: &str, quantity: i64) -> DbResult<Product> {
        debug!(id = %id, quantity = %quantity, "adding stock");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products \
             SET stock = stock + ?2, updated_at = ?3 \
             WHERE id = ?1 AND active = 1",
        )
        .bind(id)
        .bind(quantity)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("product", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("product", id))
    }

    /// Updates master data (name, price, minimum, supplier, barcode).
    /// Stock is deliberately not touched here; stock moves only through
    /// debit_stock / add_stock.
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "updating product");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products SET \
             name = ?2, price_cents = ?3, stock_minimum = ?4, \
             supplier_id = ?5, barcode = ?6, updated_at = ?7 \
             WHERE id = ?1",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(product.stock_minimum)
        .bind(&product.supplier_id)
        .bind(&product.barcode)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("product", &product.id));
        }

        Ok(())
    }

    /// Lists active products ordered by name.
    pub async fn list_active(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE active = 1 ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Active products at or below their minimum threshold.
    pub async fn find_low_stock(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE active = 1 AND stock <= stock_minimum \
             ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Soft-deletes a product. Historical sale lines keep referencing it.
    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "soft-deleting product");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products SET active = 0, updated_at = ?2 WHERE id = ?1",
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("product", id));
        }

        Ok(())
    }
}
