//! # Sale Processor
//!
//! The all-or-nothing core of the system.
//!
//! ## One sale, one transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN                                                                  │
//! │    1. resolve the caller's open till          (state error if none)     │
//! │    2. fetch + price every line, input order   (stock checked here)      │
//! │    3. total = Σ subtotals                                               │
//! │    4. settle payment                          (pure, tienda-core)       │
//! │    5. guarded stock debits, ascending product id                        │
//! │    6. insert sale header + lines                                        │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Any failure before COMMIT drops the transaction and rolls every        │
//! │  debit back: a rejected sale leaves stock exactly as it found it.       │
//! │                                                                         │
//! │  Two sales racing for the same product cannot both debit past zero:     │
//! │  the guard (stock >= quantity) is atomic with the subtraction, and      │
//! │  a failed guard aborts the whole transaction. Debiting in ascending     │
//! │  product-id order keeps multi-line sales from deadlocking each other.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Unit prices are captured into the sale lines at step 2; later catalog
//! price changes never rewrite recorded sales.

use chrono::Utc;
use tracing::{debug, info};

use crate::error::{ServiceError, ServiceResult};
use tienda_core::validation::{validate_amount_cents, validate_id, validate_line_requests};
use tienda_core::{
    settle, CoreError, Money, Sale, SaleDetail, SaleLine, SaleLineDetail, SaleRequest,
    SaleSummary,
};
use tienda_db::repository::product::ProductRepository;
use tienda_db::repository::sale::SaleRepository;
use tienda_db::repository::till::TillRepository;
use tienda_db::{new_id, Database, DbError};

/// A line that has been validated and priced, ready to debit and persist.
struct PricedLine {
    product_id: String,
    product_name: String,
    quantity: i64,
    unit_price_cents: i64,
    subtotal_cents: i64,
}

/// Records sales: validates, prices, settles, debits and persists as one
/// atomic unit.
#[derive(Debug, Clone)]
pub struct SaleProcessor {
    db: Database,
}

impl SaleProcessor {
    pub fn new(db: Database) -> Self {
        SaleProcessor { db }
    }

    /// Processes one sale end to end. Returns the persisted sale with
    /// its resolved lines.
    pub async fn sell(&self, request: SaleRequest) -> ServiceResult<SaleDetail> {
        validate_id("user_id", &request.user_id)?;
        validate_line_requests(&request.items)?;
        validate_amount_cents("tendered_amount", request.tendered_cents)?;

        let mut tx = self.db.begin().await?;

        // 1. An open till owned by the caller is a precondition for
        //    recording anything.
        let till = TillRepository::find_open_for_user_tx(&mut tx, &request.user_id)
            .await?
            .ok_or_else(|| {
                ServiceError::from(CoreError::NoOpenTill {
                    user_id: request.user_id.clone(),
                })
            })?;

        // 2. Fetch and price every line, in input order, before touching
        //    any stock. Prices are frozen into the lines right here.
        let mut priced: Vec<PricedLine> = Vec::with_capacity(request.items.len());
        for item in &request.items {
            let product = ProductRepository::fetch_active(&mut tx, &item.product_id)
                .await?
                .ok_or_else(|| {
                    ServiceError::from(CoreError::ProductNotFound(item.product_id.clone()))
                })?;

            if !product.can_sell(item.quantity) {
                return Err(CoreError::InsufficientStock {
                    name: product.name,
                    available: product.stock,
                    requested: item.quantity,
                }
                .into());
            }

            let subtotal = product.price().multiply_quantity(item.quantity);
            priced.push(PricedLine {
                product_id: product.id,
                product_name: product.name,
                quantity: item.quantity,
                unit_price_cents: product.price_cents,
                subtotal_cents: subtotal.cents(),
            });
        }

        // 3. Total is the sum of the frozen subtotals.
        let total = Money::from_cents(priced.iter().map(|l| l.subtotal_cents).sum());

        // 4. Settle the payment before any mutation.
        let settlement = settle(
            request.payment_method,
            total,
            Money::from_cents(request.tendered_cents),
            request.reference.clone(),
        )?;

        // 5. Debit stock in ascending product-id order (canonical order,
        //    so concurrent multi-line sales don't deadlock). A failed
        //    guard means a concurrent sale got there first; the whole
        //    transaction rolls back on return.
        let mut debit_order: Vec<&PricedLine> = priced.iter().collect();
        debit_order.sort_by(|a, b| a.product_id.cmp(&b.product_id));

        for line in debit_order {
            let debited =
                ProductRepository::debit_stock(&mut tx, &line.product_id, line.quantity).await?;
            if !debited {
                debug!(product_id = %line.product_id, "stock guard failed, rolling back");
                let fresh = ProductRepository::fetch_active(&mut tx, &line.product_id).await?;
                let (name, available) = match fresh {
                    Some(p) => (p.name, p.stock),
                    // Deactivated or deleted mid-sale.
                    None => (line.product_name.clone(), 0),
                };
                return Err(CoreError::InsufficientStock {
                    name,
                    available,
                    requested: line.quantity,
                }
                .into());
            }
        }

        // 6. Persist header and lines on the same transaction.
        let sale = Sale {
            id: new_id(),
            till_id: till.id.clone(),
            user_id: request.user_id.clone(),
            client_id: request.client_id.clone(),
            total_cents: total.cents(),
            payment_method: request.payment_method,
            tendered_cents: settlement.tendered.cents(),
            change_cents: settlement.change.cents(),
            reference: settlement.reference,
            created_at: Utc::now(),
        };

        SaleRepository::insert_sale(&mut tx, &sale).await?;

        let mut lines = Vec::with_capacity(priced.len());
        for line in &priced {
            let sale_line = SaleLine {
                id: new_id(),
                sale_id: sale.id.clone(),
                product_id: line.product_id.clone(),
                quantity: line.quantity,
                unit_price_cents: line.unit_price_cents,
                subtotal_cents: line.subtotal_cents,
            };
            SaleRepository::insert_line(&mut tx, &sale_line).await?;

            lines.push(SaleLineDetail {
                id: sale_line.id,
                sale_id: sale_line.sale_id,
                product_id: sale_line.product_id,
                product_name: line.product_name.clone(),
                quantity: sale_line.quantity,
                unit_price_cents: sale_line.unit_price_cents,
                subtotal_cents: sale_line.subtotal_cents,
            });
        }

        tx.commit().await.map_err(DbError::from)?;

        info!(
            sale_id = %sale.id,
            till_id = %sale.till_id,
            total = %sale.total(),
            lines = lines.len(),
            method = ?sale.payment_method,
            "sale recorded"
        );

        Ok(SaleDetail { sale, lines })
    }

    /// Sales history projection, most recent first.
    pub async fn list_sales(&self) -> ServiceResult<Vec<SaleSummary>> {
        Ok(self.db.sales().list_summaries().await?)
    }

    /// One sale with its resolved lines, or None if the id is unknown.
    pub async fn get_sale(&self, id: &str) -> ServiceResult<Option<SaleDetail>> {
        let Some(sale) = self.db.sales().get_by_id(id).await? else {
            return Ok(None);
        };
        let lines = self.db.sales().get_lines(id).await?;
        Ok(Some(SaleDetail { sale, lines }))
    }
}
