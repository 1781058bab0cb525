//! Low-stock monitoring.
//!
//! A product is "low" when its shelf count is at or below its own
//! `stock_minimum`; the threshold lives on the product, not in config,
//! so each item can carry a reorder point matched to how fast it moves.

use tracing::debug;

use crate::error::ServiceResult;
use tienda_core::StockAlerts;
use tienda_db::Database;

/// Read-only view over products that need restocking.
#[derive(Debug, Clone)]
pub struct LowStockMonitor {
    db: Database,
}

impl LowStockMonitor {
    pub fn new(db: Database) -> Self {
        LowStockMonitor { db }
    }

    /// Every active product at or below its reorder point, A-Z by name,
    /// with the count alongside for dashboard badges.
    pub async fn alerts(&self) -> ServiceResult<StockAlerts> {
        let items = self.db.products().find_low_stock().await?;
        debug!(count = items.len(), "low stock scan");
        let count = items.len();
        Ok(StockAlerts { items, count })
    }
}
