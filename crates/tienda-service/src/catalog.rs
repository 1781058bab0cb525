//! Catalog operations the register needs between sales: listing what is
//! sellable and receiving goods. Full master-data management (suppliers,
//! pricing workflows) belongs to a back-office system, not here.

use tracing::info;

use crate::error::ServiceResult;
use tienda_core::validation::{validate_id, validate_quantity};
use tienda_core::Product;
use tienda_db::Database;

#[derive(Debug, Clone)]
pub struct CatalogService {
    db: Database,
}

impl CatalogService {
    pub fn new(db: Database) -> Self {
        CatalogService { db }
    }

    /// Active products, A-Z by name.
    pub async fn list_products(&self) -> ServiceResult<Vec<Product>> {
        Ok(self.db.products().list_active().await?)
    }

    /// One product by id, soft-deleted ones included; history screens
    /// need to resolve discontinued items too.
    pub async fn get_product(&self, id: &str) -> ServiceResult<Option<Product>> {
        validate_id("product_id", id)?;
        Ok(self.db.products().get_by_id(id).await?)
    }

    /// Receives goods: adds the delivered quantity to the shelf count
    /// and returns the refreshed product.
    pub async fn restock(&self, product_id: &str, quantity: i64) -> ServiceResult<Product> {
        validate_id("product_id", product_id)?;
        validate_quantity(quantity)?;

        let product = self.db.products().add_stock(product_id, quantity).await?;

        info!(
            product_id = %product.id,
            quantity = %quantity,
            stock = %product.stock,
            "stock received"
        );

        Ok(product)
    }
}
