// src/services/checkout_service.rs

use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::Store,
    models::{Basket, NewBasketLine, NewSale, Sale},
    services::inventory_service::InventoryService,
};

/// Opens sales and grows their baskets one scan at a time. A basket holds at
/// most one line per product; repeat scans merge into the existing line.
#[derive(Clone)]
pub struct CheckoutService {
    store: Arc<dyn Store>,
    inventory: InventoryService,
}

impl CheckoutService {
    pub fn new(store: Arc<dyn Store>, inventory: InventoryService) -> Self {
        Self { store, inventory }
    }

    pub async fn open_sale(&self, new_sale: NewSale) -> Result<Sale, AppError> {
        let mut tx = self.store.begin().await?;

        if !tx.branch_exists(new_sale.branch_id).await? {
            return Err(AppError::NotFound("branch"));
        }
        tx.staff_by_id(new_sale.cashier_id)
            .await?
            .ok_or(AppError::NotFound("cashier"))?;
        if let Some(assistant_id) = new_sale.shop_assistant_id {
            tx.staff_by_id(assistant_id)
                .await?
                .ok_or(AppError::NotFound("shop assistant"))?;
        }

        let sale = tx.insert_sale(&new_sale).await?;
        tx.commit().await?;
        Ok(sale)
    }

    /// Adds `count` units of the product behind `barcode` to the sale's
    /// basket. Either the whole merge lands or the basket is untouched.
    pub async fn add_scan(
        &self,
        sale_id: Uuid,
        barcode: &str,
        count: i32,
    ) -> Result<Basket, AppError> {
        if count <= 0 {
            return Err(AppError::InvalidArgument(
                "count must be a positive integer".to_string(),
            ));
        }

        let mut tx = self.store.begin().await?;

        // 1. Resolve the scan code.
        let product = tx
            .product_by_barcode(barcode)
            .await?
            .ok_or(AppError::NotFound("product"))?;

        // 2. The owning sale must exist and still be open. Locking it keeps
        //    a concurrent settlement from finishing the sale mid-scan.
        let sale = tx
            .sale_for_update(sale_id)
            .await?
            .ok_or(AppError::NotFound("sale"))?;
        if sale.status.is_terminal() {
            return Err(AppError::SaleClosed(sale.status));
        }

        // 3. The candidate quantity is what the whole line would hold after
        //    this scan, so the stock check covers earlier scans too.
        let existing = tx.basket_line_for_update(sale_id, product.id).await?;
        let candidate = existing
            .as_ref()
            .map_or(0, |line| line.quantity)
            .checked_add(count)
            .ok_or_else(|| AppError::InvalidArgument("line quantity is too large".to_string()))?;

        if !self
            .inventory
            .check_availability(&mut *tx, product.id, sale.branch_id, candidate)
            .await?
        {
            return Err(AppError::InsufficientStock {
                product_id: product.id,
                requested: candidate,
            });
        }

        // 4. Merge into the existing line or start a new one. Line price is
        //    cumulative: the unit price at each scan times that scan's count.
        let added_price = product.price * Decimal::from(count);
        let line = match existing {
            Some(line) => {
                tx.set_basket_line(line.id, candidate, line.price + added_price)
                    .await?
            }
            None => {
                tx.insert_basket_line(&NewBasketLine {
                    sale_id,
                    product_id: product.id,
                    quantity: count,
                    price: added_price,
                })
                .await?
            }
        };

        tx.commit().await?;
        Ok(line)
    }

    // --- READS ---

    pub async fn sale(&self, id: Uuid) -> Result<Sale, AppError> {
        self.store.sale(id).await?.ok_or(AppError::NotFound("sale"))
    }

    pub async fn basket_line(&self, id: Uuid) -> Result<Basket, AppError> {
        self.store
            .basket_line(id)
            .await?
            .ok_or(AppError::NotFound("basket line"))
    }

    pub async fn sale_basket(&self, sale_id: Uuid) -> Result<Vec<Basket>, AppError> {
        self.store
            .sale(sale_id)
            .await?
            .ok_or(AppError::NotFound("sale"))?;
        self.store.basket_for_sale(sale_id).await
    }
}
