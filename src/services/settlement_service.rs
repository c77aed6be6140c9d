// src/services/settlement_service.rs

use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{Store, StoreTx},
    models::{
        CloseStatus, NewStorageTransaction, NewTransaction, Sale, SaleStatus,
        StorageTransactionType, TransactionSource, TransactionType,
    },
    services::{commission, inventory_service::InventoryService},
};

/// Drives a sale from `open` to a terminal status: freezes the basket into a
/// final price, drains inventory with one movement row per line, and pays
/// commission to everyone listed on the sale. The whole closure is one
/// database transaction, so a failure at any step (a stock race, a missing
/// tarif) leaves the sale open and every count and balance as it was.
#[derive(Clone)]
pub struct SettlementService {
    store: Arc<dyn Store>,
    inventory: InventoryService,
}

impl SettlementService {
    pub fn new(store: Arc<dyn Store>, inventory: InventoryService) -> Self {
        Self { store, inventory }
    }

    pub async fn close_sale(&self, sale_id: Uuid, requested: CloseStatus) -> Result<Sale, AppError> {
        let mut tx = self.store.begin().await?;

        // 1. Lock the sale. Terminal sales reject everything, including a
        //    second close.
        let sale = tx
            .sale_for_update(sale_id)
            .await?
            .ok_or(AppError::NotFound("sale"))?;
        if sale.status.is_terminal() {
            return Err(AppError::SaleClosed(sale.status));
        }

        // 2. Freeze the basket into a total. Line prices are already
        //    cumulative, so the total is their plain sum.
        let mut lines = tx.basket_for_sale(sale_id).await?;
        let total: Decimal = lines.iter().map(|line| line.price).sum();

        // 3. Cancellation keeps the stock, zeroes the price, and leaves one
        //    withdrawal row recording the forfeited total. No balance moves.
        if requested == CloseStatus::Cancel {
            let cancelled = tx
                .finish_sale(sale_id, SaleStatus::Cancel, Decimal::ZERO)
                .await?;
            tx.record_transaction(&NewTransaction {
                sale_id: Some(sale_id),
                staff_id: sale.cashier_id,
                transaction_type: TransactionType::Withdraw,
                source_type: TransactionSource::Sales,
                amount: total,
                description: "sale cancelled".to_string(),
            })
            .await?;
            tx.commit().await?;
            return Ok(cancelled);
        }

        // 4. Drain inventory, one audited movement per basket line. Lines
        //    are debited in product-id order, so any two settlements lock
        //    storage rows in the same sequence and cannot deadlock.
        lines.sort_by_key(|line| line.product_id);
        for line in &lines {
            self.inventory
                .debit(&mut *tx, line.product_id, sale.branch_id, line.quantity)
                .await?;
            tx.record_stock_movement(&NewStorageTransaction {
                staff_id: sale.cashier_id,
                product_id: line.product_id,
                transaction_type: StorageTransactionType::Minus,
                price: line.price,
                quantity: line.quantity,
            })
            .await?;
        }

        // 5. Flip the sale, then pay everyone listed on it against their
        //    own tarif.
        let settled = tx.finish_sale(sale_id, SaleStatus::Success, total).await?;

        self.pay_commission(&mut *tx, &settled, settled.cashier_id)
            .await?;
        if let Some(assistant_id) = settled.shop_assistant_id {
            self.pay_commission(&mut *tx, &settled, assistant_id).await?;
        }

        tx.commit().await?;
        Ok(settled)
    }

    /// Resolves one staff member's tarif, computes the payout, and applies
    /// it through the single balance-writing store call.
    async fn pay_commission(
        &self,
        tx: &mut dyn StoreTx,
        sale: &Sale,
        staff_id: Uuid,
    ) -> Result<(), AppError> {
        let staff = tx
            .staff_by_id(staff_id)
            .await?
            .ok_or(AppError::NotFound("staff"))?;
        let tarif = tx
            .tarif_by_id(staff.tarif_id)
            .await?
            .ok_or(AppError::NotFound("tarif"))?;

        let payout = commission::compute_payout(&tarif, sale.payment_type, sale.price)?;

        tx.pay_staff(
            payout,
            &NewTransaction {
                sale_id: Some(sale.id),
                staff_id,
                transaction_type: TransactionType::Topup,
                source_type: TransactionSource::Sales,
                amount: sale.price,
                description: format!("commission {payout} on sale {}", sale.id),
            },
        )
        .await?;
        Ok(())
    }
}
