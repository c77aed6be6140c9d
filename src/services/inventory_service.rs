// src/services/inventory_service.rs

use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{Store, StoreTx},
    models::{Income, IncomeItem, NewIncome, NewStorageTransaction, StorageTransactionType},
};

/// The inventory ledger: per-branch, per-product stock counts, debited at
/// settlement and credited when goods arrive. The stock-touching methods take
/// the caller's open transaction so a debit can never outlive the workflow
/// that requested it.
#[derive(Clone)]
pub struct InventoryService {
    store: Arc<dyn Store>,
}

impl InventoryService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// True iff the branch currently holds at least `requested` units.
    /// Locks the storage row, so the answer stays valid for the rest of the
    /// caller's transaction.
    pub async fn check_availability(
        &self,
        tx: &mut dyn StoreTx,
        product_id: Uuid,
        branch_id: Uuid,
        requested: i32,
    ) -> Result<bool, AppError> {
        let on_hand = tx.stock_on_hand(product_id, branch_id).await?;
        Ok(on_hand >= requested)
    }

    /// Removes `quantity` units, or fails with `InsufficientStock` leaving
    /// the count untouched. The write itself re-checks the guard, so a
    /// caller that skipped [`Self::check_availability`] still cannot drive
    /// the count negative.
    pub async fn debit(
        &self,
        tx: &mut dyn StoreTx,
        product_id: Uuid,
        branch_id: Uuid,
        quantity: i32,
    ) -> Result<(), AppError> {
        if tx.debit_stock(product_id, branch_id, quantity).await? {
            Ok(())
        } else {
            Err(AppError::InsufficientStock {
                product_id,
                requested: quantity,
            })
        }
    }

    pub async fn credit(
        &self,
        tx: &mut dyn StoreTx,
        product_id: Uuid,
        branch_id: Uuid,
        quantity: i32,
    ) -> Result<(), AppError> {
        tx.credit_stock(product_id, branch_id, quantity).await
    }

    // --- RECEIVING ---

    /// Books a goods-receiving document: one income row, one income_product
    /// row per item, a stock credit per item, and a `plus` movement row per
    /// item, all in one transaction. Item prices are per-unit; the document
    /// total is the sum over items.
    pub async fn receive_income(
        &self,
        branch_id: Uuid,
        staff_id: Uuid,
        items: &[IncomeItem],
    ) -> Result<Income, AppError> {
        if items.is_empty() {
            return Err(AppError::InvalidArgument(
                "income must contain at least one item".to_string(),
            ));
        }
        for item in items {
            if item.count <= 0 {
                return Err(AppError::InvalidArgument(
                    "item count must be a positive integer".to_string(),
                ));
            }
        }

        let mut tx = self.store.begin().await?;

        if !tx.branch_exists(branch_id).await? {
            return Err(AppError::NotFound("branch"));
        }
        tx.staff_by_id(staff_id)
            .await?
            .ok_or(AppError::NotFound("staff"))?;

        let total: Decimal = items
            .iter()
            .map(|item| item.price * Decimal::from(item.count))
            .sum();

        let income = tx
            .insert_income(&NewIncome {
                branch_id,
                price: total,
            })
            .await?;

        // Credit in product-id order, so concurrent receivings (and
        // settlements) lock storage rows in the same sequence and cannot
        // deadlock.
        let mut items_in_lock_order: Vec<&IncomeItem> = items.iter().collect();
        items_in_lock_order.sort_by_key(|item| item.product_id);

        for item in items_in_lock_order {
            if !tx.product_exists(item.product_id).await? {
                return Err(AppError::NotFound("product"));
            }
            tx.insert_income_product(income.id, item).await?;
            self.credit(&mut *tx, item.product_id, branch_id, item.count)
                .await?;
            tx.record_stock_movement(&NewStorageTransaction {
                staff_id,
                product_id: item.product_id,
                transaction_type: StorageTransactionType::Plus,
                price: item.price,
                quantity: item.count,
            })
            .await?;
        }

        tx.commit().await?;
        Ok(income)
    }
}
