// src/db/store.rs

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        Basket, Income, IncomeItem, IncomeProduct, NewBasketLine, NewIncome, NewSale,
        NewStorageTransaction, NewTransaction, Product, Sale, SaleStatus, Staff, StorageTransaction,
        Tarif, Transaction,
    },
};

/// Entry point into persistence. Read methods hit the shared pool directly;
/// anything that mutates goes through a [`StoreTx`] so the read-check-write
/// sequences of the checkout workflow stay inside one database transaction.
#[async_trait]
pub trait Store: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn StoreTx>, AppError>;

    // ---
    // Plain reads (no locks)
    // ---

    async fn sale(&self, id: Uuid) -> Result<Option<Sale>, AppError>;
    async fn basket_line(&self, id: Uuid) -> Result<Option<Basket>, AppError>;
    async fn basket_for_sale(&self, sale_id: Uuid) -> Result<Vec<Basket>, AppError>;
}

/// One open database transaction. Dropping it without [`StoreTx::commit`]
/// rolls every write back.
///
/// Locking discipline: callers take the sale row first, then basket lines,
/// then storage rows. Both the scan and the settlement path follow that
/// order, so two workflows touching the same sale serialize instead of
/// deadlocking.
#[async_trait]
pub trait StoreTx: Send {
    // ---
    // Lookups
    // ---

    async fn product_by_barcode(&mut self, barcode: &str) -> Result<Option<Product>, AppError>;
    async fn product_exists(&mut self, id: Uuid) -> Result<bool, AppError>;
    async fn branch_exists(&mut self, id: Uuid) -> Result<bool, AppError>;
    async fn staff_by_id(&mut self, id: Uuid) -> Result<Option<Staff>, AppError>;
    async fn tarif_by_id(&mut self, id: Uuid) -> Result<Option<Tarif>, AppError>;

    // ---
    // Sales
    // ---

    async fn insert_sale(&mut self, sale: &NewSale) -> Result<Sale, AppError>;

    /// Loads a sale and locks its row for the rest of the transaction.
    async fn sale_for_update(&mut self, id: Uuid) -> Result<Option<Sale>, AppError>;

    /// Writes the terminal status and final price in one statement.
    async fn finish_sale(
        &mut self,
        id: Uuid,
        status: SaleStatus,
        price: Decimal,
    ) -> Result<Sale, AppError>;

    // ---
    // Basket
    // ---

    /// Loads the (sale, product) line if one exists and locks it.
    async fn basket_line_for_update(
        &mut self,
        sale_id: Uuid,
        product_id: Uuid,
    ) -> Result<Option<Basket>, AppError>;

    async fn insert_basket_line(&mut self, line: &NewBasketLine) -> Result<Basket, AppError>;

    /// Overwrites quantity and cumulative price of an existing line.
    async fn set_basket_line(
        &mut self,
        id: Uuid,
        quantity: i32,
        price: Decimal,
    ) -> Result<Basket, AppError>;

    async fn basket_for_sale(&mut self, sale_id: Uuid) -> Result<Vec<Basket>, AppError>;

    // ---
    // Storage
    // ---

    /// Current stock of a product at a branch, with the row locked.
    /// A branch that has never stocked the product reads as zero.
    async fn stock_on_hand(&mut self, product_id: Uuid, branch_id: Uuid) -> Result<i32, AppError>;

    /// Decrements stock by `quantity`, guarded so the count can never go
    /// negative. Returns `false` when stock was insufficient (nothing
    /// written); the caller decides how to surface that.
    async fn debit_stock(
        &mut self,
        product_id: Uuid,
        branch_id: Uuid,
        quantity: i32,
    ) -> Result<bool, AppError>;

    /// Increments stock by `quantity`, creating the row on first delivery.
    async fn credit_stock(
        &mut self,
        product_id: Uuid,
        branch_id: Uuid,
        quantity: i32,
    ) -> Result<(), AppError>;

    async fn record_stock_movement(
        &mut self,
        movement: &NewStorageTransaction,
    ) -> Result<StorageTransaction, AppError>;

    // ---
    // Money
    // ---

    /// The only writer of staff balances in the whole crate: adds `payout`
    /// to the balance of `record.staff_id` and appends the matching audit
    /// row. The two writes cannot be requested separately.
    async fn pay_staff(
        &mut self,
        payout: Decimal,
        record: &NewTransaction,
    ) -> Result<Transaction, AppError>;

    /// Appends an audit row without touching any balance (cancellations).
    async fn record_transaction(&mut self, record: &NewTransaction)
    -> Result<Transaction, AppError>;

    // ---
    // Receiving
    // ---

    async fn insert_income(&mut self, income: &NewIncome) -> Result<Income, AppError>;

    async fn insert_income_product(
        &mut self,
        income_id: Uuid,
        item: &IncomeItem,
    ) -> Result<IncomeProduct, AppError>;

    async fn commit(self: Box<Self>) -> Result<(), AppError>;
}
