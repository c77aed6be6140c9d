// src/db/memory.rs
//
// In-memory Store used by the service tests. A transaction clones the whole
// state at begin and swaps it back at commit, so a transaction dropped on an
// error path leaves the shared state untouched, same as a rolled-back
// database transaction. Tests drive one transaction at a time.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::{Store, StoreTx},
    models::{
        Basket, Income, IncomeItem, IncomeProduct, NewBasketLine, NewIncome, NewSale,
        NewStorageTransaction, NewTransaction, Product, Sale, SaleStatus, Staff, StorageTransaction,
        Tarif, Transaction,
    },
};

#[derive(Clone, Default)]
struct MemState {
    branches: Vec<Uuid>,
    products: HashMap<Uuid, Product>,
    staff: HashMap<Uuid, Staff>,
    tarifs: HashMap<Uuid, Tarif>,
    sales: HashMap<Uuid, Sale>,
    baskets: HashMap<Uuid, Basket>,
    stock: HashMap<(Uuid, Uuid), i32>,
    stock_movements: Vec<StorageTransaction>,
    transactions: Vec<Transaction>,
    incomes: Vec<Income>,
    income_products: Vec<IncomeProduct>,
}

#[derive(Clone, Default)]
pub struct MemStore {
    state: Arc<Mutex<MemState>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ---
    // Seeding
    // ---

    pub fn seed_branch(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.state.lock().unwrap().branches.push(id);
        id
    }

    pub fn seed_product(&self, barcode: &str, price: Decimal) -> Uuid {
        let id = Uuid::new_v4();
        let now = Utc::now();
        self.state.lock().unwrap().products.insert(
            id,
            Product {
                id,
                name: format!("product {barcode}"),
                price,
                barcode: barcode.to_string(),
                category_id: None,
                created_at: now,
                updated_at: now,
            },
        );
        id
    }

    pub fn seed_stock(&self, product_id: Uuid, branch_id: Uuid, count: i32) {
        self.state
            .lock()
            .unwrap()
            .stock
            .insert((product_id, branch_id), count);
    }

    pub fn seed_tarif(&self, tarif_type: &str, for_cash: Decimal, for_card: Decimal) -> Uuid {
        let id = Uuid::new_v4();
        let now = Utc::now();
        self.state.lock().unwrap().tarifs.insert(
            id,
            Tarif {
                id,
                name: format!("tarif {tarif_type}"),
                tarif_type: tarif_type.to_string(),
                amount_for_cash: for_cash,
                amount_for_card: for_card,
                created_at: now,
                updated_at: now,
            },
        );
        id
    }

    pub fn seed_staff(&self, branch_id: Uuid, tarif_id: Uuid) -> Uuid {
        let id = Uuid::new_v4();
        let now = Utc::now();
        self.state.lock().unwrap().staff.insert(
            id,
            Staff {
                id,
                branch_id,
                tarif_id,
                staff_type: "cashier".to_string(),
                name: "staff".to_string(),
                balance: Decimal::ZERO,
                login: id.to_string(),
                created_at: now,
                updated_at: now,
            },
        );
        id
    }

    /// Staff row pointing at a tarif id that was never seeded. Used to force
    /// a payout-phase failure from plain data.
    pub fn seed_staff_with_dangling_tarif(&self, branch_id: Uuid) -> Uuid {
        self.seed_staff(branch_id, Uuid::new_v4())
    }

    // ---
    // Assertions
    // ---

    pub fn stock(&self, product_id: Uuid, branch_id: Uuid) -> i32 {
        *self
            .state
            .lock()
            .unwrap()
            .stock
            .get(&(product_id, branch_id))
            .unwrap_or(&0)
    }

    pub fn staff_balance(&self, staff_id: Uuid) -> Decimal {
        self.state.lock().unwrap().staff[&staff_id].balance
    }

    pub fn sale_row(&self, id: Uuid) -> Option<Sale> {
        self.state.lock().unwrap().sales.get(&id).cloned()
    }

    pub fn basket_rows(&self, sale_id: Uuid) -> Vec<Basket> {
        let mut lines: Vec<Basket> = self
            .state
            .lock()
            .unwrap()
            .baskets
            .values()
            .filter(|b| b.sale_id == sale_id)
            .cloned()
            .collect();
        lines.sort_by_key(|b| b.created_at);
        lines
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.state.lock().unwrap().transactions.clone()
    }

    pub fn stock_movements(&self) -> Vec<StorageTransaction> {
        self.state.lock().unwrap().stock_movements.clone()
    }

    pub fn incomes(&self) -> Vec<Income> {
        self.state.lock().unwrap().incomes.clone()
    }

    pub fn income_products(&self) -> Vec<IncomeProduct> {
        self.state.lock().unwrap().income_products.clone()
    }
}

#[async_trait]
impl Store for MemStore {
    async fn begin(&self) -> Result<Box<dyn StoreTx>, AppError> {
        let work = self.state.lock().unwrap().clone();
        Ok(Box::new(MemTx {
            shared: Arc::clone(&self.state),
            work,
        }))
    }

    async fn sale(&self, id: Uuid) -> Result<Option<Sale>, AppError> {
        Ok(self.state.lock().unwrap().sales.get(&id).cloned())
    }

    async fn basket_line(&self, id: Uuid) -> Result<Option<Basket>, AppError> {
        Ok(self.state.lock().unwrap().baskets.get(&id).cloned())
    }

    async fn basket_for_sale(&self, sale_id: Uuid) -> Result<Vec<Basket>, AppError> {
        Ok(self.basket_rows(sale_id))
    }
}

struct MemTx {
    shared: Arc<Mutex<MemState>>,
    work: MemState,
}

#[async_trait]
impl StoreTx for MemTx {
    async fn product_by_barcode(&mut self, barcode: &str) -> Result<Option<Product>, AppError> {
        Ok(self
            .work
            .products
            .values()
            .find(|p| p.barcode == barcode)
            .cloned())
    }

    async fn product_exists(&mut self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.work.products.contains_key(&id))
    }

    async fn branch_exists(&mut self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.work.branches.contains(&id))
    }

    async fn staff_by_id(&mut self, id: Uuid) -> Result<Option<Staff>, AppError> {
        Ok(self.work.staff.get(&id).cloned())
    }

    async fn tarif_by_id(&mut self, id: Uuid) -> Result<Option<Tarif>, AppError> {
        Ok(self.work.tarifs.get(&id).cloned())
    }

    async fn insert_sale(&mut self, sale: &NewSale) -> Result<Sale, AppError> {
        let now = Utc::now();
        let created = Sale {
            id: Uuid::new_v4(),
            branch_id: sale.branch_id,
            cashier_id: sale.cashier_id,
            shop_assistant_id: sale.shop_assistant_id,
            payment_type: sale.payment_type,
            status: SaleStatus::Open,
            price: Decimal::ZERO,
            client_name: sale.client_name.clone(),
            created_at: now,
            updated_at: now,
        };
        self.work.sales.insert(created.id, created.clone());
        Ok(created)
    }

    async fn sale_for_update(&mut self, id: Uuid) -> Result<Option<Sale>, AppError> {
        Ok(self.work.sales.get(&id).cloned())
    }

    async fn finish_sale(
        &mut self,
        id: Uuid,
        status: SaleStatus,
        price: Decimal,
    ) -> Result<Sale, AppError> {
        let sale = self.work.sales.get_mut(&id).ok_or(AppError::NotFound("sale"))?;
        sale.status = status;
        sale.price = price;
        sale.updated_at = Utc::now();
        Ok(sale.clone())
    }

    async fn basket_line_for_update(
        &mut self,
        sale_id: Uuid,
        product_id: Uuid,
    ) -> Result<Option<Basket>, AppError> {
        Ok(self
            .work
            .baskets
            .values()
            .find(|b| b.sale_id == sale_id && b.product_id == product_id)
            .cloned())
    }

    async fn insert_basket_line(&mut self, line: &NewBasketLine) -> Result<Basket, AppError> {
        let now = Utc::now();
        let created = Basket {
            id: Uuid::new_v4(),
            sale_id: line.sale_id,
            product_id: line.product_id,
            quantity: line.quantity,
            price: line.price,
            created_at: now,
            updated_at: now,
        };
        self.work.baskets.insert(created.id, created.clone());
        Ok(created)
    }

    async fn set_basket_line(
        &mut self,
        id: Uuid,
        quantity: i32,
        price: Decimal,
    ) -> Result<Basket, AppError> {
        let line = self
            .work
            .baskets
            .get_mut(&id)
            .ok_or(AppError::NotFound("basket line"))?;
        line.quantity = quantity;
        line.price = price;
        line.updated_at = Utc::now();
        Ok(line.clone())
    }

    async fn basket_for_sale(&mut self, sale_id: Uuid) -> Result<Vec<Basket>, AppError> {
        let mut lines: Vec<Basket> = self
            .work
            .baskets
            .values()
            .filter(|b| b.sale_id == sale_id)
            .cloned()
            .collect();
        lines.sort_by_key(|b| b.created_at);
        Ok(lines)
    }

    async fn stock_on_hand(&mut self, product_id: Uuid, branch_id: Uuid) -> Result<i32, AppError> {
        Ok(*self.work.stock.get(&(product_id, branch_id)).unwrap_or(&0))
    }

    async fn debit_stock(
        &mut self,
        product_id: Uuid,
        branch_id: Uuid,
        quantity: i32,
    ) -> Result<bool, AppError> {
        let count = self.work.stock.entry((product_id, branch_id)).or_insert(0);
        if *count < quantity {
            return Ok(false);
        }
        *count -= quantity;
        Ok(true)
    }

    async fn credit_stock(
        &mut self,
        product_id: Uuid,
        branch_id: Uuid,
        quantity: i32,
    ) -> Result<(), AppError> {
        *self.work.stock.entry((product_id, branch_id)).or_insert(0) += quantity;
        Ok(())
    }

    async fn record_stock_movement(
        &mut self,
        movement: &NewStorageTransaction,
    ) -> Result<StorageTransaction, AppError> {
        let created = StorageTransaction {
            id: Uuid::new_v4(),
            staff_id: movement.staff_id,
            product_id: movement.product_id,
            transaction_type: movement.transaction_type,
            price: movement.price,
            quantity: movement.quantity,
            created_at: Utc::now(),
        };
        self.work.stock_movements.push(created.clone());
        Ok(created)
    }

    async fn pay_staff(
        &mut self,
        payout: Decimal,
        record: &NewTransaction,
    ) -> Result<Transaction, AppError> {
        let staff = self
            .work
            .staff
            .get_mut(&record.staff_id)
            .ok_or(AppError::NotFound("staff"))?;
        staff.balance += payout;
        staff.updated_at = Utc::now();
        self.record_transaction(record).await
    }

    async fn record_transaction(
        &mut self,
        record: &NewTransaction,
    ) -> Result<Transaction, AppError> {
        let created = Transaction {
            id: Uuid::new_v4(),
            sale_id: record.sale_id,
            staff_id: record.staff_id,
            transaction_type: record.transaction_type,
            source_type: record.source_type,
            amount: record.amount,
            description: record.description.clone(),
            created_at: Utc::now(),
        };
        self.work.transactions.push(created.clone());
        Ok(created)
    }

    async fn insert_income(&mut self, income: &NewIncome) -> Result<Income, AppError> {
        let now = Utc::now();
        let created = Income {
            id: Uuid::new_v4(),
            branch_id: income.branch_id,
            price: income.price,
            created_at: now,
            updated_at: now,
        };
        self.work.incomes.push(created.clone());
        Ok(created)
    }

    async fn insert_income_product(
        &mut self,
        income_id: Uuid,
        item: &IncomeItem,
    ) -> Result<IncomeProduct, AppError> {
        let created = IncomeProduct {
            id: Uuid::new_v4(),
            income_id,
            product_id: item.product_id,
            price: item.price,
            count: item.count,
            created_at: Utc::now(),
        };
        self.work.income_products.push(created.clone());
        Ok(created)
    }

    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        *self.shared.lock().unwrap() = self.work;
        Ok(())
    }
}
