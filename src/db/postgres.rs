// src/db/postgres.rs

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres};
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

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn begin(&self) -> Result<Box<dyn StoreTx>, AppError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgStoreTx { tx }))
    }

    async fn sale(&self, id: Uuid) -> Result<Option<Sale>, AppError> {
        let sale = sqlx::query_as::<_, Sale>("SELECT * FROM sale WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(sale)
    }

    async fn basket_line(&self, id: Uuid) -> Result<Option<Basket>, AppError> {
        let line = sqlx::query_as::<_, Basket>("SELECT * FROM basket WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(line)
    }

    async fn basket_for_sale(&self, sale_id: Uuid) -> Result<Vec<Basket>, AppError> {
        let lines = sqlx::query_as::<_, Basket>(
            "SELECT * FROM basket WHERE sale_id = $1 ORDER BY created_at ASC",
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(lines)
    }
}

pub struct PgStoreTx {
    tx: sqlx::Transaction<'static, Postgres>,
}

#[async_trait]
impl StoreTx for PgStoreTx {
    // ---
    // Lookups
    // ---

    async fn product_by_barcode(&mut self, barcode: &str) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM product WHERE barcode = $1")
            .bind(barcode)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(product)
    }

    async fn product_exists(&mut self, id: Uuid) -> Result<bool, AppError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM product WHERE id = $1)")
                .bind(id)
                .fetch_one(&mut *self.tx)
                .await?;
        Ok(exists)
    }

    async fn branch_exists(&mut self, id: Uuid) -> Result<bool, AppError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM branch WHERE id = $1)")
                .bind(id)
                .fetch_one(&mut *self.tx)
                .await?;
        Ok(exists)
    }

    async fn staff_by_id(&mut self, id: Uuid) -> Result<Option<Staff>, AppError> {
        let staff = sqlx::query_as::<_, Staff>("SELECT * FROM staff WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(staff)
    }

    async fn tarif_by_id(&mut self, id: Uuid) -> Result<Option<Tarif>, AppError> {
        let tarif = sqlx::query_as::<_, Tarif>("SELECT * FROM tarif WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(tarif)
    }

    // ---
    // Sales
    // ---

    async fn insert_sale(&mut self, sale: &NewSale) -> Result<Sale, AppError> {
        let created = sqlx::query_as::<_, Sale>(
            r#"
            INSERT INTO sale (id, branch_id, cashier_id, shop_assistant_id, payment_type, client_name)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(sale.branch_id)
        .bind(sale.cashier_id)
        .bind(sale.shop_assistant_id)
        .bind(sale.payment_type)
        .bind(&sale.client_name)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(created)
    }

    async fn sale_for_update(&mut self, id: Uuid) -> Result<Option<Sale>, AppError> {
        let sale = sqlx::query_as::<_, Sale>("SELECT * FROM sale WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(sale)
    }

    async fn finish_sale(
        &mut self,
        id: Uuid,
        status: SaleStatus,
        price: Decimal,
    ) -> Result<Sale, AppError> {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            UPDATE sale
            SET status = $2, price = $3, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(price)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(sale)
    }

    // ---
    // Basket
    // ---

    async fn basket_line_for_update(
        &mut self,
        sale_id: Uuid,
        product_id: Uuid,
    ) -> Result<Option<Basket>, AppError> {
        let line = sqlx::query_as::<_, Basket>(
            "SELECT * FROM basket WHERE sale_id = $1 AND product_id = $2 FOR UPDATE",
        )
        .bind(sale_id)
        .bind(product_id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(line)
    }

    async fn insert_basket_line(&mut self, line: &NewBasketLine) -> Result<Basket, AppError> {
        let created = sqlx::query_as::<_, Basket>(
            r#"
            INSERT INTO basket (id, sale_id, product_id, quantity, price)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(line.sale_id)
        .bind(line.product_id)
        .bind(line.quantity)
        .bind(line.price)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(created)
    }

    async fn set_basket_line(
        &mut self,
        id: Uuid,
        quantity: i32,
        price: Decimal,
    ) -> Result<Basket, AppError> {
        let updated = sqlx::query_as::<_, Basket>(
            r#"
            UPDATE basket
            SET quantity = $2, price = $3, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(quantity)
        .bind(price)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(updated)
    }

    async fn basket_for_sale(&mut self, sale_id: Uuid) -> Result<Vec<Basket>, AppError> {
        let lines = sqlx::query_as::<_, Basket>(
            "SELECT * FROM basket WHERE sale_id = $1 ORDER BY created_at ASC",
        )
        .bind(sale_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(lines)
    }

    // ---
    // Storage
    // ---

    async fn stock_on_hand(&mut self, product_id: Uuid, branch_id: Uuid) -> Result<i32, AppError> {
        let count = sqlx::query_scalar::<_, i32>(
            "SELECT count FROM storage WHERE product_id = $1 AND branch_id = $2 FOR UPDATE",
        )
        .bind(product_id)
        .bind(branch_id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(count.unwrap_or(0))
    }

    async fn debit_stock(
        &mut self,
        product_id: Uuid,
        branch_id: Uuid,
        quantity: i32,
    ) -> Result<bool, AppError> {
        // The count >= quantity guard makes over-draining impossible even if
        // the caller skipped its own availability check.
        let result = sqlx::query(
            r#"
            UPDATE storage
            SET count = count - $3, updated_at = now()
            WHERE product_id = $1 AND branch_id = $2 AND count >= $3
            "#,
        )
        .bind(product_id)
        .bind(branch_id)
        .bind(quantity)
        .execute(&mut *self.tx)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn credit_stock(
        &mut self,
        product_id: Uuid,
        branch_id: Uuid,
        quantity: i32,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO storage (id, product_id, branch_id, count)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (product_id, branch_id)
            DO UPDATE SET count = storage.count + $4, updated_at = now()
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(product_id)
        .bind(branch_id)
        .bind(quantity)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn record_stock_movement(
        &mut self,
        movement: &NewStorageTransaction,
    ) -> Result<StorageTransaction, AppError> {
        let created = sqlx::query_as::<_, StorageTransaction>(
            r#"
            INSERT INTO storage_transaction (id, staff_id, product_id, transaction_type, price, quantity)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(movement.staff_id)
        .bind(movement.product_id)
        .bind(movement.transaction_type)
        .bind(movement.price)
        .bind(movement.quantity)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(created)
    }

    // ---
    // Money
    // ---

    async fn pay_staff(
        &mut self,
        payout: Decimal,
        record: &NewTransaction,
    ) -> Result<Transaction, AppError> {
        let updated = sqlx::query(
            "UPDATE staff SET balance = balance + $2, updated_at = now() WHERE id = $1",
        )
        .bind(record.staff_id)
        .bind(payout)
        .execute(&mut *self.tx)
        .await?;
        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound("staff"));
        }
        self.record_transaction(record).await
    }

    async fn record_transaction(
        &mut self,
        record: &NewTransaction,
    ) -> Result<Transaction, AppError> {
        let created = sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transaction (id, sale_id, staff_id, transaction_type, source_type, amount, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(record.sale_id)
        .bind(record.staff_id)
        .bind(record.transaction_type)
        .bind(record.source_type)
        .bind(record.amount)
        .bind(&record.description)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(created)
    }

    // ---
    // Receiving
    // ---

    async fn insert_income(&mut self, income: &NewIncome) -> Result<Income, AppError> {
        let created = sqlx::query_as::<_, Income>(
            r#"
            INSERT INTO income (id, branch_id, price)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(income.branch_id)
        .bind(income.price)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(created)
    }

    async fn insert_income_product(
        &mut self,
        income_id: Uuid,
        item: &IncomeItem,
    ) -> Result<IncomeProduct, AppError> {
        let created = sqlx::query_as::<_, IncomeProduct>(
            r#"
            INSERT INTO income_product (id, income_id, product_id, price, count)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(income_id)
        .bind(item.product_id)
        .bind(item.price)
        .bind(item.count)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(created)
    }

    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        self.tx.commit().await?;
        Ok(())
    }
}
