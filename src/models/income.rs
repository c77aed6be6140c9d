// src/models/income.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A goods-receiving document: the inbound counterpart of a sale. Receiving
/// an income credits storage and appends `plus` movement rows atomically.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Income {
    pub id: Uuid,
    pub branch_id: Uuid,
    /// Total received value: Σ item price × count.
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewIncome {
    pub branch_id: Uuid,
    pub price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct IncomeProduct {
    pub id: Uuid,
    pub income_id: Uuid,
    pub product_id: Uuid,
    /// Unit purchase price at receiving time.
    pub price: Decimal,
    pub count: i32,
    pub created_at: DateTime<Utc>,
}

/// One received position as the inventory service consumes it.
#[derive(Debug, Clone)]
pub struct IncomeItem {
    pub product_id: Uuid,
    pub count: i32,
    pub price: Decimal,
}
