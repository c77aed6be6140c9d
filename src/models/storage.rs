// src/models/storage.rs
//
// Stock itself lives in the storage table as one count per (product, branch)
// and is only ever addressed through the store's debit/credit/on-hand calls,
// so the only rows modeled here are the movement history.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "storage_transaction_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StorageTransactionType {
    Minus,
    Plus,
}

/// Append-only record of one stock change: a `minus` per product debited at
/// settlement, a `plus` per product credited by an income.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StorageTransaction {
    pub id: Uuid,
    pub staff_id: Uuid,
    pub product_id: Uuid,
    pub transaction_type: StorageTransactionType,
    pub price: Decimal,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewStorageTransaction {
    pub staff_id: Uuid,
    pub product_id: Uuid,
    pub transaction_type: StorageTransactionType,
    pub price: Decimal,
    pub quantity: i32,
}
