// src/models/transaction.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transaction_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Topup,
    Withdraw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transaction_source", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionSource {
    Sales,
}

// --- Structs ---

/// Append-only financial ledger row. Every staff balance change is paired
/// with exactly one of these in the same database transaction; cancellations
/// write a `withdraw` row without touching any balance.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Transaction {
    pub id: Uuid,
    pub sale_id: Option<Uuid>,
    pub staff_id: Uuid,
    pub transaction_type: TransactionType,
    pub source_type: TransactionSource,
    pub amount: Decimal,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub sale_id: Option<Uuid>,
    pub staff_id: Uuid,
    pub transaction_type: TransactionType,
    pub source_type: TransactionSource,
    pub amount: Decimal,
    pub description: String,
}
