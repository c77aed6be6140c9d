// src/models/sale.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

// --- Enums (mapping the Postgres types) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    Cash,
    Card,
}

/// A sale starts `open` and ends in exactly one of the terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "sale_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    Open,
    Success,
    Cancel,
}

impl SaleStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, SaleStatus::Success | SaleStatus::Cancel)
    }
}

impl fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SaleStatus::Open => "open",
            SaleStatus::Success => "success",
            SaleStatus::Cancel => "cancel",
        };
        f.write_str(s)
    }
}

/// The status a client may request when ending a sale. `open` is not a valid
/// target, which is why this is a separate type from [`SaleStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloseStatus {
    Success,
    Cancel,
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Sale {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub cashier_id: Uuid,
    pub shop_assistant_id: Option<Uuid>,
    pub payment_type: PaymentType,
    pub status: SaleStatus,
    /// Total, frozen at settlement; 0 while the sale is open or cancelled.
    pub price: Decimal,
    pub client_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSale {
    pub branch_id: Uuid,
    pub cashier_id: Uuid,
    pub shop_assistant_id: Option<Uuid>,
    pub payment_type: PaymentType,
    pub client_name: String,
}
