// src/models/staff.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Staff {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub tarif_id: Uuid,
    pub staff_type: String,
    pub name: String,
    /// Adjusted only through the bundled payout write (`StoreTx::pay_staff`).
    pub balance: Decimal,
    pub login: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Compensation policy for one staff member. `tarif_type` is deliberately a
/// plain string ("fixed" or "percentage"): the commission engine must reject
/// an unrecognized value as InvalidTarif instead of failing row decoding.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tarif {
    pub id: Uuid,
    pub name: String,
    pub tarif_type: String,
    pub amount_for_cash: Decimal,
    pub amount_for_card: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tarif {
    pub const TYPE_FIXED: &'static str = "fixed";
    pub const TYPE_PERCENTAGE: &'static str = "percentage";
}
