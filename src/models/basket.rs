// src/models/basket.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One line of an in-progress sale. Unique per (sale_id, product_id): a
/// repeat scan of the same product grows this line instead of adding a new
/// one. `price` is the cumulative line price, not the unit price.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Basket {
    pub id: Uuid,
    pub sale_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewBasketLine {
    pub sale_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub price: Decimal,
}
