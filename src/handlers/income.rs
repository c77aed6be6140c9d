// src/handlers/income.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{common::error::AppError, config::AppState, models::IncomeItem};

// ---
// Custom validation
// ---
fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("price must not be negative".into());
        return Err(err);
    }
    Ok(())
}

// ---
// Payload: receive goods
// ---
// The `length` rule on `items` serializes the offending list into its error
// params, so the item payload must be `Serialize`.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct IncomeItemPayload {
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "count must be at least 1"))]
    pub count: i32,
    #[validate(custom(function = "validate_not_negative"))]
    pub price: Decimal,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReceiveIncomePayload {
    pub branch_id: Uuid,
    /// Who booked the delivery; referenced by the `plus` movement rows.
    pub staff_id: Uuid,
    #[validate(
        length(min = 1, message = "income must contain at least one item"),
        nested
    )]
    pub items: Vec<IncomeItemPayload>,
}

/// POST /income
pub async fn receive_income(
    State(app_state): State<AppState>,
    Json(payload): Json<ReceiveIncomePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let items: Vec<IncomeItem> = payload
        .items
        .iter()
        .map(|item| IncomeItem {
            product_id: item.product_id,
            count: item.count,
            price: item.price,
        })
        .collect();

    let income = app_state
        .inventory_service
        .receive_income(payload.branch_id, payload.staff_id, &items)
        .await?;

    Ok((StatusCode::CREATED, Json(income)))
}
