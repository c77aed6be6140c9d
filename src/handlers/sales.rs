// src/handlers/sales.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::{CloseStatus, NewSale, PaymentType},
};

// ---
// Payload: open a sale
// ---
#[derive(Debug, Deserialize, Validate)]
pub struct OpenSalePayload {
    pub branch_id: Uuid,
    pub cashier_id: Uuid,
    pub shop_assistant_id: Option<Uuid>,
    pub payment_type: PaymentType,
    #[validate(length(max = 255, message = "client_name is too long"))]
    #[serde(default)]
    pub client_name: String,
}

/// POST /sell
pub async fn open_sale(
    State(app_state): State<AppState>,
    Json(payload): Json<OpenSalePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let sale = app_state
        .checkout_service
        .open_sale(NewSale {
            branch_id: payload.branch_id,
            cashier_id: payload.cashier_id,
            shop_assistant_id: payload.shop_assistant_id,
            payment_type: payload.payment_type,
            client_name: payload.client_name,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(sale)))
}

// ---
// Payload: scan a product into a basket
// ---
#[derive(Debug, Deserialize, Validate)]
pub struct AddScanPayload {
    pub sale_id: Uuid,
    #[validate(length(min = 1, message = "barcode must not be empty"))]
    pub barcode: String,
    #[validate(range(min = 1, message = "count must be at least 1"))]
    pub count: i32,
}

/// POST /barcode
pub async fn add_scan(
    State(app_state): State<AppState>,
    Json(payload): Json<AddScanPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let line = app_state
        .checkout_service
        .add_scan(payload.sale_id, &payload.barcode, payload.count)
        .await?;

    Ok((StatusCode::OK, Json(line)))
}

// ---
// Payload: close a sale
// ---
// `status` only admits the two terminal states; "open" fails at parse time.
#[derive(Debug, Deserialize)]
pub struct CloseSalePayload {
    pub status: CloseStatus,
}

/// PUT /end_sell/{sale_id}
pub async fn close_sale(
    State(app_state): State<AppState>,
    Path(sale_id): Path<Uuid>,
    Json(payload): Json<CloseSalePayload>,
) -> Result<impl IntoResponse, AppError> {
    let sale = app_state
        .settlement_service
        .close_sale(sale_id, payload.status)
        .await?;

    Ok((StatusCode::OK, Json(sale)))
}

// ---
// Reads
// ---

/// GET /sale/{id}
pub async fn get_sale(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let sale = app_state.checkout_service.sale(id).await?;
    Ok((StatusCode::OK, Json(sale)))
}

/// GET /sale/{id}/basket
pub async fn get_sale_basket(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let lines = app_state.checkout_service.sale_basket(id).await?;
    Ok((StatusCode::OK, Json(lines)))
}

/// GET /basket/{id}
pub async fn get_basket_line(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let line = app_state.checkout_service.basket_line(id).await?;
    Ok((StatusCode::OK, Json(line)))
}
