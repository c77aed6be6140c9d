//src/main.rs

use axum::{
    Router,
    routing::{get, post, put},
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod common;
mod config;
mod db;
mod handlers;
mod models;
mod services;

use crate::config::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // If configuration fails the application must not start.
    let app_state = AppState::new()
        .await
        .expect("failed to initialize application state");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("failed to run database migrations");

    tracing::info!("database migrations applied");

    let app = Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/sell", post(handlers::sales::open_sale))
        .route("/barcode", post(handlers::sales::add_scan))
        .route("/end_sell/{sale_id}", put(handlers::sales::close_sale))
        .route("/sale/{id}", get(handlers::sales::get_sale))
        .route("/sale/{id}/basket", get(handlers::sales::get_sale_basket))
        .route("/basket/{id}", get(handlers::sales::get_basket_line))
        .route("/income", post(handlers::income::receive_income))
        .with_state(app_state);

    let addr = "0.0.0.0:8080";
    let listener = TcpListener::bind(addr)
        .await
        .expect("failed to bind TCP listener");
    tracing::info!("server listening on {}", addr);
    axum::serve(listener, app).await.expect("server error");
}
