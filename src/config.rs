// src/config.rs

use std::sync::Arc;
use std::{env, time::Duration};

use anyhow::Context;
use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{
    db::{PgStore, Store},
    services::{CheckoutService, InventoryService, SettlementService},
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub checkout_service: CheckoutService,
    pub settlement_service: SettlementService,
    pub inventory_service: InventoryService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await
            .context("failed to connect to the database")?;

        tracing::info!("database connection established");

        let store: Arc<dyn Store> = Arc::new(PgStore::new(db_pool.clone()));
        Ok(Self::with_store(db_pool, store))
    }

    // --- Dependency graph ---
    // Every service shares the one store; the inventory ledger is handed to
    // both workflows that touch stock.
    fn with_store(db_pool: PgPool, store: Arc<dyn Store>) -> Self {
        let inventory_service = InventoryService::new(Arc::clone(&store));
        let checkout_service =
            CheckoutService::new(Arc::clone(&store), inventory_service.clone());
        let settlement_service = SettlementService::new(store, inventory_service.clone());

        Self {
            db_pool,
            checkout_service,
            settlement_service,
            inventory_service,
        }
    }
}
