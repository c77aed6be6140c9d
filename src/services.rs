pub mod checkout_service;
pub use checkout_service::CheckoutService;
pub mod commission;
pub mod inventory_service;
pub use inventory_service::InventoryService;
pub mod settlement_service;
pub use settlement_service::SettlementService;
