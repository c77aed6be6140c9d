pub mod basket;
pub mod income;
pub mod product;
pub mod sale;
pub mod staff;
pub mod storage;
pub mod transaction;

pub use basket::{Basket, NewBasketLine};
pub use income::{Income, IncomeItem, IncomeProduct, NewIncome};
pub use product::Product;
pub use sale::{CloseStatus, NewSale, PaymentType, Sale, SaleStatus};
pub use staff::{Staff, Tarif};
pub use storage::{NewStorageTransaction, StorageTransaction, StorageTransactionType};
pub use transaction::{NewTransaction, Transaction, TransactionSource, TransactionType};
