//! Abstract interfaces for the document store.
//!
//! One read-only repository trait per collection:
//! - Orders (binary customer key, dual-format product lists)
//! - Customers (string primary key)
//! - Products (binary primary key)

pub mod customer_store;
pub mod order_store;
pub mod product_store;

pub use customer_store::CustomerStore;
pub use order_store::{OrderStore, Result, StorageError};
pub use product_store::ProductStore;
