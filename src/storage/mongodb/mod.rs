//! MongoDB implementations of storage interfaces.

mod customer_store;
mod documents;
mod order_store;
mod product_store;

pub use customer_store::MongoCustomerStore;
pub use order_store::MongoOrderStore;
pub use product_store::MongoProductStore;

/// Collection names.
pub(crate) const ORDERS_COLLECTION: &str = "orders";
pub(crate) const CUSTOMERS_COLLECTION: &str = "customers";
pub(crate) const PRODUCTS_COLLECTION: &str = "products";
