//! Mock storage implementations for testing.

use std::sync::Arc;

mod catalog;
mod orders;

pub use catalog::{MockCustomerStore, MockProductStore};
pub use orders::MockOrderStore;

use super::Stores;

/// Handles to one set of mock stores, kept so tests can seed and
/// inject failures after the [`Stores`] bundle is handed out.
#[derive(Default, Clone)]
pub struct MockStores {
    pub orders: Arc<MockOrderStore>,
    pub customers: Arc<MockCustomerStore>,
    pub products: Arc<MockProductStore>,
}

impl MockStores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bundle the mocks behind the storage traits.
    pub fn stores(&self) -> Stores {
        Stores::new(
            self.orders.clone(),
            self.customers.clone(),
            self.products.clone(),
        )
    }
}
