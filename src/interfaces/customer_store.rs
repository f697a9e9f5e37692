//! Customer storage interface.

use async_trait::async_trait;

use super::order_store::Result;
use crate::model::Customer;

/// Read access to the `customers` collection.
///
/// Customer ids are plain strings; no binary encoding is involved.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// Look up a customer by primary key. Returns `None` if absent.
    async fn get(&self, id: &str) -> Result<Option<Customer>>;
}
