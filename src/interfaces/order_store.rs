//! Order storage interface.

use std::time::Duration;

use async_trait::async_trait;
use mongodb::bson::Binary;

use crate::model::{DateWindow, OrderRecord, OrderStatus};

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Connectivity or server failure. Retryable by the caller.
    #[error("Store unavailable: {0}")]
    Unavailable(#[from] mongodb::error::Error),

    #[error("Store query timed out after {after:?}")]
    Timeout { after: Duration },

    #[error("Invalid document in {collection}: {reason}")]
    InvalidDocument {
        collection: &'static str,
        reason: String,
    },

    #[error("Injected failure: {0}")]
    Injected(String),
}

impl StorageError {
    pub(crate) fn invalid(collection: &'static str, reason: impl Into<String>) -> Self {
        StorageError::InvalidDocument {
            collection,
            reason: reason.into(),
        }
    }

    /// Whether retrying the same call could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StorageError::Unavailable(_) | StorageError::Timeout { .. })
    }
}

/// Read access to the `orders` collection.
///
/// All matching on `customer_id` is byte-for-byte against the stored
/// subtype-4 binary; callers encode string ids with [`crate::codec::encode`].
///
/// Implementations:
/// - `MongoOrderStore`: MongoDB storage
/// - `MockOrderStore`: in-memory, for tests
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// All orders owned by a customer, any status, in store order.
    async fn find_by_customer(&self, customer_id: &Binary) -> Result<Vec<OrderRecord>>;

    /// Orders with the given status, optionally restricted to an
    /// inclusive `orderDate` window.
    async fn find_by_status(
        &self,
        status: OrderStatus,
        window: Option<DateWindow>,
    ) -> Result<Vec<OrderRecord>>;

    /// One page of a customer's orders, newest `orderDate` first.
    async fn page_by_customer(
        &self,
        customer_id: &Binary,
        skip: u64,
        limit: u32,
    ) -> Result<Vec<OrderRecord>>;
}
