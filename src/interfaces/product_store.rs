//! Product storage interface.

use async_trait::async_trait;
use mongodb::bson::Binary;

use super::order_store::Result;
use crate::model::ProductRecord;

/// Read access to the `products` collection.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Products whose binary `_id` is one of `ids`. Unknown ids are
    /// silently absent from the result; order is unspecified.
    async fn find_by_ids(&self, ids: &[Binary]) -> Result<Vec<ProductRecord>>;
}
