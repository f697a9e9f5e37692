//! The four analytical queries.
//!
//! [`AnalyticsService`] reads through the store traits and does all
//! grouping, joining, sorting, and normalization in process. It holds no
//! mutable state; calls may run concurrently.
//!
//! Error propagation differs by operation and is part of the contract:
//! - `get_top_selling_products` logs any failure and returns an empty list.
//! - `get_customer_spending`, `get_sales_analytics`, and
//!   `get_customer_orders` return the error to the caller.

use std::collections::BTreeSet;
use std::future::Future;
use std::time::Duration;

use mongodb::bson::Binary;
use tracing::debug;

use crate::codec::{self, CodecError};
use crate::config::QueryConfig;
use crate::interfaces::StorageError;
use crate::storage::Stores;

mod catalog;
mod customer_orders;
mod sales;
mod spending;
mod top_products;

pub use catalog::ProductCatalog;
pub use customer_orders::{CustomerSummary, OrderView};
pub use sales::{category_breakdown, parse_window, revenue_totals, CategoryRevenue, SalesAnalytics};
pub use spending::{summarize_spending, CustomerSpending};
pub use top_products::{rank_products, TopProduct, UNKNOWN_PRODUCT_NAME};

/// Errors returned by the analytics operations.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Invalid argument {name}: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    #[error("Invalid date: {input:?}")]
    InvalidDate { input: String },
}

impl QueryError {
    /// Whether retrying the same call could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, QueryError::Storage(e) if e.is_retryable())
    }

    fn at_least_one(name: &'static str) -> Self {
        QueryError::InvalidArgument {
            name,
            reason: "must be at least 1".to_string(),
        }
    }
}

/// Entry point for the analytical queries.
#[derive(Clone)]
pub struct AnalyticsService {
    stores: Stores,
    query_timeout: Option<Duration>,
}

impl AnalyticsService {
    pub fn new(stores: Stores, config: &QueryConfig) -> Self {
        Self {
            stores,
            query_timeout: config.timeout(),
        }
    }

    pub fn stores(&self) -> &Stores {
        &self.stores
    }

    /// Run one store query under the configured deadline.
    async fn bounded<T, F>(&self, query: F) -> Result<T, StorageError>
    where
        F: Future<Output = Result<T, StorageError>>,
    {
        match self.query_timeout {
            Some(after) => tokio::time::timeout(after, query)
                .await
                .map_err(|_| StorageError::Timeout { after })?,
            None => query.await,
        }
    }

    /// Fetch the products referenced by `product_ids` and index them for
    /// codec-equality lookup. Ids that cannot be encoded are left out and
    /// will simply not join.
    async fn load_catalog<'a, I>(&self, product_ids: I) -> Result<ProductCatalog, QueryError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let distinct: BTreeSet<&str> = product_ids.into_iter().collect();
        let mut keys: Vec<Binary> = Vec::with_capacity(distinct.len());
        for product_id in distinct {
            match codec::encode(product_id) {
                Ok(key) => keys.push(key),
                Err(e) => debug!(product_id, error = %e, "Product id will not join"),
            }
        }

        let products = self.bounded(self.stores.products.find_by_ids(&keys)).await?;
        debug!(requested = keys.len(), found = products.len(), "Loaded product catalog");
        Ok(ProductCatalog::new(products))
    }
}
