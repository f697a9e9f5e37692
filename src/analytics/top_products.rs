//! Top-selling products.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, error};

use super::{AnalyticsService, QueryError};
use crate::model::{OrderRecord, OrderStatus};
use crate::normalize::normalize;

/// Name reported for a ranked product missing from the catalog.
pub const UNKNOWN_PRODUCT_NAME: &str = "Unknown Product";

/// One entry in the top-selling ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub product_id: String,
    pub name: String,
    pub total_sold: i64,
}

/// Sum quantities per product id across all lines of `orders`.
///
/// Sorted by quantity descending, ties by product id ascending, so any
/// prefix of the result is the ranking for that limit. Totals saturate at
/// `i64::MAX`.
pub fn rank_products(orders: &[OrderRecord]) -> Vec<(String, i64)> {
    let mut totals: HashMap<String, i64> = HashMap::new();
    for order in orders {
        for line in normalize(&order.products) {
            let total = totals.entry(line.product_id).or_insert(0);
            *total = total.saturating_add(line.quantity);
        }
    }

    let mut ranked: Vec<(String, i64)> = totals.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}

impl AnalyticsService {
    /// The `limit` best-selling products over completed orders.
    ///
    /// Never fails: any error is logged and yields an empty list, so an
    /// empty result does not distinguish "no sales" from "lookup failed".
    #[tracing::instrument(name = "analytics.top_selling_products", skip_all, fields(limit = limit))]
    pub async fn get_top_selling_products(&self, limit: usize) -> Vec<TopProduct> {
        match self.try_top_selling_products(limit).await {
            Ok(products) => products,
            Err(e) => {
                error!(error = %e, "Error fetching top-selling products");
                Vec::new()
            }
        }
    }

    async fn try_top_selling_products(&self, limit: usize) -> Result<Vec<TopProduct>, QueryError> {
        if limit == 0 {
            return Err(QueryError::at_least_one("limit"));
        }

        let orders = self
            .bounded(self.stores.orders.find_by_status(OrderStatus::Completed, None))
            .await?;

        let mut ranked = rank_products(&orders);
        debug!(orders = orders.len(), products = ranked.len(), "Ranked products");
        ranked.truncate(limit);

        let catalog = self
            .load_catalog(ranked.iter().map(|(product_id, _)| product_id.as_str()))
            .await?;

        Ok(ranked
            .into_iter()
            .map(|(product_id, total_sold)| {
                let name = catalog
                    .lookup(&product_id)
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| UNKNOWN_PRODUCT_NAME.to_string());
                TopProduct {
                    product_id,
                    name,
                    total_sold,
                }
            })
            .collect())
    }
}
