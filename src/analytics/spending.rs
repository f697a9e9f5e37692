//! Per-customer spending summary.

use serde::Serialize;
use tracing::debug;

use super::{AnalyticsService, QueryError};
use crate::codec;
use crate::model::OrderRecord;
use crate::utils::dates::format_iso_millis;

/// Spending summary for one customer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSpending {
    pub customer_id: String,
    pub total_spent: f64,
    pub average_order_value: f64,
    /// ISO-8601 with milliseconds, `None` when the customer has no orders.
    pub last_order_date: Option<String>,
}

/// Summarize `orders`, which must all belong to `customer_id`.
///
/// Every status counts, pending included. Orders without a numeric total
/// still count toward the last order date but are left out of both the sum
/// and the average.
pub fn summarize_spending(customer_id: &str, orders: &[OrderRecord]) -> CustomerSpending {
    let Some(last_order_date) = orders.iter().map(|o| o.order_date).max() else {
        return CustomerSpending {
            customer_id: customer_id.to_string(),
            total_spent: 0.0,
            average_order_value: 0.0,
            last_order_date: None,
        };
    };

    let amounts: Vec<f64> = orders.iter().filter_map(|o| o.total_amount).collect();
    let total_spent: f64 = amounts.iter().sum();
    let average_order_value = if amounts.is_empty() {
        0.0
    } else {
        total_spent / amounts.len() as f64
    };
    CustomerSpending {
        customer_id: customer_id.to_string(),
        total_spent,
        average_order_value,
        last_order_date: Some(format_iso_millis(&last_order_date)),
    }
}

impl AnalyticsService {
    /// Total and average order value plus most recent order date for a customer.
    #[tracing::instrument(name = "analytics.customer_spending", skip_all, fields(customer_id = %customer_id))]
    pub async fn get_customer_spending(
        &self,
        customer_id: &str,
    ) -> Result<CustomerSpending, QueryError> {
        let key = codec::encode(customer_id)?;
        let orders = self
            .bounded(self.stores.orders.find_by_customer(&key))
            .await?;
        debug!(orders = orders.len(), "Matched customer orders");

        Ok(summarize_spending(customer_id, &orders))
    }
}
