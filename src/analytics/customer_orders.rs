//! Paginated per-customer order listing.

use serde::Serialize;
use tracing::debug;

use super::{AnalyticsService, QueryError};
use crate::codec;
use crate::model::{Customer, OrderLine, OrderRecord, OrderStatus};
use crate::normalize::normalize;
use crate::utils::dates::format_iso_millis;

/// Identity fields of the owning customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerSummary {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<Customer> for CustomerSummary {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id,
            name: customer.name,
            email: customer.email,
        }
    }
}

/// One order in a customer's listing, products normalized.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: String,
    pub order_date: String,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub products: Vec<OrderLine>,
    pub customer: Option<CustomerSummary>,
}

impl OrderView {
    fn new(order: OrderRecord, customer: Option<CustomerSummary>) -> Self {
        Self {
            products: normalize(&order.products),
            order_date: format_iso_millis(&order.order_date),
            total_amount: order.total_amount.unwrap_or(0.0),
            status: order.status,
            id: order.id,
            customer,
        }
    }
}

impl AnalyticsService {
    /// Page `page` (1-based) of a customer's orders, newest first,
    /// `limit` orders per page.
    #[tracing::instrument(name = "analytics.customer_orders", skip_all, fields(customer_id = %customer_id, page = page, limit = limit))]
    pub async fn get_customer_orders(
        &self,
        customer_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<Vec<OrderView>, QueryError> {
        if page == 0 {
            return Err(QueryError::at_least_one("page"));
        }
        if limit == 0 {
            return Err(QueryError::at_least_one("limit"));
        }

        let key = codec::encode(customer_id)?;
        let skip = u64::from(page - 1) * u64::from(limit);
        let orders = self
            .bounded(self.stores.orders.page_by_customer(&key, skip, limit))
            .await?;
        debug!(orders = orders.len(), skip, "Fetched order page");
        if orders.is_empty() {
            return Ok(Vec::new());
        }

        // Customer ids are stored as plain strings; look up the canonical
        // form so differently cased input still joins.
        let canonical_id = codec::decode(&key)?;
        let customer = self
            .bounded(self.stores.customers.get(&canonical_id))
            .await?
            .map(CustomerSummary::from);
        if customer.is_none() {
            debug!(customer_id = %canonical_id, "Owning customer not found");
        }

        Ok(orders
            .into_iter()
            .map(|order| OrderView::new(order, customer.clone()))
            .collect())
    }
}
