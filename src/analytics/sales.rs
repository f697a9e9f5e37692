//! Sales analytics over a date window.
//!
//! `total_revenue` sums each order's `totalAmount`; the category breakdown
//! sums `quantity * priceAtPurchase` per line. The two are computed
//! independently and are not reconciled when the stored fields disagree.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use super::{AnalyticsService, ProductCatalog, QueryError};
use crate::model::{DateWindow, OrderLine, OrderRecord, OrderStatus};
use crate::normalize::normalize;
use crate::utils::dates::parse_instant;

/// Revenue attributed to one product category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRevenue {
    pub category: String,
    pub revenue: f64,
}

/// Completed-order totals for a window.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesAnalytics {
    pub total_revenue: f64,
    pub completed_orders: u64,
    /// Sorted by category name.
    pub category_breakdown: Vec<CategoryRevenue>,
}

impl SalesAnalytics {
    pub fn empty() -> Self {
        Self {
            total_revenue: 0.0,
            completed_orders: 0,
            category_breakdown: Vec::new(),
        }
    }
}

/// Parse inclusive window bounds from caller-supplied date strings.
pub fn parse_window(start_date: &str, end_date: &str) -> Result<DateWindow, QueryError> {
    let parse = |input: &str| {
        parse_instant(input).ok_or_else(|| QueryError::InvalidDate {
            input: input.to_string(),
        })
    };
    Ok(DateWindow::new(parse(start_date)?, parse(end_date)?))
}

/// Sum of numeric `totalAmount` values and order count.
pub fn revenue_totals(orders: &[OrderRecord]) -> (f64, u64) {
    let total = orders.iter().filter_map(|o| o.total_amount).sum();
    (total, orders.len() as u64)
}

/// Revenue per category at purchase-time prices.
///
/// Lines whose product is not in `catalog` are dropped.
pub fn category_breakdown(lines: &[OrderLine], catalog: &ProductCatalog) -> Vec<CategoryRevenue> {
    let mut by_category: BTreeMap<&str, f64> = BTreeMap::new();
    for line in lines {
        if let Some(product) = catalog.lookup(&line.product_id) {
            *by_category.entry(product.category.as_str()).or_insert(0.0) += line.revenue();
        }
    }

    by_category
        .into_iter()
        .map(|(category, revenue)| CategoryRevenue {
            category: category.to_string(),
            revenue,
        })
        .collect()
}

impl AnalyticsService {
    /// Revenue, order count, and category breakdown for completed orders
    /// with `orderDate` in `[start_date, end_date]`.
    #[tracing::instrument(name = "analytics.sales", skip_all, fields(start_date = %start_date, end_date = %end_date))]
    pub async fn get_sales_analytics(
        &self,
        start_date: &str,
        end_date: &str,
    ) -> Result<SalesAnalytics, QueryError> {
        let window = parse_window(start_date, end_date)?;
        self.get_sales_analytics_in(window).await
    }

    /// [`get_sales_analytics`](Self::get_sales_analytics) with already parsed bounds.
    pub async fn get_sales_analytics_in(
        &self,
        window: DateWindow,
    ) -> Result<SalesAnalytics, QueryError> {
        let orders = self
            .bounded(
                self.stores
                    .orders
                    .find_by_status(OrderStatus::Completed, Some(window)),
            )
            .await?;
        if orders.is_empty() {
            return Ok(SalesAnalytics::empty());
        }

        let (total_revenue, completed_orders) = revenue_totals(&orders);

        let lines: Vec<OrderLine> = orders.iter().flat_map(|o| normalize(&o.products)).collect();
        let catalog = self
            .load_catalog(lines.iter().map(|line| line.product_id.as_str()))
            .await?;
        let category_breakdown = category_breakdown(&lines, &catalog);
        debug!(
            orders = completed_orders,
            lines = lines.len(),
            categories = category_breakdown.len(),
            "Computed sales analytics"
        );

        Ok(SalesAnalytics {
            total_revenue,
            completed_orders,
            category_breakdown,
        })
    }
}
