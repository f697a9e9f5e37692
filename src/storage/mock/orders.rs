//! Mock OrderStore implementation for testing.

use std::time::Duration;

use async_trait::async_trait;
use mongodb::bson::Binary;
use tokio::sync::RwLock;

use crate::interfaces::{OrderStore, Result, StorageError};
use crate::model::{DateWindow, OrderRecord, OrderStatus};

/// Mock order store that keeps orders in memory, in insertion order.
#[derive(Default)]
pub struct MockOrderStore {
    orders: RwLock<Vec<OrderRecord>>,
    fail_on_query: RwLock<bool>,
    delay: RwLock<Option<Duration>>,
}

impl MockOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, order: OrderRecord) {
        self.orders.write().await.push(order);
    }

    pub async fn set_fail_on_query(&self, fail: bool) {
        *self.fail_on_query.write().await = fail;
    }

    /// Delay every query, for exercising deadlines.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    async fn snapshot(&self) -> Result<Vec<OrderRecord>> {
        if let Some(delay) = *self.delay.read().await {
            tokio::time::sleep(delay).await;
        }
        if *self.fail_on_query.read().await {
            return Err(StorageError::Injected("orders query failed".to_string()));
        }
        Ok(self.orders.read().await.clone())
    }
}

#[async_trait]
impl OrderStore for MockOrderStore {
    async fn find_by_customer(&self, customer_id: &Binary) -> Result<Vec<OrderRecord>> {
        Ok(self
            .snapshot()
            .await?
            .into_iter()
            .filter(|o| o.customer_id == *customer_id)
            .collect())
    }

    async fn find_by_status(
        &self,
        status: OrderStatus,
        window: Option<DateWindow>,
    ) -> Result<Vec<OrderRecord>> {
        Ok(self
            .snapshot()
            .await?
            .into_iter()
            .filter(|o| o.status == status)
            .filter(|o| window.map_or(true, |w| w.contains(&o.order_date)))
            .collect())
    }

    async fn page_by_customer(
        &self,
        customer_id: &Binary,
        skip: u64,
        limit: u32,
    ) -> Result<Vec<OrderRecord>> {
        let mut orders = self.find_by_customer(customer_id).await?;
        orders.sort_by(|a, b| b.order_date.cmp(&a.order_date));
        Ok(orders
            .into_iter()
            .skip(usize::try_from(skip).unwrap_or(usize::MAX))
            .take(limit as usize)
            .collect())
    }
}
