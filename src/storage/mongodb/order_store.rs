//! MongoDB OrderStore implementation.

use async_trait::async_trait;
use mongodb::bson::{doc, Binary, DateTime as BsonDateTime, Document};
use mongodb::{Collection, Cursor, Database};
use tracing::debug;

use crate::interfaces::{OrderStore, Result};
use crate::model::{DateWindow, OrderRecord, OrderStatus};

use super::documents::{order_from_document, readable};
use super::ORDERS_COLLECTION;

/// Temporary field holding `orderDate` as a BSON date inside pipelines.
const CONVERTED_DATE: &str = "orderDateConverted";

/// `$skip` takes a signed 64-bit count; anything larger is past every row.
fn skip_count(skip: u64) -> i64 {
    i64::try_from(skip).unwrap_or(i64::MAX)
}

/// MongoDB implementation of OrderStore.
pub struct MongoOrderStore {
    orders: Collection<Document>,
}

impl MongoOrderStore {
    /// Create an order store over `database.orders`.
    pub fn new(database: &Database) -> Self {
        Self {
            orders: database.collection(ORDERS_COLLECTION),
        }
    }

    async fn collect(mut cursor: Cursor<Document>) -> Result<Vec<OrderRecord>> {
        let mut orders = Vec::new();
        while cursor.advance().await? {
            let doc = cursor.deserialize_current()?;
            orders.extend(readable(&doc, order_from_document));
        }
        Ok(orders)
    }
}

#[async_trait]
impl OrderStore for MongoOrderStore {
    async fn find_by_customer(&self, customer_id: &Binary) -> Result<Vec<OrderRecord>> {
        let filter = doc! { "customerId": customer_id.clone() };
        let cursor = self.orders.find(filter).await?;
        Self::collect(cursor).await
    }

    async fn find_by_status(
        &self,
        status: OrderStatus,
        window: Option<DateWindow>,
    ) -> Result<Vec<OrderRecord>> {
        let Some(window) = window else {
            let cursor = self.orders.find(doc! { "status": status.as_str() }).await?;
            return Self::collect(cursor).await;
        };

        // orderDate may be stored as a string on older rows, so compare
        // on a converted copy rather than the raw field.
        let start = BsonDateTime::from_millis(window.start.timestamp_millis());
        let end = BsonDateTime::from_millis(window.end.timestamp_millis());
        let pipeline = vec![
            doc! { "$addFields": { CONVERTED_DATE: { "$toDate": "$orderDate" } } },
            doc! {
                "$match": {
                    "status": status.as_str(),
                    CONVERTED_DATE: { "$gte": start, "$lte": end },
                }
            },
            doc! { "$project": { CONVERTED_DATE: 0 } },
        ];

        debug!(%status, start = %window.start, end = %window.end, "Aggregating orders in window");
        let cursor = self.orders.aggregate(pipeline).await?;
        Self::collect(cursor).await
    }

    async fn page_by_customer(
        &self,
        customer_id: &Binary,
        skip: u64,
        limit: u32,
    ) -> Result<Vec<OrderRecord>> {
        // Sort on the converted date: BSON orders strings and dates by type
        // first, so a raw sort would split mixed rows.
        let pipeline = vec![
            doc! { "$match": { "customerId": customer_id.clone() } },
            doc! { "$addFields": { CONVERTED_DATE: { "$toDate": "$orderDate" } } },
            doc! { "$sort": { CONVERTED_DATE: -1 } },
            doc! { "$skip": skip_count(skip) },
            doc! { "$limit": i64::from(limit) },
            doc! { "$project": { CONVERTED_DATE: 0 } },
        ];

        let cursor = self.orders.aggregate(pipeline).await?;
        Self::collect(cursor).await
    }
}
