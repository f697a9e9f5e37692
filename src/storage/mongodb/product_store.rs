//! MongoDB ProductStore implementation.

use async_trait::async_trait;
use mongodb::bson::{doc, Binary, Bson, Document};
use mongodb::{Collection, Database};

use crate::interfaces::{ProductStore, Result};
use crate::model::ProductRecord;

use super::documents::{product_from_document, readable};
use super::PRODUCTS_COLLECTION;

/// MongoDB implementation of ProductStore.
pub struct MongoProductStore {
    products: Collection<Document>,
}

impl MongoProductStore {
    /// Create a product store over `database.products`.
    pub fn new(database: &Database) -> Self {
        Self {
            products: database.collection(PRODUCTS_COLLECTION),
        }
    }
}

#[async_trait]
impl ProductStore for MongoProductStore {
    async fn find_by_ids(&self, ids: &[Binary]) -> Result<Vec<ProductRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Bson> = ids.iter().cloned().map(Bson::Binary).collect();
        let mut cursor = self.products.find(doc! { "_id": { "$in": ids } }).await?;

        let mut products = Vec::new();
        while cursor.advance().await? {
            let doc = cursor.deserialize_current()?;
            products.extend(readable(&doc, product_from_document));
        }
        Ok(products)
    }
}
