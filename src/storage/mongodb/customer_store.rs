//! MongoDB CustomerStore implementation.

use async_trait::async_trait;
use mongodb::bson::{doc, Document};
use mongodb::{Collection, Database};

use crate::codec;
use crate::interfaces::{CustomerStore, Result};
use crate::model::Customer;

use super::documents::customer_from_document;
use super::CUSTOMERS_COLLECTION;

/// Match `_id` stored either as the string form or as a UUID binary.
fn id_filter(id: &str) -> Document {
    match codec::encode(id) {
        Ok(key) => doc! { "_id": { "$in": [id, key] } },
        Err(_) => doc! { "_id": id },
    }
}

/// MongoDB implementation of CustomerStore.
pub struct MongoCustomerStore {
    customers: Collection<Document>,
}

impl MongoCustomerStore {
    /// Create a customer store over `database.customers`.
    pub fn new(database: &Database) -> Self {
        Self {
            customers: database.collection(CUSTOMERS_COLLECTION),
        }
    }
}

#[async_trait]
impl CustomerStore for MongoCustomerStore {
    async fn get(&self, id: &str) -> Result<Option<Customer>> {
        match self.customers.find_one(id_filter(id)).await? {
            Some(doc) => Ok(Some(customer_from_document(&doc)?)),
            None => Ok(None),
        }
    }
}
