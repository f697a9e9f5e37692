//! Mock CustomerStore and ProductStore implementations for testing.

use std::collections::HashMap;

use async_trait::async_trait;
use mongodb::bson::Binary;
use tokio::sync::RwLock;

use crate::interfaces::{CustomerStore, ProductStore, Result, StorageError};
use crate::model::{Customer, ProductRecord};

/// Mock customer store keyed by string id.
#[derive(Default)]
pub struct MockCustomerStore {
    customers: RwLock<HashMap<String, Customer>>,
    fail_on_get: RwLock<bool>,
}

impl MockCustomerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, customer: Customer) {
        self.customers
            .write()
            .await
            .insert(customer.id.clone(), customer);
    }

    pub async fn set_fail_on_get(&self, fail: bool) {
        *self.fail_on_get.write().await = fail;
    }
}

#[async_trait]
impl CustomerStore for MockCustomerStore {
    async fn get(&self, id: &str) -> Result<Option<Customer>> {
        if *self.fail_on_get.read().await {
            return Err(StorageError::Injected("customers query failed".to_string()));
        }
        Ok(self.customers.read().await.get(id).cloned())
    }
}

/// Mock product store matching binary ids byte-for-byte.
#[derive(Default)]
pub struct MockProductStore {
    products: RwLock<Vec<ProductRecord>>,
    fail_on_find: RwLock<bool>,
}

impl MockProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, product: ProductRecord) {
        self.products.write().await.push(product);
    }

    pub async fn set_fail_on_find(&self, fail: bool) {
        *self.fail_on_find.write().await = fail;
    }
}

#[async_trait]
impl ProductStore for MockProductStore {
    async fn find_by_ids(&self, ids: &[Binary]) -> Result<Vec<ProductRecord>> {
        if *self.fail_on_find.read().await {
            return Err(StorageError::Injected("products query failed".to_string()));
        }
        Ok(self
            .products
            .read()
            .await
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }
}
