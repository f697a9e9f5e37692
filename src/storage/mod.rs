//! Storage implementations.

use std::sync::Arc;

use ::mongodb::bson::doc;
use tracing::info;

use crate::config::StorageConfig;
use crate::interfaces::{CustomerStore, OrderStore, ProductStore, Result};

pub mod mongodb;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use self::mongodb::{MongoCustomerStore, MongoOrderStore, MongoProductStore};

/// The three collection stores, handed explicitly to the analytics service.
///
/// Whoever calls [`init_storage`] owns the connection and must call
/// [`Stores::shutdown`] when done.
#[derive(Clone)]
pub struct Stores {
    pub orders: Arc<dyn OrderStore>,
    pub customers: Arc<dyn CustomerStore>,
    pub products: Arc<dyn ProductStore>,
    client: Option<::mongodb::Client>,
}

impl Stores {
    /// Bundle existing store implementations. No connection is owned.
    pub fn new(
        orders: Arc<dyn OrderStore>,
        customers: Arc<dyn CustomerStore>,
        products: Arc<dyn ProductStore>,
    ) -> Self {
        Self {
            orders,
            customers,
            products,
            client: None,
        }
    }

    /// Close the underlying connection, if this bundle owns one.
    pub async fn shutdown(self) {
        if let Some(client) = self.client {
            client.shutdown().await;
            info!("Storage connection closed");
        }
    }
}

/// Initialize storage based on configuration.
///
/// Connects to MongoDB and pings the database so an unreachable server
/// fails here rather than on the first query.
pub async fn init_storage(config: &StorageConfig) -> Result<Stores> {
    info!(
        "Storage: mongodb at {} (database {})",
        config.mongodb.uri, config.mongodb.database
    );

    let client = ::mongodb::Client::with_uri_str(&config.mongodb.uri).await?;
    let database = client.database(&config.mongodb.database);
    database.run_command(doc! { "ping": 1 }).await?;

    Ok(Stores {
        orders: Arc::new(MongoOrderStore::new(&database)),
        customers: Arc::new(MongoCustomerStore::new(&database)),
        products: Arc::new(MongoProductStore::new(&database)),
        client: Some(client),
    })
}
