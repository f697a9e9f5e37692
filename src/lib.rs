//! Order Insights - analytical queries over an order-management store.
//!
//! Four fixed queries over `orders`, `customers`, and `products`:
//! per-customer spending, top-selling products, sales analytics for a date
//! window, and paginated customer order listings. Foreign keys are stored
//! as subtype-4 UUID binaries and matched through [`codec`]; product lists
//! may be native arrays or legacy strings and pass through [`normalize`].

pub mod analytics;
pub mod codec;
pub mod config;
pub mod interfaces;
pub mod model;
pub mod normalize;
pub mod storage;
pub mod utils;

pub use analytics::{AnalyticsService, QueryError};
