//! Typed records for the three collections.
//!
//! Stores map raw documents into these before the engine sees them, so a
//! misspelled field name is a compile error rather than a silent `null`.

use chrono::{DateTime, Utc};
use mongodb::bson::Binary;
use serde::{Deserialize, Serialize};

use crate::normalize::RawProducts;

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Completed,
}

impl OrderStatus {
    /// Stored string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Completed => "completed",
        }
    }

    /// Parse the stored string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(OrderStatus::Pending),
            "completed" => Some(OrderStatus::Completed),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One product entry within an order.
///
/// `price_at_purchase` is the price snapshot taken when the order was
/// placed, not the product's current price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: String,
    pub quantity: i64,
    pub price_at_purchase: f64,
}

impl OrderLine {
    pub fn new(product_id: impl Into<String>, quantity: i64, price_at_purchase: f64) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
            price_at_purchase,
        }
    }

    /// Revenue contributed by this line at its historical price.
    pub fn revenue(&self) -> f64 {
        self.quantity as f64 * self.price_at_purchase
    }
}

/// An order as read from the store.
///
/// `total_amount` is expected to equal the sum of line revenues but nothing
/// enforces it; legacy rows may disagree. It is `None` when the stored value
/// is missing or not a number.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    pub id: String,
    /// Owning customer, stored as a subtype-4 binary.
    pub customer_id: Binary,
    pub products: RawProducts,
    pub total_amount: Option<f64>,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
}

/// Customer gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Male" => Some(Gender::Male),
            "Female" => Some(Gender::Female),
            _ => None,
        }
    }
}

/// A customer. Unlike orders and products, the id is stored as a plain string.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub age: Option<i64>,
    pub location: Option<String>,
    pub gender: Option<Gender>,
}

/// A catalog product. The id is a subtype-4 binary.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub id: Binary,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub stock: i64,
}

/// Inclusive `[start, end]` window over `orderDate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        *instant >= self.start && *instant <= self.end
    }
}
