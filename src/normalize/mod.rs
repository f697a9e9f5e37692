//! Product list normalization.
//!
//! `Order.products` is persisted two ways: as a native BSON array of line
//! documents, or as a single-quoted pseudo-JSON string left behind by an old
//! import (`"[{'productId': '...', 'quantity': 2, 'priceAtPurchase': 10}]"`).
//! Both are normalized into `Vec<OrderLine>` here, in process.
//!
//! Malformed input follows the empty-list degrade policy: [`normalize`]
//! returns an empty list and the caller is never told. [`try_normalize`]
//! exposes the underlying [`MalformedProductList`] reason for diagnostics.

use mongodb::bson::spec::BinarySubtype;
use mongodb::bson::{doc, Bson};
use tracing::debug;

use crate::codec;
use crate::model::OrderLine;
use crate::utils::bson_values::{bson_to_f64, bson_to_i64};

/// The stored `products` field, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum RawProducts {
    /// Native array of line documents.
    List(Vec<Bson>),
    /// Legacy single-quoted string form.
    Legacy(String),
    /// Field missing or null.
    Absent,
    /// Any other BSON type.
    Unsupported(Bson),
}

impl RawProducts {
    /// Classify a stored field value.
    pub fn from_bson(value: Option<&Bson>) -> Self {
        match value {
            None | Some(Bson::Null) => RawProducts::Absent,
            Some(Bson::Array(items)) => RawProducts::List(items.clone()),
            Some(Bson::String(text)) => RawProducts::Legacy(text.clone()),
            Some(other) => RawProducts::Unsupported(other.clone()),
        }
    }

    /// Native list form of `lines`.
    pub fn from_lines(lines: &[OrderLine]) -> Self {
        RawProducts::List(
            lines
                .iter()
                .map(|line| {
                    Bson::Document(doc! {
                        "productId": &line.product_id,
                        "quantity": line.quantity,
                        "priceAtPurchase": line.price_at_purchase,
                    })
                })
                .collect(),
        )
    }

    /// The BSON value a store would persist for this field.
    pub fn to_bson(&self) -> Bson {
        match self {
            RawProducts::List(items) => Bson::Array(items.clone()),
            RawProducts::Legacy(text) => Bson::String(text.clone()),
            RawProducts::Absent => Bson::Null,
            RawProducts::Unsupported(value) => value.clone(),
        }
    }
}

/// Why a product list could not be normalized.
#[derive(Debug, thiserror::Error)]
pub enum MalformedProductList {
    #[error("Legacy product string is not valid JSON after quote substitution: {0}")]
    Syntax(#[from] serde_json::Error),

    #[error("Legacy product string does not hold a list")]
    NotAList,

    #[error("Products field is missing")]
    Absent,

    #[error("Products field has unsupported type {0:?}")]
    UnsupportedType(mongodb::bson::spec::ElementType),
}

/// Normalize a stored product list, degrading to an empty list.
pub fn normalize(raw: &RawProducts) -> Vec<OrderLine> {
    match try_normalize(raw) {
        Ok(lines) => lines,
        Err(reason) => {
            debug!(%reason, "Product list degraded to empty");
            Vec::new()
        }
    }
}

/// Normalize a stored product list, reporting why it was malformed.
///
/// Native lists are taken as they are; elements that are not documents or
/// carry no usable `productId` are skipped rather than failing the list.
pub fn try_normalize(raw: &RawProducts) -> Result<Vec<OrderLine>, MalformedProductList> {
    match raw {
        RawProducts::List(items) => Ok(items.iter().filter_map(line_from_bson).collect()),
        RawProducts::Legacy(text) => parse_legacy(text),
        RawProducts::Absent => Err(MalformedProductList::Absent),
        RawProducts::Unsupported(value) => {
            Err(MalformedProductList::UnsupportedType(value.element_type()))
        }
    }
}

/// Serialize lines into the legacy single-quoted string form.
pub fn to_legacy_string(lines: &[OrderLine]) -> Result<String, serde_json::Error> {
    Ok(serde_json::to_string(lines)?.replace('"', "'"))
}

fn parse_legacy(text: &str) -> Result<Vec<OrderLine>, MalformedProductList> {
    let value: serde_json::Value = serde_json::from_str(&text.replace('\'', "\""))?;
    let serde_json::Value::Array(items) = value else {
        return Err(MalformedProductList::NotAList);
    };

    Ok(items
        .iter()
        .filter_map(|item| mongodb::bson::to_bson(item).ok())
        .filter_map(|item| line_from_bson(&item))
        .collect())
}

/// Best-effort extraction of one line from a stored element.
fn line_from_bson(element: &Bson) -> Option<OrderLine> {
    let Bson::Document(line) = element else {
        debug!(element_type = ?element.element_type(), "Skipping non-document product entry");
        return None;
    };

    let product_id = match line.get("productId") {
        Some(Bson::String(id)) => id.clone(),
        Some(Bson::Binary(bin)) if bin.subtype == BinarySubtype::Uuid => codec::decode(bin).ok()?,
        _ => {
            debug!("Skipping product entry without productId");
            return None;
        }
    };

    Some(OrderLine {
        product_id,
        quantity: line.get("quantity").and_then(bson_to_i64).unwrap_or(0),
        price_at_purchase: line.get("priceAtPurchase").and_then(bson_to_f64).unwrap_or(0.0),
    })
}

#[cfg(test)]
mod tests;
