//! Mapping between stored BSON documents and typed records.

use mongodb::bson::spec::BinarySubtype;
use mongodb::bson::{Bson, Document};
use tracing::warn;

use crate::codec;
use crate::interfaces::{Result, StorageError};
use crate::model::{Customer, Gender, OrderRecord, OrderStatus, ProductRecord};
use crate::normalize::RawProducts;
use crate::utils::bson_values::{bson_to_datetime, bson_to_f64, bson_to_i64};

use super::{CUSTOMERS_COLLECTION, ORDERS_COLLECTION, PRODUCTS_COLLECTION};

/// Read a primary key that may be a string, a subtype-4 binary, or an ObjectId.
fn string_id(doc: &Document, collection: &'static str) -> Result<String> {
    match doc.get("_id") {
        Some(Bson::String(id)) => Ok(id.clone()),
        Some(Bson::Binary(bin)) if bin.subtype == BinarySubtype::Uuid => {
            codec::decode(bin).map_err(|e| StorageError::invalid(collection, e.to_string()))
        }
        Some(Bson::ObjectId(oid)) => Ok(oid.to_hex()),
        Some(other) => Err(StorageError::invalid(
            collection,
            format!("unsupported _id type {:?}", other.element_type()),
        )),
        None => Err(StorageError::invalid(collection, "missing _id")),
    }
}

fn required_str(doc: &Document, field: &str, collection: &'static str) -> Result<String> {
    doc.get_str(field)
        .map(str::to_string)
        .map_err(|_| StorageError::invalid(collection, format!("missing or non-string {field}")))
}

pub(crate) fn order_from_document(doc: &Document) -> Result<OrderRecord> {
    let id = string_id(doc, ORDERS_COLLECTION)?;

    let customer_id = match doc.get("customerId") {
        Some(Bson::Binary(bin)) => bin.clone(),
        _ => {
            return Err(StorageError::invalid(
                ORDERS_COLLECTION,
                format!("order {id}: customerId is not binary"),
            ))
        }
    };

    let order_date = doc
        .get("orderDate")
        .and_then(bson_to_datetime)
        .ok_or_else(|| {
            StorageError::invalid(ORDERS_COLLECTION, format!("order {id}: unreadable orderDate"))
        })?;

    let status = doc
        .get_str("status")
        .ok()
        .and_then(OrderStatus::parse)
        .ok_or_else(|| {
            StorageError::invalid(ORDERS_COLLECTION, format!("order {id}: unknown status"))
        })?;

    Ok(OrderRecord {
        customer_id,
        products: RawProducts::from_bson(doc.get("products")),
        total_amount: doc.get("totalAmount").and_then(bson_to_f64),
        order_date,
        status,
        id,
    })
}

pub(crate) fn customer_from_document(doc: &Document) -> Result<Customer> {
    Ok(Customer {
        id: string_id(doc, CUSTOMERS_COLLECTION)?,
        name: required_str(doc, "name", CUSTOMERS_COLLECTION)?,
        email: required_str(doc, "email", CUSTOMERS_COLLECTION)?,
        age: doc.get("age").and_then(bson_to_i64),
        location: doc.get_str("location").ok().map(str::to_string),
        gender: doc.get_str("gender").ok().and_then(Gender::parse),
    })
}

pub(crate) fn product_from_document(doc: &Document) -> Result<ProductRecord> {
    let id = match doc.get("_id") {
        Some(Bson::Binary(bin)) => bin.clone(),
        _ => return Err(StorageError::invalid(PRODUCTS_COLLECTION, "_id is not binary")),
    };

    Ok(ProductRecord {
        id,
        name: required_str(doc, "name", PRODUCTS_COLLECTION)?,
        category: required_str(doc, "category", PRODUCTS_COLLECTION)?,
        price: doc.get("price").and_then(bson_to_f64).unwrap_or(0.0),
        stock: doc.get("stock").and_then(bson_to_i64).unwrap_or(0),
    })
}

/// Map one scanned row, logging and dropping it when it cannot be read.
///
/// Scans stay usable over collections with a few malformed legacy rows.
pub(crate) fn readable<T>(doc: &Document, map: impl Fn(&Document) -> Result<T>) -> Option<T> {
    match map(doc) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!(id = ?doc.get("_id"), error = %e, "Skipping unreadable document");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use mongodb::bson::{doc, DateTime as BsonDateTime};

    use super::*;
    use crate::model::OrderLine;

    const CUSTOMER: &str = "7d444840-9dc0-11d1-b245-5ffdce74fad2";
    const PRODUCT: &str = "e902893a-9d22-3c7e-a7b8-d6e313b71d9f";

    fn order_doc() -> Document {
        doc! {
            "_id": "order-1",
            "customerId": codec::encode(CUSTOMER).unwrap(),
            "products": [ { "productId": PRODUCT, "quantity": 2, "priceAtPurchase": 5.0 } ],
            "totalAmount": 10,
            "orderDate": BsonDateTime::from_millis(1_704_067_200_000),
            "status": "completed",
        }
    }

    #[test]
    fn test_order_from_document() {
        let order = order_from_document(&order_doc()).unwrap();

        assert_eq!(order.id, "order-1");
        assert!(codec::equals(CUSTOMER, &order.customer_id));
        assert_eq!(order.total_amount, Some(10.0));
        assert_eq!(order.order_date, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(order.status, OrderStatus::Completed);
        assert_eq!(
            crate::normalize::normalize(&order.products),
            vec![OrderLine::new(PRODUCT, 2, 5.0)]
        );
    }

    #[test]
    fn test_order_accepts_string_date_and_binary_id() {
        let mut doc = order_doc();
        doc.insert("_id", codec::encode(PRODUCT).unwrap());
        doc.insert("orderDate", "2024-01-10T00:00:00.000Z");

        let order = order_from_document(&doc).unwrap();
        assert_eq!(order.id, PRODUCT);
        assert_eq!(order.order_date, Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_order_legacy_products_kept_raw() {
        let mut doc = order_doc();
        doc.insert("products", "[{'productId': 'x', 'quantity': 1, 'priceAtPurchase': 1}]");

        let order = order_from_document(&doc).unwrap();
        assert!(matches!(order.products, RawProducts::Legacy(_)));
    }

    #[test]
    fn test_order_rejects_string_customer_id() {
        let mut doc = order_doc();
        doc.insert("customerId", CUSTOMER);

        let result = order_from_document(&doc);
        assert!(matches!(
            result,
            Err(StorageError::InvalidDocument { collection: "orders", .. })
        ));
    }

    #[test]
    fn test_order_rejects_unknown_status() {
        let mut doc = order_doc();
        doc.insert("status", "shipped");
        assert!(order_from_document(&doc).is_err());
    }

    #[test]
    fn test_order_non_numeric_total_is_none() {
        let mut doc = order_doc();
        doc.insert("totalAmount", "lots");
        assert_eq!(order_from_document(&doc).unwrap().total_amount, None);
    }

    #[test]
    fn test_unreadable_orders_are_skipped() {
        let mut bad_customer = order_doc();
        bad_customer.insert("_id", "order-bad-customer");
        bad_customer.insert("customerId", CUSTOMER);
        let mut bad_status = order_doc();
        bad_status.insert("_id", "order-bad-status");
        bad_status.insert("status", "shipped");
        let mut bad_date = order_doc();
        bad_date.insert("_id", "order-bad-date");
        bad_date.insert("orderDate", "yesterday");
        let mut good = order_doc();
        good.insert("_id", "order-good");

        let docs = [order_doc(), bad_customer, bad_status, bad_date, good];
        let orders: Vec<_> = docs
            .iter()
            .filter_map(|doc| readable(doc, order_from_document))
            .collect();

        let ids: Vec<_> = orders.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["order-1", "order-good"]);
    }

    #[test]
    fn test_unreadable_products_are_skipped() {
        let docs = [
            doc! { "_id": "not-binary", "name": "Widget", "category": "Tools" },
            doc! { "_id": codec::encode(PRODUCT).unwrap(), "name": "Widget", "category": "Tools" },
        ];
        let products: Vec<_> = docs
            .iter()
            .filter_map(|doc| readable(doc, product_from_document))
            .collect();

        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Widget");
    }

    #[test]
    fn test_customer_from_document() {
        let doc = doc! {
            "_id": CUSTOMER,
            "name": "Ada",
            "email": "ada@example.com",
            "age": 36,
            "location": "London",
            "gender": "Female",
        };

        let customer = customer_from_document(&doc).unwrap();
        assert_eq!(customer.id, CUSTOMER);
        assert_eq!(customer.name, "Ada");
        assert_eq!(customer.age, Some(36));
        assert_eq!(customer.gender, Some(Gender::Female));
    }

    #[test]
    fn test_customer_requires_email() {
        let doc = doc! { "_id": CUSTOMER, "name": "Ada" };
        assert!(customer_from_document(&doc).is_err());
    }

    #[test]
    fn test_product_from_document() {
        let doc = doc! {
            "_id": codec::encode(PRODUCT).unwrap(),
            "name": "Kettle",
            "category": "Kitchen",
            "price": 25.5,
            "stock": 3,
        };

        let product = product_from_document(&doc).unwrap();
        assert!(codec::equals(PRODUCT, &product.id));
        assert_eq!(product.category, "Kitchen");
        assert_eq!(product.stock, 3);
    }

    #[test]
    fn test_product_requires_binary_id() {
        let doc = doc! { "_id": PRODUCT, "name": "Kettle", "category": "Kitchen" };
        assert!(product_from_document(&doc).is_err());
    }
}
