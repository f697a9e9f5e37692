//! Product lookup by codec equality.

use std::collections::HashMap;

use mongodb::bson::spec::BinarySubtype;

use crate::codec;
use crate::model::ProductRecord;

/// Products indexed by their subtype-4 id bytes.
///
/// A lookup by string id encodes it and compares bytes, so it matches
/// exactly when [`codec::equals`] would.
#[derive(Debug, Default)]
pub struct ProductCatalog {
    by_id: HashMap<Vec<u8>, ProductRecord>,
}

impl ProductCatalog {
    /// Index `products`. Ids with any subtype other than 4 can never match
    /// an encoded string and are dropped.
    pub fn new(products: Vec<ProductRecord>) -> Self {
        let by_id = products
            .into_iter()
            .filter(|p| p.id.subtype == BinarySubtype::Uuid)
            .map(|p| (p.id.bytes.clone(), p))
            .collect();
        Self { by_id }
    }

    pub fn lookup(&self, product_id: &str) -> Option<&ProductRecord> {
        let key = codec::encode(product_id).ok()?;
        self.by_id.get(&key.bytes)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use mongodb::bson::Binary;

    use super::*;

    const PRODUCT: &str = "9b2f7c1e-3d4a-4b5c-8d6e-7f8091a2b3c4";

    fn product(id: Binary) -> ProductRecord {
        ProductRecord {
            id,
            name: "Kettle".to_string(),
            category: "Kitchen".to_string(),
            price: 20.0,
            stock: 4,
        }
    }

    #[test]
    fn test_lookup_by_string_id() {
        let catalog = ProductCatalog::new(vec![product(codec::encode(PRODUCT).unwrap())]);
        assert_eq!(catalog.lookup(PRODUCT).map(|p| p.name.as_str()), Some("Kettle"));
        assert_eq!(
            catalog.lookup(&PRODUCT.to_uppercase()).map(|p| p.name.as_str()),
            Some("Kettle")
        );
    }

    #[test]
    fn test_lookup_misses_other_subtypes_and_bad_ids() {
        let generic = Binary {
            subtype: BinarySubtype::Generic,
            bytes: codec::encode(PRODUCT).unwrap().bytes,
        };
        let catalog = ProductCatalog::new(vec![product(generic)]);

        assert!(catalog.is_empty());
        assert!(catalog.lookup(PRODUCT).is_none());
        assert!(catalog.lookup("P1").is_none());
    }
}
