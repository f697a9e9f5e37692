use mongodb::bson::{doc, Bson};
use proptest::prelude::*;

use super::*;
use crate::codec;

const P1: &str = "3f2c1b6e-8a4d-4e9b-9c71-2d5e6f708192";

#[test]
fn test_legacy_string_normalizes() {
    let raw = RawProducts::Legacy(format!(
        "[{{'productId': '{P1}', 'quantity': 2, 'priceAtPurchase': 10}}]"
    ));
    assert_eq!(normalize(&raw), vec![OrderLine::new(P1, 2, 10.0)]);
}

#[test]
fn test_legacy_string_with_placeholder_ids() {
    let raw = RawProducts::Legacy("[{'productId': 'P1', 'quantity': 2, 'priceAtPurchase': 10}]".into());
    assert_eq!(normalize(&raw), vec![OrderLine::new("P1", 2, 10.0)]);
}

#[test]
fn test_native_list_is_taken_as_is() {
    let lines = vec![OrderLine::new(P1, 3, 4.5), OrderLine::new("other", 1, 0.0)];
    assert_eq!(normalize(&RawProducts::from_lines(&lines)), lines);
}

#[test]
fn test_native_list_accepts_mixed_number_types() {
    let raw = RawProducts::List(vec![Bson::Document(doc! {
        "productId": P1,
        "quantity": 2_i32,
        "priceAtPurchase": 7_i64,
    })]);
    assert_eq!(normalize(&raw), vec![OrderLine::new(P1, 2, 7.0)]);
}

#[test]
fn test_native_list_decodes_binary_product_id() {
    let raw = RawProducts::List(vec![Bson::Document(doc! {
        "productId": codec::encode(P1).unwrap(),
        "quantity": 1,
        "priceAtPurchase": 2.0,
    })]);
    assert_eq!(normalize(&raw), vec![OrderLine::new(P1, 1, 2.0)]);
}

#[test]
fn test_native_list_skips_unusable_elements() {
    let raw = RawProducts::List(vec![
        Bson::String("junk".into()),
        Bson::Document(doc! { "quantity": 4 }),
        Bson::Document(doc! { "productId": P1 }),
    ]);
    assert_eq!(normalize(&raw), vec![OrderLine::new(P1, 0, 0.0)]);
}

#[test]
fn test_invalid_legacy_string_degrades_to_empty() {
    for text in ["", "not json", "[{'productId': ", "{'productId': 'x'}", "42", "null"] {
        let raw = RawProducts::Legacy(text.to_string());
        assert!(normalize(&raw).is_empty(), "expected empty for {text:?}");
    }
}

#[test]
fn test_try_normalize_reports_reason() {
    assert!(matches!(
        try_normalize(&RawProducts::Legacy("{}".into())),
        Err(MalformedProductList::NotAList)
    ));
    assert!(matches!(
        try_normalize(&RawProducts::Legacy("[".into())),
        Err(MalformedProductList::Syntax(_))
    ));
    assert!(matches!(
        try_normalize(&RawProducts::Absent),
        Err(MalformedProductList::Absent)
    ));
    assert!(matches!(
        try_normalize(&RawProducts::Unsupported(Bson::Int32(5))),
        Err(MalformedProductList::UnsupportedType(_))
    ));
}

#[test]
fn test_absent_and_unsupported_degrade_to_empty() {
    assert!(normalize(&RawProducts::Absent).is_empty());
    assert!(normalize(&RawProducts::Unsupported(Bson::Boolean(true))).is_empty());
}

#[test]
fn test_from_bson_classifies_field() {
    assert_eq!(RawProducts::from_bson(None), RawProducts::Absent);
    assert_eq!(RawProducts::from_bson(Some(&Bson::Null)), RawProducts::Absent);
    assert_eq!(
        RawProducts::from_bson(Some(&Bson::String("[]".into()))),
        RawProducts::Legacy("[]".into())
    );
    assert_eq!(
        RawProducts::from_bson(Some(&Bson::Array(vec![]))),
        RawProducts::List(vec![])
    );
}

#[test]
fn test_to_legacy_string_uses_single_quotes() {
    let text = to_legacy_string(&[OrderLine::new("P1", 2, 10.0)]).unwrap();
    assert_eq!(text, "[{'productId':'P1','quantity':2,'priceAtPurchase':10.0}]");
}

fn arb_line() -> impl Strategy<Value = OrderLine> {
    ("[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}", 1i64..1000, 0u32..100_000)
        .prop_map(|(id, qty, cents)| OrderLine::new(id, qty, f64::from(cents) / 100.0))
}

proptest! {
    #[test]
    fn prop_legacy_form_is_idempotent(lines in proptest::collection::vec(arb_line(), 0..8)) {
        let first = normalize(&RawProducts::from_lines(&lines));
        let legacy = RawProducts::Legacy(to_legacy_string(&first).unwrap());
        prop_assert_eq!(normalize(&legacy), first);
    }

    #[test]
    fn prop_never_panics_on_arbitrary_strings(text in ".*") {
        let _ = normalize(&RawProducts::Legacy(text));
    }
}
