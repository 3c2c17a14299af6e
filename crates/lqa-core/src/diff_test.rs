use serde_json::json;

use super::{diff, FieldChange};
use crate::record::{Record, StockStatus};

fn snapshot_of(record: &Record) -> serde_json::Value {
    serde_json::to_value(record).unwrap()
}

// ---------------------------------------------------------------------------
// Basic detection
// ---------------------------------------------------------------------------

#[test]
fn identical_records_produce_empty_diff() {
    let record = Record {
        display_price: "19.99".to_string(),
        brand: "ACME".to_string(),
        ..Record::default()
    };
    let changes = diff(&snapshot_of(&record), &record).unwrap();
    assert!(changes.is_empty(), "diff(A, A) must be empty: {changes:?}");
}

#[test]
fn price_change_yields_exactly_one_entry() {
    let prior = Record {
        display_price: "19.99".to_string(),
        stock_status: StockStatus::InStock,
        ..Record::default()
    };
    let current = Record {
        display_price: "24.99".to_string(),
        stock_status: StockStatus::InStock,
        ..Record::default()
    };

    let changes = diff(&snapshot_of(&prior), &current).unwrap();
    assert_eq!(
        changes,
        vec![FieldChange {
            field: "display_price",
            prior: "19.99".to_string(),
            current: "24.99".to_string(),
        }]
    );
}

#[test]
fn detection_is_symmetric_with_swapped_direction() {
    let a = Record {
        display_price: "19.99".to_string(),
        bsr: "#12 in Kitchen".to_string(),
        ..Record::default()
    };
    let b = Record {
        display_price: "24.99".to_string(),
        bsr: "#15 in Kitchen".to_string(),
        ..Record::default()
    };

    let forward = diff(&snapshot_of(&a), &b).unwrap();
    let backward = diff(&snapshot_of(&b), &a).unwrap();

    let fields = |changes: &[FieldChange]| changes.iter().map(|c| c.field).collect::<Vec<_>>();
    assert_eq!(fields(&forward), fields(&backward));
    for (f, r) in forward.iter().zip(&backward) {
        assert_eq!(f.prior, r.current);
        assert_eq!(f.current, r.prior);
    }
}

#[test]
fn output_order_follows_registry_order() {
    let prior = Record::default();
    let current = Record {
        videos: vec![crate::record::Video {
            title: None,
            url: "https://www.amazon.com/vdp/abc".to_string(),
            duration_seconds: None,
            language_code: None,
        }],
        brand: "ACME".to_string(),
        display_price: "9.99".to_string(),
        ..Record::default()
    };

    let changes = diff(&snapshot_of(&prior), &current).unwrap();
    let fields: Vec<&str> = changes.iter().map(|c| c.field).collect();
    // brand and display_price precede videos in the registry.
    assert_eq!(fields, vec!["brand", "display_price", "videos"]);
}

// ---------------------------------------------------------------------------
// Exclusions
// ---------------------------------------------------------------------------

#[test]
fn identifier_fields_never_appear() {
    let prior = Record {
        url: "https://www.amazon.com/dp/OLD?tag=x".to_string(),
        media_asin: "B000OLD000".to_string(),
        ..Record::default()
    };
    let current = Record {
        url: "https://www.amazon.de/dp/NEW".to_string(),
        media_asin: "B000NEW000".to_string(),
        ..Record::default()
    };

    let changes = diff(&snapshot_of(&prior), &current).unwrap();
    // marketplace will differ only if set; here both are "none", so the
    // identifier drift alone must produce nothing.
    assert!(changes.is_empty(), "{changes:?}");
}

#[test]
fn derived_fields_never_appear() {
    let prior = Record::default();
    let current = Record {
        rating_value: 4.5,
        review_count: 120,
        bullet_count: 5,
        description_length: 900,
        ..Record::default()
    };

    let changes = diff(&snapshot_of(&prior), &current).unwrap();
    assert!(changes.is_empty(), "parsed/derived forms must be skipped: {changes:?}");
}

// ---------------------------------------------------------------------------
// Prior storage shapes
// ---------------------------------------------------------------------------

#[test]
fn nested_attributes_shape_is_accepted() {
    let prior = json!({
        "url": "https://www.amazon.com/dp/B000TEST00",
        "attributes": {
            "display_price": "19.99",
            "brand": "ACME"
        }
    });
    let current = Record {
        display_price: "24.99".to_string(),
        brand: "ACME".to_string(),
        ..Record::default()
    };

    let changes = diff(&prior, &current).unwrap();
    let price = changes.iter().find(|c| c.field == "display_price").unwrap();
    assert_eq!(price.prior, "19.99");
    assert_eq!(price.current, "24.99");
    assert!(!changes.iter().any(|c| c.field == "brand"));
}

#[test]
fn flat_location_wins_over_nested() {
    let prior = json!({
        "display_price": "10.00",
        "attributes": { "display_price": "99.99" }
    });
    let current = Record {
        display_price: "10.00".to_string(),
        ..Record::default()
    };

    let changes = diff(&prior, &current).unwrap();
    assert!(!changes.iter().any(|c| c.field == "display_price"));
}

#[test]
fn malformed_prior_is_rejected() {
    let err = diff(&json!([1, 2, 3]), &Record::default()).unwrap_err();
    assert!(err.to_string().contains("array"));
}

// ---------------------------------------------------------------------------
// Normalization semantics
// ---------------------------------------------------------------------------

#[test]
fn missing_null_and_empty_all_normalize_to_none() {
    let prior = json!({
        "brand": null,
        "sold_by": "   ",
        // bsr absent entirely
    });
    let changes = diff(&prior, &Record::default()).unwrap();
    assert!(changes.is_empty(), "{changes:?}");
}

#[test]
fn literal_string_comparison_flags_format_drift() {
    // Known sharp edge: "4.5" vs "4.50" is a reported change.
    let prior = json!({ "rating_raw": "4.5 out of 5 stars" });
    let current = Record {
        rating_raw: "4.50 out of 5 stars".to_string(),
        ..Record::default()
    };
    let changes = diff(&prior, &current).unwrap();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].field, "rating_raw");
}

#[test]
fn change_renders_human_readable() {
    let change = FieldChange {
        field: "display_price",
        prior: "19.99".to_string(),
        current: "24.99".to_string(),
    };
    assert_eq!(change.to_string(), "Display Price: 19.99 -> 24.99");
}
