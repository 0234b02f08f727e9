use mis_ingest::{CoercionOptions, sample_dataset};
use mis_map::{ColumnMapper, ColumnMapping, MappingDocument, MatcherConfig, project};
use mis_model::{CanonicalField, CellValue};
use proptest::prelude::*;
use tempfile::TempDir;

#[test]
fn sample_headers_map_without_warnings() {
    let raw = sample_dataset().expect("sample");
    let outcome = ColumnMapper::default().suggest(&raw.headers);
    let expected = [
        (CanonicalField::Date, "Date"),
        (CanonicalField::Segment, "Customer Segment"),
        (CanonicalField::Region, "Region"),
        (CanonicalField::Channel, "Sales Channel"),
        (CanonicalField::Product, "SKU"),
        (CanonicalField::Orders, "Order Count"),
        (CanonicalField::Gmv, "Gross Sales"),
        (CanonicalField::Revenue, "Net Sales"),
        (CanonicalField::Cost, "COGS"),
        (CanonicalField::Units, "Qty"),
        (CanonicalField::Customers, "Unique Customers"),
    ];
    for (field, column) in expected {
        assert_eq!(outcome.mapping.source_for(field), Some(column), "{field}");
    }
    assert!(!outcome.mapping.is_mapped(CanonicalField::Week));
    assert!(!outcome.mapping.is_mapped(CanonicalField::Month));
    assert!(outcome.warnings.is_empty());
}

#[test]
fn document_round_trip_through_a_file() {
    let raw = sample_dataset().expect("sample");
    let mapper = ColumnMapper::default();
    let mut mapping = mapper.suggest(&raw.headers).mapping;
    mapping.set_manual(CanonicalField::Gmv, None);

    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("mapping.json");
    MappingDocument::from_mapping(&mapping)
        .save(&path)
        .expect("save");
    let restored = MappingDocument::load(&path).expect("load").restore(&raw.headers);

    assert!(restored.warnings.is_empty());
    assert_eq!(restored.mapping.sources(), mapping.sources());
    // The explicit "unmapped" survives a refresh after restore.
    let refreshed = mapper.refresh(&restored.mapping, &raw.headers).mapping;
    assert_eq!(refreshed.source_for(CanonicalField::Gmv), None);
}

#[test]
fn saved_document_is_pretty_json_with_nulls() {
    let mut mapping = ColumnMapping::new();
    mapping.set_manual(CanonicalField::Revenue, Some("Net Sales".into()));
    let json = MappingDocument::from_mapping(&mapping).to_json().expect("json");
    assert!(json.contains("\"revenue\": \"Net Sales\""));
    assert!(json.contains("\"cost\": null"));
    assert!(json.starts_with("{\n  \"version\": 1,"));
}

#[test]
fn projection_coerces_sample_cells() {
    let raw = sample_dataset().expect("sample");
    let mapping = ColumnMapper::default().suggest(&raw.headers).mapping;
    let mapped = project(&raw, &mapping, &CoercionOptions::default());
    assert_eq!(mapped.len(), raw.row_count());
    let first = &mapped.rows[0];
    assert!(matches!(
        mapped.get(first, CanonicalField::Date),
        Some(CellValue::Date(_))
    ));
    assert_eq!(
        mapped.get(first, CanonicalField::Revenue),
        Some(&CellValue::Number(2380.0))
    );
    for field in &mapped.fields {
        assert_eq!(mapped.coercion_failures(*field), 0, "{field}");
    }
}

#[test]
fn projection_is_repeatable() {
    let raw = sample_dataset().expect("sample");
    let mapper = ColumnMapper::default();
    let options = CoercionOptions::default();
    let first = project(&raw, &mapper.suggest(&raw.headers).mapping, &options);
    let second = project(&raw, &mapper.suggest(&raw.headers).mapping, &options);
    assert_eq!(first, second);
    assert_eq!(first.dataset_id, raw.id);
}

/// Unique headers in random order, as a loaded dataset guarantees.
fn header_strategy() -> impl Strategy<Value = Vec<String>> {
    let words = vec![
        "Date", "Week", "Month", "Segment", "Region", "Zone", "Channel", "SKU", "Item", "Orders",
        "Qty", "Net Sales", "Gross Sales", "Sales", "COGS", "Cost", "Customers", "Notes",
        "Revenu", "period",
    ];
    prop::sample::subsequence(words, 0..10)
        .prop_shuffle()
        .prop_map(|picked| picked.into_iter().map(str::to_string).collect())
}

proptest! {
    #[test]
    fn suggestion_is_deterministic_and_one_to_one(headers in header_strategy()) {
        let mapper = ColumnMapper::new(MatcherConfig::default());
        let first = mapper.suggest(&headers);
        let second = mapper.suggest(&headers);
        prop_assert_eq!(&first, &second);

        let sources: Vec<&str> = first
            .mapping
            .mapped_fields()
            .into_iter()
            .filter_map(|field| first.mapping.source_for(field))
            .collect();
        let mut unique = sources.clone();
        unique.sort_unstable();
        unique.dedup();
        prop_assert_eq!(unique.len(), sources.len());
    }

    #[test]
    fn refresh_never_moves_manual_bindings(headers in header_strategy(), pick in 0usize..10) {
        prop_assume!(!headers.is_empty());
        let mapper = ColumnMapper::default();
        let column = headers[pick % headers.len()].clone();
        let mut mapping = mapper.suggest(&headers).mapping;
        mapping.set_manual(CanonicalField::Customers, Some(column.clone()));
        let refreshed = mapper.refresh(&mapping, &headers).mapping;
        prop_assert_eq!(refreshed.source_for(CanonicalField::Customers), Some(column.as_str()));
        prop_assert_eq!(refreshed.field_for_source(&column), Some(CanonicalField::Customers));
    }
}
