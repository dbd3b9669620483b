//! Tests for the fulfillment address record lifecycle.

use super::*;
use chrono::{Duration, DurationRound, TimeZone};
use rstest::{fixture, rstest};
use serde_json::json;

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, hour, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

#[fixture]
fn fields() -> AddressFields {
    AddressFields {
        fulfillment_id: Some("ful_01".to_owned()),
        first_name: Some("Ada".to_owned()),
        last_name: Some("Lovelace".to_owned()),
        address_1: Some("12 Marylebone Road".to_owned()),
        city: Some("London".to_owned()),
        country_code: Some("gb".to_owned()),
        postal_code: Some("NW1 5LR".to_owned()),
        ..AddressFields::default()
    }
}

#[fixture]
fn address(fields: AddressFields) -> FulfillmentAddress {
    FulfillmentAddress::new(fields, at(9))
}

#[rstest]
fn default_fields_are_all_absent() {
    let empty = AddressFields::default();
    assert!(empty.fulfillment_id.is_none());
    assert!(empty.company.is_none());
    assert!(empty.phone.is_none());
    assert!(empty.metadata.is_none());
}

#[rstest]
fn new_address_is_live_with_prefixed_id(address: FulfillmentAddress) {
    assert!(address.id().as_str().starts_with("fuladdr_"));
    assert!(address.is_live());
    assert!(address.deleted_at().is_none());
    assert_eq!(address.created_at(), at(9));
    assert_eq!(address.updated_at(), at(9));
}

#[rstest]
fn new_addresses_receive_distinct_ids(fields: AddressFields) {
    let first = FulfillmentAddress::new(fields.clone(), at(9));
    let second = FulfillmentAddress::new(fields, at(9));
    assert_ne!(first.id(), second.id());
}

#[rstest]
#[case(None)]
#[case(Some(""))]
fn rehydrate_generates_missing_id(#[case] raw_id: Option<&str>, fields: AddressFields) {
    let address = FulfillmentAddress::rehydrate(raw_id, fields, AddressTimestamps::created(at(9)))
        .expect("generated id is valid");
    assert!(address.id().as_str().starts_with("fuladdr_"));
}

#[rstest]
fn rehydrate_keeps_existing_id(address: FulfillmentAddress) {
    let again = FulfillmentAddress::rehydrate(
        Some(address.id().as_str()),
        address.fields().clone(),
        address.timestamps(),
    )
    .expect("existing id is valid");
    let twice = FulfillmentAddress::rehydrate(
        Some(again.id().as_str()),
        again.fields().clone(),
        again.timestamps(),
    )
    .expect("existing id is valid");

    assert_eq!(again, address);
    assert_eq!(twice.id(), address.id());
}

#[rstest]
fn rehydrate_rejects_foreign_id(fields: AddressFields) {
    let result =
        FulfillmentAddress::rehydrate(Some("addr_1"), fields, AddressTimestamps::created(at(9)));
    assert_eq!(result, Err(FulfillmentAddressIdError::MissingPrefix));
}

#[rstest]
fn rehydrate_clamps_updated_at(fields: AddressFields) {
    let timestamps = AddressTimestamps {
        created_at: at(10),
        updated_at: at(8),
        deleted_at: None,
    };
    let address = FulfillmentAddress::rehydrate(None, fields, timestamps).expect("valid");
    assert_eq!(address.updated_at(), at(10));
}

#[rstest]
fn apply_sets_and_clears_fields_and_refreshes_updated_at(mut address: FulfillmentAddress) {
    let original_id = address.id().clone();
    let patch = AddressPatch {
        city: FieldUpdate::Set("Leeds".to_owned()),
        postal_code: FieldUpdate::Clear,
        company: FieldUpdate::from_option(Some("Analytical Engines".to_owned())),
        ..AddressPatch::default()
    };

    address.apply(patch, at(11));

    assert_eq!(address.fields().city.as_deref(), Some("Leeds"));
    assert!(address.fields().postal_code.is_none());
    assert_eq!(address.fields().company.as_deref(), Some("Analytical Engines"));
    assert_eq!(address.fields().first_name.as_deref(), Some("Ada"));
    assert_eq!(address.updated_at(), at(11));
    assert_eq!(address.created_at(), at(9));
    assert_eq!(address.id(), &original_id);
}

#[rstest]
fn every_update_moves_updated_at(mut address: FulfillmentAddress) {
    let mut previous = address.updated_at();
    for step in 1..=3 {
        let now = at(9) + Duration::minutes(step);
        address.apply(AddressPatch::default(), now);
        assert!(address.updated_at() > previous);
        previous = address.updated_at();
    }
    assert_eq!(address.created_at(), at(9));
}

#[rstest]
fn apply_never_moves_updated_at_before_created_at(mut address: FulfillmentAddress) {
    address.apply(AddressPatch::default(), at(3));
    assert_eq!(address.updated_at(), address.created_at());
}

#[rstest]
fn metadata_patch_replaces_whole_bag(mut address: FulfillmentAddress) {
    let mut bag = AddressMetadata::new();
    bag.insert("gate_code".to_owned(), json!("4411"));
    bag.insert("floors".to_owned(), json!([1, 2]));

    address.apply(
        AddressPatch {
            metadata: FieldUpdate::Set(bag.clone()),
            ..AddressPatch::default()
        },
        at(10),
    );

    assert_eq!(address.fields().metadata.as_ref(), Some(&bag));
}

#[rstest]
fn empty_patch_reports_empty() {
    assert!(AddressPatch::default().is_empty());
    let patch = AddressPatch {
        phone: FieldUpdate::Clear,
        ..AddressPatch::default()
    };
    assert!(!patch.is_empty());
}

#[rstest]
fn soft_delete_is_idempotent(mut address: FulfillmentAddress) {
    assert!(address.soft_delete(at(12)));
    assert!(!address.soft_delete(at(13)));

    assert_eq!(address.deleted_at(), Some(at(12)));
    assert_eq!(address.updated_at(), at(12));
    assert!(!address.is_live());
}

#[rstest]
fn restore_clears_deletion_and_refreshes_updated_at(mut address: FulfillmentAddress) {
    assert!(!address.restore(at(11)));
    assert_eq!(address.updated_at(), at(9));
    address.soft_delete(at(12));

    assert!(address.restore(at(14)));
    assert!(address.is_live());
    assert_eq!(address.updated_at(), at(14));
    assert_eq!(address.created_at(), at(9));
}

#[rstest]
fn sub_microsecond_clock_readings_are_truncated(fields: AddressFields) {
    let reading = at(9) + Duration::nanoseconds(123_456_789);
    let mut address = FulfillmentAddress::new(fields, reading);

    let micros = at(9) + Duration::microseconds(123_456);
    assert_eq!(address.created_at(), micros);
    assert_eq!(address.updated_at(), micros);

    address.soft_delete(reading + Duration::nanoseconds(999));
    assert_eq!(address.deleted_at(), Some(micros + Duration::microseconds(1)));
    assert_eq!(address.updated_at(), micros + Duration::microseconds(1));
}

#[rstest]
fn record_survives_storage_precision_round_trip(fields: AddressFields) {
    let reading = at(9) + Duration::nanoseconds(123_456_789);
    let created = FulfillmentAddress::new(fields, reading);
    let to_column = |instant: DateTime<Utc>| {
        instant
            .duration_trunc(Duration::microseconds(1))
            .expect("truncates")
    };
    let as_stored = AddressTimestamps {
        created_at: to_column(reading),
        updated_at: to_column(reading),
        deleted_at: None,
    };

    let reread = FulfillmentAddress::rehydrate(
        Some(created.id().as_str()),
        created.fields().clone(),
        as_stored,
    )
    .expect("valid id");

    assert_eq!(reread, created);
}

#[rstest]
fn stored_instant_keeps_whole_microseconds() {
    let exact = at(9) + Duration::microseconds(42);
    assert_eq!(stored_instant(exact), exact);
    assert_eq!(stored_instant(exact + Duration::nanoseconds(999)), exact);
}

#[rstest]
fn serde_round_trip_preserves_every_column(mut address: FulfillmentAddress) {
    let mut bag = AddressMetadata::new();
    bag.insert("note".to_owned(), json!("leave with neighbour"));
    address.apply(
        AddressPatch {
            metadata: FieldUpdate::Set(bag),
            ..AddressPatch::default()
        },
        at(10),
    );
    address.soft_delete(at(11));

    let json = serde_json::to_value(&address).expect("serialises");
    let back: FulfillmentAddress = serde_json::from_value(json).expect("deserialises");

    assert_eq!(back, address);
}

#[rstest]
fn serialises_columns_with_snake_case_names(address: FulfillmentAddress) {
    let value = serde_json::to_value(&address).expect("serialises");

    assert_eq!(value["id"], json!(address.id().as_str()));
    assert_eq!(value["fulfillment_id"], json!("ful_01"));
    assert_eq!(value["address_1"], json!("12 Marylebone Road"));
    assert_eq!(value["company"], json!(null));
    assert_eq!(value["deleted_at"], json!(null));
}

#[rstest]
fn deserialising_without_id_assigns_one() {
    let payload = json!({
        "city": "York",
        "created_at": "2026-03-02T09:00:00Z",
        "updated_at": "2026-03-02T09:00:00Z",
    });

    let address: FulfillmentAddress = serde_json::from_value(payload).expect("deserialises");

    assert!(address.id().as_str().starts_with("fuladdr_"));
    assert_eq!(address.fields().city.as_deref(), Some("York"));
    assert!(address.is_live());
}

#[rstest]
fn deserialising_rejects_invalid_id() {
    let payload = json!({
        "id": "addr_1",
        "created_at": "2026-03-02T09:00:00Z",
        "updated_at": "2026-03-02T09:00:00Z",
    });

    let result: Result<FulfillmentAddress, _> = serde_json::from_value(payload);
    assert!(result.is_err());
}
