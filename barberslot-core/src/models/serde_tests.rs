//! Serde tests for the wire types.
//!
//! These tests pin the JSON shapes exchanged with the booking API.

use serde_json::json;

use crate::{AvailabilityItem, CalendarDate, DayAvailability, PickerDisplay, Platform, Provider};

// ============================================================================
// Provider Serde Tests
// ============================================================================

#[test]
fn test_provider_deserialize_api_shape() {
    let value = json!({
        "id": "7b1d",
        "name": "Diego Fernandes",
        "avatar_url": "https://cdn.example.com/diego.png"
    });
    let provider: Provider = serde_json::from_value(value).unwrap();

    assert_eq!(provider.id, "7b1d");
    assert_eq!(provider.name, "Diego Fernandes");
    assert!(provider.has_avatar());
}

#[test]
fn test_provider_null_avatar_reads_as_empty() {
    let value = json!({ "id": "1", "name": "Ana", "avatar_url": null });
    let provider: Provider = serde_json::from_value(value).unwrap();
    assert_eq!(provider.avatar_url, "");
    assert!(!provider.has_avatar());
}

#[test]
fn test_provider_missing_avatar_reads_as_empty() {
    let value = json!({ "id": "1", "name": "Ana" });
    let provider: Provider = serde_json::from_value(value).unwrap();
    assert!(!provider.has_avatar());
}

#[test]
fn test_provider_extra_fields_ignored() {
    let value = json!({
        "id": "1",
        "name": "Ana",
        "avatar_url": "",
        "email": "ana@example.com",
        "created_at": "2024-05-01T10:00:00Z"
    });
    let provider: Provider = serde_json::from_value(value).unwrap();
    assert_eq!(provider.id, "1");
}

#[test]
fn test_provider_list_preserves_server_order() {
    let value = json!([
        { "id": "z", "name": "Zeca" },
        { "id": "a", "name": "Ana" },
        { "id": "m", "name": "Marta" }
    ]);
    let providers: Vec<Provider> = serde_json::from_value(value).unwrap();
    let ids: Vec<&str> = providers.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["z", "a", "m"]);
}

// ============================================================================
// Availability Serde Tests
// ============================================================================

#[test]
fn test_availability_deserialize_api_shape() {
    let value = json!([
        { "hour": 8, "available": false },
        { "hour": 9, "available": true }
    ]);
    let items: Vec<AvailabilityItem> = serde_json::from_value(value).unwrap();
    assert_eq!(
        items,
        vec![AvailabilityItem::new(8, false), AvailabilityItem::new(9, true)]
    );
}

#[test]
fn test_day_availability_is_a_bare_array() {
    let day = DayAvailability::from_items(vec![AvailabilityItem::new(10, true)]).unwrap();
    let json = serde_json::to_value(&day).unwrap();
    assert_eq!(json, json!([{ "hour": 10, "available": true }]));
}

#[test]
fn test_availability_negative_hour_rejected() {
    let result: Result<AvailabilityItem, _> =
        serde_json::from_value(json!({ "hour": -1, "available": true }));
    assert!(result.is_err());
}

// ============================================================================
// Calendar / Platform Serde Tests
// ============================================================================

#[test]
fn test_calendar_date_serializes_as_components() {
    let date = CalendarDate::new(2024, 5, 10).unwrap();
    assert_eq!(
        serde_json::to_value(date).unwrap(),
        json!({ "year": 2024, "month": 5, "day": 10 })
    );
}

#[test]
fn test_platform_serializes_as_string() {
    assert_eq!(serde_json::to_value(Platform::ios()).unwrap(), json!("ios"));
}

#[test]
fn test_picker_display_lowercase() {
    assert_eq!(
        serde_json::to_value(PickerDisplay::Spinner).unwrap(),
        json!("spinner")
    );
}
