//! Integration tests for schedule and calendar types.

use barberslot_core::{
    AvailabilityItem, CalendarDate, CapabilityTable, DayAvailability, PickedDate, Platform,
};

#[test]
fn test_picker_selection_yields_wire_month() {
    // The picker reports May as month index 4.
    let date = CalendarDate::from_picker(PickedDate::new(2024, 4, 10)).unwrap();
    assert_eq!((date.year(), date.month(), date.day()), (2024, 5, 10));
}

#[test]
fn test_full_day_schedule() {
    let items: Vec<AvailabilityItem> = (0..24)
        .map(|hour| AvailabilityItem::new(hour, hour % 2 == 0))
        .collect();
    let day = DayAvailability::from_items(items).unwrap();

    assert_eq!(day.len(), 24);
    assert_eq!(day.open_hours().len(), 12);
    assert_eq!(day.morning().count() + day.afternoon().count(), 24);
}

#[test]
fn test_capabilities_drive_dismissal() {
    let table = CapabilityTable::default();
    let dismissing: Vec<String> = table
        .platforms()
        .filter(|p| table.get(p).is_some_and(|c| c.auto_dismiss))
        .map(Platform::to_string)
        .collect();
    assert_eq!(dismissing, vec!["android".to_string()]);
}
