//! Tests for record deserialization and snapshot loading.

use booking_engine::records::{BookingRecord, DataSnapshot, EventRecord, Repeat, TableId};
use booking_engine::slot::{hour_to_slot, parse_date, SlotSpan};
use booking_engine::BookingError;
use serde_json::json;

#[test]
fn booking_record_from_data_source_json() {
    let record: BookingRecord = serde_json::from_value(json!({
        "id": 7,
        "date": "2019-01-02",
        "hour": "12:30",
        "duration": 1.5,
        "table": 2,
        "ppl": 4,
        "starters": ["water"]
    }))
    .unwrap();

    assert_eq!(record.date, parse_date("2019-01-02").unwrap());
    assert_eq!(record.hour, hour_to_slot("12:30").unwrap());
    assert_eq!(record.duration, SlotSpan::from_half_hours(3));
    assert_eq!(record.table, TableId(2));
}

#[test]
fn table_id_resolves_numeric_strings() {
    let id: TableId = serde_json::from_value(json!("3")).unwrap();
    assert_eq!(id, TableId(3));
    let id: TableId = serde_json::from_value(json!(3)).unwrap();
    assert_eq!(id, TableId(3));
}

#[test]
fn table_id_rejects_non_numeric_values() {
    assert!(serde_json::from_value::<TableId>(json!("window")).is_err());
    assert!(serde_json::from_value::<TableId>(json!(-1)).is_err());
    assert!(serde_json::from_value::<TableId>(json!(null)).is_err());
    assert!(matches!("x1".parse::<TableId>(), Err(BookingError::Format(_))));
}

#[test]
fn repeat_accepts_false_daily_or_absent() {
    let one_off: EventRecord = serde_json::from_value(json!({
        "date": "2019-01-01", "hour": "12:00", "duration": 1, "table": 1, "repeat": false
    }))
    .unwrap();
    assert_eq!(one_off.repeat, Repeat::None);

    let absent: EventRecord = serde_json::from_value(json!({
        "date": "2019-01-01", "hour": "12:00", "duration": 1, "table": 1
    }))
    .unwrap();
    assert_eq!(absent.repeat, Repeat::None);

    let daily: EventRecord = serde_json::from_value(json!({
        "date": "2019-01-01", "hour": "12:00", "duration": 1, "table": 1, "repeat": "daily"
    }))
    .unwrap();
    assert_eq!(daily.repeat, Repeat::Daily);
}

#[test]
fn null_repeat_means_no_recurrence() {
    let event: EventRecord = serde_json::from_value(json!({
        "date": "2019-01-02", "hour": "19:00", "duration": 1, "table": 2, "repeat": null
    }))
    .unwrap();
    assert_eq!(event.repeat, Repeat::None);

    let snapshot = DataSnapshot::from_json(
        r#"{
            "eventsCurrent": [{"date": "2019-01-02", "hour": "19:00", "duration": 1, "table": 2, "repeat": null}],
            "eventsRepeat": [{"date": "2019-01-01", "hour": "18:00", "duration": 1, "table": 3, "repeat": null}]
        }"#,
    )
    .unwrap();
    assert_eq!(snapshot.events_current.len(), 1, "null repeat must not drop a current event");
    assert_eq!(snapshot.events_repeat.len(), 1);
    assert_eq!(snapshot.events_repeat[0].repeat, Repeat::None);
}

#[test]
fn unsupported_repeat_rule_is_rejected() {
    let result = serde_json::from_value::<EventRecord>(json!({
        "date": "2019-01-01", "hour": "12:00", "duration": 1, "table": 1, "repeat": "weekly"
    }));
    assert!(result.is_err());
}

#[test]
fn repeat_serializes_back_to_wire_form() {
    assert_eq!(serde_json::to_value(Repeat::None).unwrap(), json!(false));
    assert_eq!(serde_json::to_value(Repeat::Daily).unwrap(), json!("daily"));
}

#[test]
fn snapshot_loads_all_three_lists() {
    let snapshot = DataSnapshot::from_json(
        r#"{
            "booking": [{"date": "2019-01-02", "hour": "12:00", "duration": 1, "table": 1}],
            "eventsCurrent": [{"date": "2019-01-03", "hour": "14:00", "duration": 2, "table": 2, "repeat": false}],
            "eventsRepeat": [{"date": "2019-01-01", "hour": "18:00", "duration": 1, "table": 3, "repeat": "daily"}]
        }"#,
    )
    .unwrap();

    assert_eq!(snapshot.bookings.len(), 1);
    assert_eq!(snapshot.events_current.len(), 1);
    assert_eq!(snapshot.events_repeat.len(), 1);
    assert_eq!(snapshot.events_repeat[0].repeat, Repeat::Daily);
}

#[test]
fn snapshot_skips_malformed_records_and_keeps_the_rest() {
    let snapshot = DataSnapshot::from_json(
        r#"{
            "booking": [
                {"date": "2019-01-02", "hour": "12:00", "duration": 1, "table": 1},
                {"date": "2019-13-40", "hour": "12:00", "duration": 1, "table": 1},
                {"date": "2019-01-02", "hour": "noon", "duration": 1, "table": 1},
                {"date": "2019-01-02", "hour": "12:00", "duration": 0.3, "table": 1},
                {"date": "2019-01-02", "hour": "12:00", "duration": 1, "table": "patio"},
                {"date": "2019-01-02", "hour": "13:00", "duration": 1, "table": "2"}
            ],
            "eventsRepeat": [
                {"date": "2019-01-01", "hour": "18:00", "duration": 1, "table": 3, "repeat": "weekly"}
            ]
        }"#,
    )
    .unwrap();

    let tables: Vec<u32> = snapshot.bookings.iter().map(|b| b.table.0).collect();
    assert_eq!(tables, vec![1, 2]);
    assert!(snapshot.events_current.is_empty());
    assert!(snapshot.events_repeat.is_empty());
}

#[test]
fn snapshot_with_missing_lists_is_empty() {
    let snapshot = DataSnapshot::from_json("{}").unwrap();
    assert!(snapshot.is_empty());
}

#[test]
fn snapshot_document_errors_are_format_errors() {
    assert!(matches!(DataSnapshot::from_json("not json"), Err(BookingError::Format(_))));
    assert!(matches!(DataSnapshot::from_json(r#"{"booking": 5}"#), Err(BookingError::Format(_))));
}

#[test]
fn snapshot_from_separate_response_bodies() {
    let snapshot = DataSnapshot::from_lists(
        vec![json!({"date": "2019-01-02", "hour": "12:00", "duration": 1, "table": 1})],
        vec![],
        vec![json!({"date": "2019-01-01", "hour": "18:00", "duration": 1, "table": "3", "repeat": "daily"})],
    );

    assert_eq!(snapshot.bookings.len(), 1);
    assert_eq!(snapshot.events_repeat[0].table, TableId(3));
}

#[test]
fn floor_plan_filter_keeps_only_configured_tables() {
    let snapshot = DataSnapshot {
        bookings: vec![
            BookingRecord::parse("2019-01-02", "12:00", 1.0, 1).unwrap(),
            BookingRecord::parse("2019-01-02", "12:00", 1.0, 4).unwrap(),
        ],
        events_current: vec![EventRecord::parse("2019-01-02", "19:00", 1.0, 5, Repeat::None).unwrap()],
        events_repeat: vec![EventRecord::parse("2019-01-01", "18:00", 1.0, 3, Repeat::Daily).unwrap()],
    };

    let filtered = snapshot.on_floor_plan(&[TableId(1), TableId(2), TableId(3)]);

    assert_eq!(filtered.bookings, vec![snapshot.bookings[0]]);
    assert!(filtered.events_current.is_empty());
    assert_eq!(filtered.events_repeat, snapshot.events_repeat);
}
