//! Tests for hour/slot conversion and date helpers.

use booking_engine::slot::{
    add_days, date_to_str, hour_to_slot, parse_date, slot_to_hour, slots_between, SlotSpan, TimeSlot,
};
use booking_engine::BookingError;
use chrono::NaiveDate;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ── hour_to_slot ────────────────────────────────────────────────────────────

#[test]
fn whole_hour_parses_to_whole_slot() {
    let slot = hour_to_slot("14:00").unwrap();
    assert_eq!(slot.as_hours(), 14.0);
    assert_eq!(slot.half_hours(), 28);
}

#[test]
fn half_hour_parses_to_half_slot() {
    assert_eq!(hour_to_slot("14:30").unwrap().as_hours(), 14.5);
    assert_eq!(hour_to_slot("9:30").unwrap().as_hours(), 9.5);
}

#[test]
fn zero_padded_hours_are_rejected() {
    for padded in ["09:30", "00:00", "07:00"] {
        assert!(
            matches!(hour_to_slot(padded), Err(BookingError::Format(_))),
            "expected format error for {:?}",
            padded
        );
    }
}

#[test]
fn midnight_and_end_of_day_are_accepted() {
    assert_eq!(hour_to_slot("0:00").unwrap(), TimeSlot::MIDNIGHT);
    assert_eq!(hour_to_slot("24:00").unwrap(), TimeSlot::END_OF_DAY);
}

#[test]
fn malformed_hours_are_format_errors() {
    for bad in ["", "14", "14:", ":30", "14:3", "14:300", "ab:cd", "14-30", "123:00", " 14:00", "-1:00"] {
        let result = hour_to_slot(bad);
        assert!(
            matches!(result, Err(BookingError::Format(_))),
            "expected format error for {:?}, got {:?}",
            bad,
            result
        );
    }
}

#[test]
fn unaligned_minutes_are_rejected() {
    assert!(matches!(hour_to_slot("14:15"), Err(BookingError::Format(_))));
    assert!(matches!(hour_to_slot("14:45"), Err(BookingError::Format(_))));
}

#[test]
fn hours_past_end_of_day_are_rejected() {
    assert!(matches!(hour_to_slot("24:30"), Err(BookingError::Format(_))));
    assert!(matches!(hour_to_slot("25:00"), Err(BookingError::Format(_))));
}

// ── slot_to_hour ────────────────────────────────────────────────────────────

#[test]
fn slot_renders_with_unpadded_hour() {
    assert_eq!(slot_to_hour(TimeSlot::from_half_hours(19)), "9:30");
    assert_eq!(slot_to_hour(TimeSlot::from_half_hours(24)), "12:00");
    assert_eq!(slot_to_hour(TimeSlot::END_OF_DAY), "24:00");
}

#[test]
fn accepted_strings_round_trip() {
    for s in ["0:00", "0:30", "9:00", "12:00", "12:30", "18:30", "23:30", "24:00"] {
        assert_eq!(slot_to_hour(hour_to_slot(s).unwrap()), s);
    }
}

// ── numeric hours and spans ─────────────────────────────────────────────────

#[test]
fn numeric_hours_must_be_half_hour_multiples() {
    assert_eq!(TimeSlot::from_hours(18.5).unwrap(), hour_to_slot("18:30").unwrap());
    assert!(TimeSlot::from_hours(18.25).is_err());
    assert!(TimeSlot::from_hours(-1.0).is_err());
    assert!(TimeSlot::from_hours(f64::NAN).is_err());
}

#[test]
fn span_from_hours() {
    assert_eq!(SlotSpan::from_hours(1.0).unwrap().half_hours(), 2);
    assert_eq!(SlotSpan::from_hours(1.5).unwrap().half_hours(), 3);
    assert!(SlotSpan::from_hours(0.0).unwrap().is_zero());
    assert!(SlotSpan::from_hours(0.75).is_err());
    assert!(SlotSpan::from_hours(25.0).is_err());
}

#[test]
fn slot_through_span_covers_half_open_range() {
    let start = hour_to_slot("18:00").unwrap();
    let slots: Vec<String> = start
        .through(SlotSpan::from_hours(1.5).unwrap())
        .map(slot_to_hour)
        .collect();
    assert_eq!(slots, vec!["18:00", "18:30", "19:00"]);
}

#[test]
fn slots_between_open_and_close() {
    let open = hour_to_slot("12:00").unwrap();
    let close = hour_to_slot("24:00").unwrap();
    assert_eq!(slots_between(open, close).count(), 24);
    assert_eq!(slots_between(close, open).count(), 0);
}

#[test]
fn slot_serializes_as_hour_string() {
    let slot = hour_to_slot("12:30").unwrap();
    assert_eq!(serde_json::to_string(&slot).unwrap(), r#""12:30""#);
    let back: TimeSlot = serde_json::from_str(r#""12:30""#).unwrap();
    assert_eq!(back, slot);
    let numeric: TimeSlot = serde_json::from_str("12.5").unwrap();
    assert_eq!(numeric, slot);
}

#[test]
fn span_serializes_as_hours() {
    assert_eq!(serde_json::to_string(&SlotSpan::from_half_hours(2)).unwrap(), "1");
    assert_eq!(serde_json::to_string(&SlotSpan::from_half_hours(3)).unwrap(), "1.5");
}

// ── dates ───────────────────────────────────────────────────────────────────

#[test]
fn date_string_round_trip() {
    let d = parse_date("2019-01-02").unwrap();
    assert_eq!(d, date(2019, 1, 2));
    assert_eq!(date_to_str(d), "2019-01-02");
}

#[test]
fn malformed_dates_are_format_errors() {
    for bad in ["2019-13-01", "2019-02-30", "01/02/2019", "", "2019-1"] {
        assert!(matches!(parse_date(bad), Err(BookingError::Format(_))), "{:?}", bad);
    }
}

#[test]
fn add_days_crosses_month_and_year() {
    assert_eq!(add_days(date(2019, 1, 31), 1), date(2019, 2, 1));
    assert_eq!(add_days(date(2018, 12, 31), 1), date(2019, 1, 1));
    assert_eq!(add_days(date(2019, 1, 1), 14), date(2019, 1, 15));
    assert_eq!(add_days(date(2019, 1, 1), -1), date(2018, 12, 31));
}

#[test]
fn add_days_saturates() {
    assert_eq!(add_days(NaiveDate::MAX, 1), NaiveDate::MAX);
    assert_eq!(add_days(NaiveDate::MIN, -1), NaiveDate::MIN);
}
