//! Tests for generation tokens and pending-fetch bookkeeping.

use booking_engine::refresh::{Generations, PendingRefresh, Settlement};
use booking_engine::Window;

fn window() -> Window {
    Window::parse("2019-01-01", "2019-01-14").unwrap()
}

// ── Generations ─────────────────────────────────────────────────────────────

#[test]
fn only_latest_generation_is_current() {
    let mut generations = Generations::default();
    let first = generations.issue(window());
    let second = generations.issue(window());

    assert_eq!(first.generation(), 1);
    assert_eq!(second.generation(), 2);
    assert!(!generations.is_current(&first));
    assert!(generations.is_current(&second));
}

// ── PendingRefresh ──────────────────────────────────────────────────────────

#[test]
fn pending_ticket_settles_once() {
    let mut generations = Generations::default();
    let mut pending = PendingRefresh::default();
    let ticket = generations.issue(window());
    pending.track(ticket);

    assert_eq!(pending.settle(1), Settlement::Current(ticket));
    assert_eq!(pending.settle(1), Settlement::Superseded, "a settled ticket is not handed out twice");
}

#[test]
fn ticket_stays_pending_until_settled() {
    let mut generations = Generations::default();
    let mut pending = PendingRefresh::default();
    let ticket = generations.issue(window());
    pending.track(ticket);

    // An unrelated generation must not consume the pending ticket.
    assert_eq!(pending.settle(7), Settlement::Unknown);
    assert_eq!(pending.settle(1), Settlement::Current(ticket));
}

#[test]
fn newer_fetch_supersedes_older_ticket() {
    let mut generations = Generations::default();
    let mut pending = PendingRefresh::default();
    pending.track(generations.issue(window()));
    let second = generations.issue(window());
    pending.track(second);

    assert_eq!(pending.settle(1), Settlement::Superseded);
    assert_eq!(pending.settle(2), Settlement::Current(second));
}

#[test]
fn never_issued_generations_are_unknown() {
    let mut pending = PendingRefresh::default();
    assert_eq!(pending.settle(0), Settlement::Unknown);
    assert_eq!(pending.settle(1), Settlement::Unknown);

    pending.track(Generations::default().issue(window()));
    assert_eq!(pending.settle(0), Settlement::Unknown);
    assert_eq!(pending.settle(2), Settlement::Unknown);
}
