//! WASM bindings for booking-engine.
//!
//! Exposes the availability queries and a stateful booking widget to
//! JavaScript via `wasm-bindgen`. Complex values cross the boundary as JSON
//! strings: snapshots use the `{"booking", "eventsCurrent", "eventsRepeat"}`
//! document shape, views and payloads are serialized with serde.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p booking-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/booking-widget/wasm/ \
//!   target/wasm32-unknown-unknown/release/booking_engine_wasm.wasm
//! ```
//!
//! Fetching and posting stay in JavaScript. The widget hands out a generation
//! number from `beginRefresh` and only applies the response whose generation
//! is still current. Only the latest ticket is held; older generations report
//! `false` from `completeRefresh`.

use booking_engine::refresh::{PendingRefresh, RefreshTicket, Settlement};
use booking_engine::{
    availability_tiers, histogram, hour_to_slot, occupied_tables, parse_date, slot_to_hour, BookingError,
    BookingWidget, ContactDetails, DataSnapshot, NullRenderer, OccupancyIndex, RefreshOutcome, SlotSpan,
    SubmissionPayload, TableId, TimeSlot, WidgetConfig, Window,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn js_error(e: BookingError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn parse_window(window_start: &str, window_end: &str) -> Result<Window, JsValue> {
    Window::parse(window_start, window_end).map_err(js_error)
}

fn parse_hour(hour: &str) -> Result<TimeSlot, JsValue> {
    hour_to_slot(hour).map_err(js_error)
}

/// Parse a snapshot document and build the index for the window.
fn index_for(snapshot_json: &str, window: &Window) -> Result<OccupancyIndex, JsValue> {
    let snapshot = DataSnapshot::from_json(snapshot_json).map_err(js_error)?;
    Ok(OccupancyIndex::from_snapshot(&snapshot, window))
}

// ---------------------------------------------------------------------------
// Stateless exports
// ---------------------------------------------------------------------------

/// Convert an `H:MM` hour string into its numeric value (`"14:30"` → `14.5`).
#[wasm_bindgen(js_name = "hourToNumber")]
pub fn hour_to_number(hour: &str) -> Result<f64, JsValue> {
    Ok(parse_hour(hour)?.as_hours())
}

/// Convert a numeric hour back into `H:MM`.
#[wasm_bindgen(js_name = "numberToHour")]
pub fn number_to_hour(hours: f64) -> Result<String, JsValue> {
    TimeSlot::from_hours(hours).map(slot_to_hour).map_err(js_error)
}

/// Count occupied tables for every half hour between `open` and `close`.
///
/// Returns a JSON array of integers.
#[wasm_bindgen(js_name = "occupancyHistogram")]
pub fn occupancy_histogram(
    snapshot_json: &str,
    window_start: &str,
    window_end: &str,
    date: &str,
    open: &str,
    close: &str,
) -> Result<String, JsValue> {
    let window = parse_window(window_start, window_end)?;
    let index = index_for(snapshot_json, &window)?;
    let date = parse_date(date).map_err(js_error)?;

    to_json(&histogram(&index, date, parse_hour(open)?, parse_hour(close)?))
}

/// Classify each half hour between `open` and `close` as `"empty"`,
/// `"medium"`, or `"full"` against `capacity`.
#[wasm_bindgen(js_name = "availabilityTiers")]
pub fn tiers(
    snapshot_json: &str,
    window_start: &str,
    window_end: &str,
    date: &str,
    open: &str,
    close: &str,
    capacity: usize,
) -> Result<String, JsValue> {
    let window = parse_window(window_start, window_end)?;
    let index = index_for(snapshot_json, &window)?;
    let date = parse_date(date).map_err(js_error)?;

    to_json(&availability_tiers(
        &index,
        date,
        parse_hour(open)?,
        parse_hour(close)?,
        capacity,
    ))
}

/// Table ids occupied at exactly `hour` on `date`, as a JSON array.
#[wasm_bindgen(js_name = "occupiedTables")]
pub fn occupied(
    snapshot_json: &str,
    window_start: &str,
    window_end: &str,
    date: &str,
    hour: &str,
) -> Result<String, JsValue> {
    let window = parse_window(window_start, window_end)?;
    let index = index_for(snapshot_json, &window)?;
    let date = parse_date(date).map_err(js_error)?;

    to_json(&occupied_tables(&index, date, parse_hour(hour)?))
}

// ---------------------------------------------------------------------------
// Stateful widget
// ---------------------------------------------------------------------------

/// The booking widget state, driven by DOM events on the JavaScript side.
#[wasm_bindgen]
pub struct Widget {
    inner: BookingWidget<NullRenderer>,
    pending: PendingRefresh,
    outgoing: Option<SubmissionPayload>,
}

#[wasm_bindgen]
impl Widget {
    /// `config_json` may be empty for the default configuration; otherwise
    /// it is a JSON object with the same fields as the TOML configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str, window_start: &str, window_end: &str) -> Result<Widget, JsValue> {
        let config: WidgetConfig = if config_json.trim().is_empty() {
            WidgetConfig::default()
        } else {
            serde_json::from_str(config_json)
                .map_err(|e| JsValue::from_str(&format!("Invalid config JSON: {}", e)))?
        };
        let window = parse_window(window_start, window_end)?;
        let inner = BookingWidget::new(config, window, NullRenderer).map_err(js_error)?;

        Ok(Widget {
            inner,
            pending: PendingRefresh::default(),
            outgoing: None,
        })
    }

    /// The current view model as JSON.
    pub fn view(&self) -> Result<String, JsValue> {
        to_json(&self.inner.view())
    }

    #[wasm_bindgen(js_name = "setDate")]
    pub fn set_date(&mut self, date: &str) -> Result<(), JsValue> {
        let date = parse_date(date).map_err(js_error)?;
        self.inner.set_date(date).map_err(js_error)
    }

    #[wasm_bindgen(js_name = "setHour")]
    pub fn set_hour(&mut self, hour: &str) -> Result<(), JsValue> {
        let hour = parse_hour(hour)?;
        self.inner.set_hour(hour).map_err(js_error)
    }

    #[wasm_bindgen(js_name = "setPeople")]
    pub fn set_people(&mut self, people: u32) {
        self.inner.set_people(people);
    }

    #[wasm_bindgen(js_name = "setDuration")]
    pub fn set_duration(&mut self, hours: f64) -> Result<(), JsValue> {
        let span = SlotSpan::from_hours(hours).map_err(js_error)?;
        self.inner.set_duration(span);
        Ok(())
    }

    /// Returns whether the table is now selected.
    #[wasm_bindgen(js_name = "clickTable")]
    pub fn click_table(&mut self, table: u32) -> bool {
        self.inner.click_table(TableId(table))
    }

    /// Start a fetch for a window; returns its generation number.
    #[wasm_bindgen(js_name = "beginRefresh")]
    pub fn begin_refresh(&mut self, window_start: &str, window_end: &str) -> Result<f64, JsValue> {
        let window = parse_window(window_start, window_end)?;
        let ticket = self.inner.begin_refresh(window);
        self.pending.track(ticket);
        Ok(ticket.generation() as f64)
    }

    /// Apply fetched data. Returns `false` if a newer fetch has started since.
    ///
    /// A malformed document throws and leaves the generation pending, so it
    /// can still be reported through `failRefresh`.
    #[wasm_bindgen(js_name = "completeRefresh")]
    pub fn complete_refresh(&mut self, generation: f64, snapshot_json: &str) -> Result<bool, JsValue> {
        let snapshot = DataSnapshot::from_json(snapshot_json).map_err(js_error)?;
        match self.take_ticket(generation)? {
            Some(ticket) => Ok(self.inner.complete_refresh(ticket, &snapshot) == RefreshOutcome::Applied),
            None => Ok(false),
        }
    }

    /// Report a failed fetch. The previous data stays in place.
    #[wasm_bindgen(js_name = "failRefresh")]
    pub fn fail_refresh(&mut self, generation: f64, message: &str) -> Result<(), JsValue> {
        if let Some(ticket) = self.take_ticket(generation)? {
            self.inner
                .fail_refresh(ticket, &BookingError::Transport(message.to_string()));
        }
        Ok(())
    }

    /// Build the submission payload for the current selection.
    ///
    /// `details_json` is `{"address", "phone", "starters"}`. Throws
    /// `"no table selected"` when nothing is selected.
    #[wasm_bindgen(js_name = "prepareSubmission")]
    pub fn prepare_submission(&mut self, details_json: &str) -> Result<String, JsValue> {
        let details: ContactDetails = serde_json::from_str(details_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid details JSON: {}", e)))?;
        let payload = self.inner.prepare_submission(&details).map_err(js_error)?;
        let json = to_json(&payload)?;
        self.outgoing = Some(payload);
        Ok(json)
    }

    /// The booking endpoint accepted the last prepared payload.
    #[wasm_bindgen(js_name = "confirmSubmission")]
    pub fn confirm_submission(&mut self) -> Result<(), JsValue> {
        let payload = self
            .outgoing
            .take()
            .ok_or_else(|| JsValue::from_str("no submission in flight"))?;
        self.inner.confirm_submission(&payload);
        Ok(())
    }

    /// The booking endpoint rejected the last prepared payload. The
    /// selection is kept so the user can retry.
    #[wasm_bindgen(js_name = "abortSubmission")]
    pub fn abort_submission(&mut self) {
        self.outgoing = None;
    }
}

impl Widget {
    /// Settle `generation`. `None` when a newer fetch has superseded it or it
    /// was already settled; an error when it was never issued.
    fn take_ticket(&mut self, generation: f64) -> Result<Option<RefreshTicket>, JsValue> {
        let settlement = if generation.fract() == 0.0 && generation >= 0.0 {
            self.pending.settle(generation as u64)
        } else {
            Settlement::Unknown
        };
        match settlement {
            Settlement::Current(ticket) => Ok(Some(ticket)),
            Settlement::Superseded => Ok(None),
            Settlement::Unknown => Err(JsValue::from_str(&format!(
                "Unknown refresh generation {}",
                generation
            ))),
        }
    }
}
