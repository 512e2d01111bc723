//! The data-source boundary: read queries for a window and the fetch trait.

use crate::config::SourceConfig;
use crate::error::Result;
use crate::records::DataSnapshot;
use crate::slot::date_to_str;
use crate::window::Window;

/// Query parameters for the three reads that cover one window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadQueries {
    /// Bookings dated inside the window.
    pub booking: Vec<String>,
    /// One-off events dated inside the window.
    pub events_current: Vec<String>,
    /// Repeating events that start on or before the end of the window.
    pub events_repeat: Vec<String>,
}

impl ReadQueries {
    pub fn for_window(window: &Window, source: &SourceConfig) -> Self {
        let start = format!("{}={}", source.date_start_param, date_to_str(window.min()));
        let end = format!("{}={}", source.date_end_param, date_to_str(window.max()));

        ReadQueries {
            booking: vec![start.clone(), end.clone()],
            events_current: vec![source.not_repeat_param.clone(), start, end.clone()],
            events_repeat: vec![source.repeat_param.clone(), end],
        }
    }

    pub fn urls(&self, source: &SourceConfig) -> ReadUrls {
        ReadUrls {
            booking: endpoint_url(source, &source.booking, &self.booking),
            events_current: endpoint_url(source, &source.event, &self.events_current),
            events_repeat: endpoint_url(source, &source.event, &self.events_repeat),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadUrls {
    pub booking: String,
    pub events_current: String,
    pub events_repeat: String,
}

/// Where new bookings are posted.
pub fn submit_url(source: &SourceConfig) -> String {
    format!("{}/{}", source.url.trim_end_matches('/'), source.booking)
}

fn endpoint_url(source: &SourceConfig, endpoint: &str, params: &[String]) -> String {
    format!(
        "{}/{}?{}",
        source.url.trim_end_matches('/'),
        endpoint,
        params.join("&")
    )
}

/// Something that can answer the three read queries.
///
/// Implementations own the transport; failures are reported as
/// `BookingError::Transport` and are not retried by the caller.
pub trait BookingSource {
    fn fetch(&mut self, queries: &ReadQueries) -> Result<DataSnapshot>;
}
