//! Generation tokens for overlapping data fetches.
//!
//! Every fetch is tagged with a generation when it starts. Only the result of
//! the most recently started fetch may be applied; anything older that
//! completes afterwards is dropped.

use crate::window::Window;

/// Handed out when a fetch starts; presented again when its data arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket {
    generation: u64,
    window: Window,
}

impl RefreshTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn window(&self) -> Window {
        self.window
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The data was folded in and the view re-rendered.
    Applied,
    /// A newer fetch was started after this one; nothing changed.
    Stale,
}

/// Monotonic generation counter.
#[derive(Debug, Clone, Default)]
pub struct Generations {
    latest: u64,
}

impl Generations {
    pub fn issue(&mut self, window: Window) -> RefreshTicket {
        self.latest += 1;
        RefreshTicket {
            generation: self.latest,
            window,
        }
    }

    pub fn is_current(&self, ticket: &RefreshTicket) -> bool {
        ticket.generation == self.latest
    }

    pub fn latest(&self) -> u64 {
        self.latest
    }
}

/// What presenting a generation number to [`PendingRefresh::settle`] found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// The latest fetch; its ticket is handed back and no longer pending.
    Current(RefreshTicket),
    /// Issued earlier, but a newer fetch started or it was already settled.
    Superseded,
    /// Never issued.
    Unknown,
}

/// Holds the ticket of the latest fetch while a caller outside Rust (the JS
/// widget) performs it. Only one ticket is kept; older ones are superseded
/// the moment a newer fetch starts.
#[derive(Debug, Clone, Default)]
pub struct PendingRefresh {
    ticket: Option<RefreshTicket>,
    issued: u64,
}

impl PendingRefresh {
    pub fn track(&mut self, ticket: RefreshTicket) {
        self.issued = self.issued.max(ticket.generation);
        self.ticket = Some(ticket);
    }

    /// Settle `generation`: hand back its ticket if it is the pending one.
    pub fn settle(&mut self, generation: u64) -> Settlement {
        if let Some(ticket) = self.ticket.filter(|t| t.generation == generation) {
            self.ticket = None;
            return Settlement::Current(ticket);
        }
        if generation >= 1 && generation <= self.issued {
            Settlement::Superseded
        } else {
            Settlement::Unknown
        }
    }
}
