//! Render state for the forecast screen.
//!
//! The [`Presenter`] owns everything the screen shows: the current day cards
//! and the status line. Front-ends dispatch a search into it, run the
//! retrieval pipeline, hand the outcome back and then read [`View`] to draw.
//! A view is only ever replaced as a whole.

use tracing::{debug, warn};

use crate::{
    error::SearchError,
    icon::IconImage,
    model::{ForecastDay, Query},
};

/// Why a search stopped before rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NotFound,
    NoData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    #[default]
    Idle,
    Resolving,
    Fetching,
    Rendering,
    Failed(FailureKind),
}

impl SearchPhase {
    pub fn can_advance_to(self, next: SearchPhase) -> bool {
        use SearchPhase::*;

        matches!(
            (self, next),
            (Idle, Resolving)
                | (Resolving, Fetching)
                | (Resolving, Failed(FailureKind::NotFound))
                | (Fetching, Rendering)
                | (Fetching, Failed(FailureKind::NoData))
                | (Rendering, Idle)
                | (Failed(_), Idle)
        )
    }
}

impl FailureKind {
    pub fn of(err: &SearchError) -> Option<Self> {
        match err {
            SearchError::EmptyInput => None,
            SearchError::LocationNotFound(_) => Some(FailureKind::NotFound),
            SearchError::ForecastUnavailable(_) => Some(FailureKind::NoData),
        }
    }
}

/// One rendered day: date, temperature range, day icon, night icon.
#[derive(Debug, Clone, PartialEq)]
pub struct DayCard {
    pub date_label: String,
    pub temperature_label: String,
    pub day_icon: IconImage,
    pub night_icon: IconImage,
}

impl DayCard {
    pub fn new(day: &ForecastDay, day_icon: IconImage, night_icon: IconImage) -> Self {
        Self {
            date_label: day.date_label(),
            temperature_label: day.temperature_label(),
            day_icon,
            night_icon,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct View {
    /// Left to right, first forecast day first.
    pub cards: Vec<DayCard>,
    pub status: Option<String>,
}

/// Identifies one submitted search. Only the newest ticket may change the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTicket(u64);

#[derive(Debug)]
pub enum Submission {
    /// Input was blank; the view already shows the message.
    Rejected,
    Started { ticket: SearchTicket, query: Query },
}

#[derive(Debug, Default)]
pub struct Presenter {
    generation: u64,
    phase: SearchPhase,
    view: View,
}

impl Presenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        !matches!(self.phase, SearchPhase::Idle)
    }

    /// Start a search for `raw`. A newer submission supersedes any search
    /// still in flight.
    pub fn submit(&mut self, raw: &str) -> Submission {
        match Query::parse(raw) {
            Ok(query) => {
                self.generation += 1;
                self.phase = SearchPhase::Resolving;
                debug!(city = %query, generation = self.generation, "search started");
                Submission::Started { ticket: SearchTicket(self.generation), query }
            }
            Err(err) => {
                // Blank input also cancels whatever was in flight.
                self.generation += 1;
                self.phase = SearchPhase::Idle;
                self.view = View { cards: Vec::new(), status: Some(err.user_message()) };
                Submission::Rejected
            }
        }
    }

    /// Record pipeline progress. Returns false for stale tickets and
    /// illegal transitions.
    pub fn advance(&mut self, ticket: SearchTicket, next: SearchPhase) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        if !self.phase.can_advance_to(next) {
            warn!(from = ?self.phase, to = ?next, "ignoring illegal search transition");
            return false;
        }
        debug!(from = ?self.phase, to = ?next, "search phase");
        self.phase = next;
        true
    }

    /// Apply the outcome of a search. The whole view is replaced; results of
    /// superseded searches are dropped and false is returned.
    pub fn complete(
        &mut self,
        ticket: SearchTicket,
        outcome: Result<Vec<DayCard>, SearchError>,
    ) -> bool {
        if !self.is_current(ticket) {
            debug!("dropping result of superseded search");
            return false;
        }

        self.view = match outcome {
            Ok(cards) => View { cards, status: None },
            Err(err) => {
                debug!(failure = ?FailureKind::of(&err), "search failed");
                View { cards: Vec::new(), status: Some(err.user_message()) }
            }
        };
        self.phase = SearchPhase::Idle;
        true
    }

    fn is_current(&self, ticket: SearchTicket) -> bool {
        ticket.0 == self.generation
    }
}
