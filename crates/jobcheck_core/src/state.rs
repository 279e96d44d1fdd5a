use std::collections::BTreeMap;

use crate::form::FormState;
use crate::history::HistoryList;
use crate::presenter::{ResultRegion, Timings};
use crate::view_model::AppViewModel;

/// Monotonic id of one submission; later submissions get larger tokens.
pub type RequestToken = u64;
pub type TimerId = u64;

/// Which optional page parts exist, and how long results stay up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageOptions {
    pub history_table: bool,
    pub timings: Timings,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            history_table: true,
            timings: Timings::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimerPhase {
    /// Waiting out the auto-hide delay; firing starts the fade.
    Visible,
    /// Waiting out the fade; firing hides the region.
    Fading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ActiveTimer {
    pub(crate) id: TimerId,
    pub(crate) phase: TimerPhase,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    options: PageOptions,
    pub(crate) form: FormState,
    pub(crate) result: ResultRegion,
    pub(crate) history: Option<HistoryList>,
    /// Submitted text of every request still awaiting its completion.
    pub(crate) in_flight: BTreeMap<RequestToken, String>,
    /// The only request whose completion may drive the result region.
    pub(crate) current: Option<RequestToken>,
    pub(crate) active_timer: Option<ActiveTimer>,
    last_request: RequestToken,
    last_timer: TimerId,
    requests_issued: u64,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::with_options(PageOptions::default())
    }

    pub fn with_options(options: PageOptions) -> Self {
        Self {
            options,
            form: FormState::default(),
            result: ResultRegion::default(),
            history: options.history_table.then(HistoryList::default),
            in_flight: BTreeMap::new(),
            current: None,
            active_timer: None,
            last_request: 0,
            last_timer: 0,
            requests_issued: 0,
            dirty: false,
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            result: self.result.view(),
            history: self.history.as_ref().map(|list| list.rows().to_vec()),
            awaiting_response: self.awaiting_response(),
            requests_issued: self.requests_issued,
            dirty: self.dirty,
        }
    }

    /// Returns whether anything visible changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// True while any submission, current or superseded, has not completed.
    pub fn awaiting_response(&self) -> bool {
        !self.in_flight.is_empty()
    }

    pub(crate) fn timings(&self) -> Timings {
        self.options.timings
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Issues a fresh token and makes it the only one whose completion is shown.
    pub(crate) fn issue_request(&mut self, text: String) -> RequestToken {
        self.last_request += 1;
        self.requests_issued += 1;
        self.in_flight.insert(self.last_request, text);
        self.current = Some(self.last_request);
        self.last_request
    }

    pub(crate) fn next_timer_id(&mut self) -> TimerId {
        self.last_timer += 1;
        self.last_timer
    }
}
