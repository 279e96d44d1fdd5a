use chrono::NaiveDateTime;

use crate::{FormField, HistoryRecord, RequestToken, TimerId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Page finished loading; saved history may be requested.
    PageLoaded,
    /// User edited the job description textarea.
    TextEdited(String),
    /// User edited one of the optional structured fields.
    FieldEdited { field: FormField, value: String },
    /// User submitted the prediction form.
    Submitted,
    /// Engine finished the request issued under `request`.
    SubmissionCompleted {
        request: RequestToken,
        outcome: SubmissionOutcome,
        received_at: NaiveDateTime,
    },
    /// Engine delivered the saved prediction history.
    HistoryLoaded(Vec<HistoryRecord>),
    /// A timer started through `Effect::StartTimer` fired.
    TimerElapsed { timer: TimerId },
    /// Fallback for placeholder wiring.
    NoOp,
}

/// Transport-level result of a submission, before any classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Response { redirected: bool, body: String },
    TransportFailed { reason: String },
}
