use std::fmt;

use chrono::NaiveDateTime;
use serde::Deserialize;

pub type RequestId = u64;
pub type TimerId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    SubmissionFinished {
        request: RequestId,
        result: Result<RawResponse, TransportError>,
        received_at: NaiveDateTime,
    },
    HistoryFetched(Result<Vec<HistoryEntry>, HistoryError>),
    TimerFired { timer: TimerId },
}

/// A response as the transport saw it. Status is informational only; the
/// body decides how the form reacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub redirected: bool,
    pub redirect_count: usize,
    pub final_url: String,
    pub content_type: Option<String>,
    pub body: String,
}

/// One saved prediction from the history endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HistoryEntry {
    pub text: String,
    pub prediction: String,
    #[serde(default)]
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct TransportError {
    pub kind: TransportFailure,
    pub message: String,
}

impl TransportError {
    pub(crate) fn new(kind: TransportFailure, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportFailure {
    InvalidUrl,
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Network,
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportFailure::InvalidUrl => write!(f, "invalid url"),
            TransportFailure::Timeout => write!(f, "timeout"),
            TransportFailure::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            TransportFailure::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            TransportFailure::Network => write!(f, "network error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    #[error("history request redirected to {0}")]
    Redirected(String),
    #[error("history endpoint answered with status {0}")]
    HttpStatus(u16),
    #[error("history endpoint answered with markup")]
    Markup,
    #[error("history body is not a list of predictions: {0}")]
    Malformed(String),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid form action url: {0}")]
    InvalidActionUrl(#[from] url::ParseError),
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[from] std::io::Error),
}
