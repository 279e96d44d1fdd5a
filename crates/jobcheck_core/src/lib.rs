//! Jobcheck core: pure state machine for the prediction form and its view model.
mod classify;
mod effect;
mod form;
mod history;
mod msg;
mod presenter;
mod state;
mod update;
mod view_model;

pub use classify::{
    classify_prediction, classify_response, ResponseClass, EMPTY_INPUT_MESSAGE, LOADING_MESSAGE,
    MISSING_PREDICTION_MESSAGE, NETWORK_ERROR_MESSAGE, SESSION_EXPIRED_MESSAGE,
    SESSION_REDIRECT_MESSAGE, UNEXPECTED_RESPONSE_MESSAGE,
};
pub use effect::Effect;
pub use form::{FormField, FormPayload, TEXT_FIELD};
pub use history::{
    format_server_timestamp, preview_text, HistoryRecord, HistoryRow, ELLIPSIS,
    HISTORY_LOAD_LIMIT, NEW_ROW_LABEL, PREVIEW_LIMIT, TIMESTAMP_FORMAT,
};
pub use msg::{Msg, SubmissionOutcome};
pub use presenter::{Glyph, Opacity, ResultKind, ResultTag, Timings};
pub use state::{AppState, PageOptions, RequestToken, TimerId};
pub use update::update;
pub use view_model::{AppViewModel, ResultView};
