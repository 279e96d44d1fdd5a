//! Jobcheck engine: HTTP submission, saved-history fetch and result timers.
mod decode;
mod engine;
mod sink;
mod submit;
mod timer;
mod types;

pub use decode::{decode_body, DecodedBody};
pub use engine::{history_url_for, EngineConfig, EngineHandle, HISTORY_PATH};
pub use sink::{ChannelEventSink, EventSink};
pub use submit::{
    ReqwestSubmitter, SubmitSettings, Submitter, REQUESTED_WITH_HEADER, REQUESTED_WITH_VALUE,
};
pub use types::{
    EngineError, EngineEvent, HistoryEntry, HistoryError, RawResponse, RequestId, TimerId,
    TransportError, TransportFailure,
};
