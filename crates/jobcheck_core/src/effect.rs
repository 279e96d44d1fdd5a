use std::time::Duration;

use crate::{FormPayload, RequestToken, TimerId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SubmitForm {
        request: RequestToken,
        payload: FormPayload,
    },
    LoadHistory,
    StartTimer { timer: TimerId, delay: Duration },
    CancelTimer { timer: TimerId },
}
