use std::time::Duration;

use chrono::NaiveDateTime;
use jobcheck_logging::{clip_for_log, jc_debug, jc_info, jc_warn};

use crate::classify::{
    classify_response, ResponseClass, EMPTY_INPUT_MESSAGE, LOADING_MESSAGE,
    MISSING_PREDICTION_MESSAGE, NETWORK_ERROR_MESSAGE, SESSION_EXPIRED_MESSAGE,
    SESSION_REDIRECT_MESSAGE, UNEXPECTED_RESPONSE_MESSAGE,
};
use crate::state::{ActiveTimer, TimerPhase};
use crate::{AppState, Effect, Msg, RequestToken, ResultKind, SubmissionOutcome, TimerId};

const LOG_BODY_CHARS: usize = 2_000;

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::PageLoaded => {
            if state.history.is_some() {
                vec![Effect::LoadHistory]
            } else {
                Vec::new()
            }
        }
        Msg::TextEdited(text) => {
            state.form.set_text(text);
            Vec::new()
        }
        Msg::FieldEdited { field, value } => {
            state.form.set_field(field, value);
            Vec::new()
        }
        Msg::Submitted => submit(&mut state),
        Msg::SubmissionCompleted {
            request,
            outcome,
            received_at,
        } => complete(&mut state, request, outcome, received_at),
        Msg::HistoryLoaded(records) => {
            let offered = records.len();
            match state.history.as_mut() {
                Some(history) => {
                    let added = history.extend_saved(records);
                    jc_info!("Loaded {} of {} saved predictions", added, offered);
                    if added > 0 {
                        state.mark_dirty();
                    }
                }
                None => jc_debug!("No history table; dropping {} saved predictions", offered),
            }
            Vec::new()
        }
        Msg::TimerElapsed { timer } => timer_elapsed(&mut state, timer),
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn submit(state: &mut AppState) -> Vec<Effect> {
    let text = state.form.text().trim().to_string();
    if text.is_empty() {
        jc_info!("Submission rejected: job details are empty");
        // The newest user action wins; an in-flight answer would now be stale.
        if let Some(current) = state.current.take() {
            jc_debug!("Request {} superseded by empty submission", current);
        }
        return present(state, EMPTY_INPUT_MESSAGE, ResultKind::Error, None);
    }

    let payload = state.form.payload();
    let text_len = text.chars().count();
    let request = state.issue_request(text);
    jc_info!("Submitting request {} ({} chars)", request, text_len);

    let mut effects = present(state, LOADING_MESSAGE, ResultKind::Loading, None);
    effects.push(Effect::SubmitForm { request, payload });
    effects
}

fn complete(
    state: &mut AppState,
    request: RequestToken,
    outcome: SubmissionOutcome,
    received_at: NaiveDateTime,
) -> Vec<Effect> {
    let Some(text) = state.in_flight.remove(&request) else {
        jc_debug!("Ignoring completion for unknown request {}", request);
        return Vec::new();
    };
    if state.current.take_if(|current| *current == request).is_none() {
        record_superseded(state, request, &text, outcome, received_at);
        return Vec::new();
    }

    let timings = state.timings();
    let classified = match outcome {
        SubmissionOutcome::TransportFailed { reason } => {
            jc_warn!("Request {} failed in transport: {}", request, reason);
            return present(
                state,
                NETWORK_ERROR_MESSAGE,
                ResultKind::Error,
                Some(timings.network_hide),
            );
        }
        SubmissionOutcome::Response { redirected, body } => {
            (classify_response(redirected, &body), body)
        }
    };

    match classified {
        (ResponseClass::Redirected, _) => {
            jc_info!("Request {} was redirected; session presumed expired", request);
            present(state, SESSION_EXPIRED_MESSAGE, ResultKind::Error, None)
        }
        (ResponseClass::Markup, body) => {
            jc_info!(
                "Request {} returned markup instead of JSON: {}",
                request,
                clip_for_log(&body, LOG_BODY_CHARS)
            );
            present(state, SESSION_REDIRECT_MESSAGE, ResultKind::Error, None)
        }
        (ResponseClass::Malformed, body) => {
            jc_warn!(
                "Request {} returned an unparseable body: {}",
                request,
                clip_for_log(&body, LOG_BODY_CHARS)
            );
            present(state, UNEXPECTED_RESPONSE_MESSAGE, ResultKind::Error, None)
        }
        (ResponseClass::ServerError(message), _) => {
            jc_info!("Server reported an error for request {}: {}", request, message);
            present(state, message, ResultKind::Error, Some(timings.error_hide))
        }
        (ResponseClass::Prediction { label, kind }, _) => {
            jc_info!("Request {} classified as {:?}: {}", request, kind, label);
            if let Some(history) = state.history.as_mut() {
                history.prepend(&text, &label, received_at);
            }
            present(state, label, kind, Some(timings.success_hide))
        }
        (ResponseClass::MissingPrediction, body) => {
            jc_warn!(
                "Request {} returned neither prediction nor error: {}",
                request,
                clip_for_log(&body, LOG_BODY_CHARS)
            );
            present(
                state,
                MISSING_PREDICTION_MESSAGE,
                ResultKind::Error,
                Some(timings.error_hide),
            )
        }
    }
}

/// A newer submission owns the result region; a superseded prediction
/// only lands in the history table.
fn record_superseded(
    state: &mut AppState,
    request: RequestToken,
    text: &str,
    outcome: SubmissionOutcome,
    received_at: NaiveDateTime,
) {
    let SubmissionOutcome::Response { redirected, body } = outcome else {
        jc_debug!("Superseded request {} failed in transport; nothing to record", request);
        return;
    };
    match classify_response(redirected, &body) {
        ResponseClass::Prediction { label, .. } => {
            jc_info!("Superseded request {} predicted {}; adding to history", request, label);
            if let Some(history) = state.history.as_mut() {
                history.prepend(text, &label, received_at);
                state.mark_dirty();
            }
        }
        other => jc_debug!("Dropping superseded response for request {}: {:?}", request, other),
    }
}

/// Shows a result, replacing whatever auto-hide was pending.
fn present(
    state: &mut AppState,
    message: impl Into<String>,
    kind: ResultKind,
    hide_after: Option<Duration>,
) -> Vec<Effect> {
    let mut effects = Vec::with_capacity(2);
    if let Some(active) = state.active_timer.take() {
        effects.push(Effect::CancelTimer { timer: active.id });
    }
    state.result.present(message, kind);
    if let Some(delay) = hide_after {
        effects.push(start_timer(state, TimerPhase::Visible, delay));
    }
    state.mark_dirty();
    effects
}

fn start_timer(state: &mut AppState, phase: TimerPhase, delay: Duration) -> Effect {
    let id = state.next_timer_id();
    state.active_timer = Some(ActiveTimer { id, phase });
    Effect::StartTimer { timer: id, delay }
}

fn timer_elapsed(state: &mut AppState, timer: TimerId) -> Vec<Effect> {
    let Some(active) = state.active_timer.filter(|active| active.id == timer) else {
        jc_debug!("Ignoring stale timer {}", timer);
        return Vec::new();
    };

    state.mark_dirty();
    match active.phase {
        TimerPhase::Visible => {
            state.result.fade();
            let fade = state.timings().fade;
            vec![start_timer(state, TimerPhase::Fading, fade)]
        }
        TimerPhase::Fading => {
            state.active_timer = None;
            state.result.hide();
            Vec::new()
        }
    }
}
