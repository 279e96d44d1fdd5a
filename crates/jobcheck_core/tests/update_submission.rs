use std::sync::Once;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use jobcheck_core::{
    update, AppState, Effect, FormField, Glyph, Msg, RequestToken, ResultKind, ResultTag,
    SubmissionOutcome, EMPTY_INPUT_MESSAGE, MISSING_PREDICTION_MESSAGE, NETWORK_ERROR_MESSAGE,
    SESSION_EXPIRED_MESSAGE, SESSION_REDIRECT_MESSAGE, UNEXPECTED_RESPONSE_MESSAGE,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(jobcheck_logging::initialize_for_tests);
}

fn received_at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1)
        .and_then(|day| day.and_hms_opt(12, 0, 0))
        .expect("valid timestamp")
}

fn submit_text(state: AppState, input: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = update(state, Msg::TextEdited(input.to_string()));
    update(state, Msg::Submitted)
}

fn request_of(effects: &[Effect]) -> RequestToken {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::SubmitForm { request, .. } => Some(*request),
            _ => None,
        })
        .expect("submit effect")
}

fn respond(state: AppState, request: RequestToken, body: &str) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::SubmissionCompleted {
            request,
            outcome: SubmissionOutcome::Response {
                redirected: false,
                body: body.to_string(),
            },
            received_at: received_at(),
        },
    )
}

fn submit_and_respond(body: &str) -> (AppState, Vec<Effect>) {
    let (state, effects) = submit_text(AppState::new(), "Earn $5000 a week from home");
    let request = request_of(&effects);
    respond(state, request, body)
}

fn hide_delay(effects: &[Effect]) -> Option<Duration> {
    effects.iter().find_map(|effect| match effect {
        Effect::StartTimer { delay, .. } => Some(*delay),
        _ => None,
    })
}

#[test]
fn empty_input_shows_error_without_request() {
    init_logging();
    for input in ["", "   ", "\n\t  \n"] {
        let (mut state, effects) = submit_text(AppState::new(), input);
        let view = state.view();

        assert!(effects.is_empty(), "no effects for {input:?}");
        assert_eq!(view.requests_issued, 0);
        assert!(view.result.visible);
        assert_eq!(view.result.kind, ResultKind::Error);
        assert_eq!(view.result.message, EMPTY_INPUT_MESSAGE);
        assert!(state.consume_dirty());
    }
}

#[test]
fn non_empty_input_issues_exactly_one_request() {
    init_logging();
    let (state, effects) = submit_text(AppState::new(), "  Data entry clerk, remote  ");
    let view = state.view();

    let submits: Vec<_> = effects
        .iter()
        .filter(|effect| matches!(effect, Effect::SubmitForm { .. }))
        .collect();
    assert_eq!(submits.len(), 1);
    assert_eq!(view.requests_issued, 1);
    assert!(view.awaiting_response);
    assert_eq!(view.result.kind, ResultKind::Loading);
    assert_eq!(view.result.tag, Some(ResultTag::Loading));
    assert_eq!(hide_delay(&effects), None);
}

#[test]
fn payload_carries_text_and_filled_fields() {
    init_logging();
    let state = AppState::new();
    let (state, _) = update(
        state,
        Msg::FieldEdited {
            field: FormField::JobTitle,
            value: "Clerk".to_string(),
        },
    );
    let (state, _) = update(
        state,
        Msg::FieldEdited {
            field: FormField::SalaryRange,
            value: "  ".to_string(),
        },
    );
    let (_state, effects) = submit_text(state, "Typing work");

    let payload = effects
        .into_iter()
        .find_map(|effect| match effect {
            Effect::SubmitForm { payload, .. } => Some(payload),
            _ => None,
        })
        .expect("submit effect");
    assert_eq!(payload.get("text"), Some("Typing work"));
    assert_eq!(payload.get("job_title"), Some("Clerk"));
    assert_eq!(payload.get("salary_range"), None);
}

#[test]
fn fake_prediction_tags_fake_and_prepends_history() {
    init_logging();
    let (state, effects) = submit_and_respond(r#"{"prediction":"Fake Job"}"#);
    let view = state.view();

    assert_eq!(view.result.kind, ResultKind::Fake);
    assert_eq!(view.result.tag, Some(ResultTag::Fake));
    assert_eq!(view.result.glyph, Some(Glyph::Warning));
    assert_eq!(view.result.message, "Fake Job");
    assert!(!view.awaiting_response);

    let history = view.history.expect("history table");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].label, "New");
    assert_eq!(history[0].prediction, "Fake Job");
    assert_eq!(history[0].preview, "Earn $5000 a week from home");
    assert_eq!(history[0].timestamp, "2024-05-01 12:00:00");
    assert_eq!(hide_delay(&effects), Some(Duration::from_millis(8000)));
}

#[test]
fn real_prediction_tags_real() {
    init_logging();
    let (state, _) = submit_and_respond(r#"{"prediction":"Real Job"}"#);
    let view = state.view();

    assert_eq!(view.result.kind, ResultKind::Real);
    assert_eq!(view.result.tag, Some(ResultTag::Real));
    assert_eq!(view.result.glyph, Some(Glyph::Check));
}

#[test]
fn unmatched_prediction_is_plain_info() {
    init_logging();
    let (state, effects) = submit_and_respond(r#"{"prediction":"Uncertain"}"#);
    let view = state.view();

    assert_eq!(view.result.kind, ResultKind::Info);
    assert_eq!(view.result.tag, None);
    assert_eq!(view.result.glyph, None);
    assert_eq!(view.history.map(|rows| rows.len()), Some(1));
    assert_eq!(hide_delay(&effects), Some(Duration::from_millis(8000)));
}

#[test]
fn server_error_is_shown_verbatim_without_history() {
    init_logging();
    let (state, effects) = submit_and_respond(r#"{"error":"Invalid input"}"#);
    let view = state.view();

    assert_eq!(view.result.kind, ResultKind::Error);
    assert_eq!(view.result.message, "Invalid input");
    assert_eq!(view.history, Some(Vec::new()));
    assert_eq!(hide_delay(&effects), Some(Duration::from_millis(6000)));
}

#[test]
fn html_body_means_session_expired() {
    init_logging();
    let (state, effects) = submit_and_respond("<html><body>Please login</body></html>");
    let view = state.view();

    assert_eq!(view.result.kind, ResultKind::Error);
    assert_eq!(view.result.message, SESSION_REDIRECT_MESSAGE);
    assert_eq!(hide_delay(&effects), None);
}

#[test]
fn redirected_response_means_session_expired() {
    init_logging();
    let (state, effects) = submit_text(AppState::new(), "Warehouse picker");
    let request = request_of(&effects);
    let (state, _) = update(
        state,
        Msg::SubmissionCompleted {
            request,
            outcome: SubmissionOutcome::Response {
                redirected: true,
                body: r#"{"prediction":"Real Job"}"#.to_string(),
            },
            received_at: received_at(),
        },
    );
    let view = state.view();

    assert_eq!(view.result.message, SESSION_EXPIRED_MESSAGE);
    assert_eq!(view.history, Some(Vec::new()));
}

#[test]
fn malformed_body_asks_to_check_console() {
    init_logging();
    let (state, _) = submit_and_respond("not json{");
    assert_eq!(state.view().result.message, UNEXPECTED_RESPONSE_MESSAGE);
    assert_eq!(state.view().result.kind, ResultKind::Error);
}

#[test]
fn missing_prediction_is_an_error() {
    init_logging();
    let (state, effects) = submit_and_respond(r#"{"status":"ok"}"#);
    assert_eq!(state.view().result.message, MISSING_PREDICTION_MESSAGE);
    assert_eq!(hide_delay(&effects), Some(Duration::from_millis(6000)));
}

#[test]
fn transport_failure_is_a_network_error() {
    init_logging();
    let (state, effects) = submit_text(AppState::new(), "Warehouse picker");
    let request = request_of(&effects);
    let (state, effects) = update(
        state,
        Msg::SubmissionCompleted {
            request,
            outcome: SubmissionOutcome::TransportFailed {
                reason: "connection refused".to_string(),
            },
            received_at: received_at(),
        },
    );
    let view = state.view();

    assert_eq!(view.result.message, NETWORK_ERROR_MESSAGE);
    assert!(!view.result.message.contains("refused"));
    assert_eq!(hide_delay(&effects), Some(Duration::from_millis(8000)));
}

#[test]
fn superseded_response_cannot_overwrite_newer_request() {
    init_logging();
    let (state, effects) = submit_text(AppState::new(), "first posting");
    let first = request_of(&effects);
    let (state, effects) = submit_text(state, "second posting");
    let second = request_of(&effects);
    assert!(second > first);

    let (mut state, effects) = respond(state, first, r#"{"prediction":"Fake Job"}"#);
    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.result.kind, ResultKind::Loading);
    assert!(view.awaiting_response);
    let history = view.history.expect("history table");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].preview, "first posting");
    assert_eq!(history[0].prediction, "Fake Job");
    assert!(state.consume_dirty());

    // A duplicate completion for a request already answered changes nothing.
    let (mut state, _) = respond(state, first, r#"{"prediction":"Fake Job"}"#);
    assert!(!state.consume_dirty());

    let (state, _) = respond(state, second, r#"{"prediction":"Real Job"}"#);
    let view = state.view();
    assert_eq!(view.result.kind, ResultKind::Real);
    assert_eq!(view.result.message, "Real Job");
    assert!(!view.awaiting_response);
    let rows: Vec<_> = view
        .history
        .expect("history table")
        .into_iter()
        .map(|row| (row.preview, row.prediction))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("second posting".to_string(), "Real Job".to_string()),
            ("first posting".to_string(), "Fake Job".to_string()),
        ]
    );
}

#[test]
fn superseded_failures_leave_result_and_history_alone() {
    init_logging();
    let (state, effects) = submit_text(AppState::new(), "first posting");
    let first = request_of(&effects);
    let (state, effects) = submit_text(state, "second posting");
    let second = request_of(&effects);
    let (state, effects) = submit_text(state, "third posting");
    let third = request_of(&effects);

    let (mut state, effects) = respond(state, first, r#"{"error":"Model not loaded"}"#);
    assert!(effects.is_empty());
    assert!(!state.consume_dirty());

    let (mut state, effects) = update(
        state,
        Msg::SubmissionCompleted {
            request: second,
            outcome: SubmissionOutcome::TransportFailed {
                reason: "connection refused".to_string(),
            },
            received_at: received_at(),
        },
    );
    assert!(effects.is_empty());
    assert!(!state.consume_dirty());
    let view = state.view();
    assert_eq!(view.result.kind, ResultKind::Loading);
    assert_eq!(view.history, Some(Vec::new()));
    assert!(view.awaiting_response);

    let (state, _) = respond(state, third, r#"{"prediction":"Real Job"}"#);
    assert!(!state.awaiting_response());
    assert_eq!(state.view().history.map(|rows| rows.len()), Some(1));
}

#[test]
fn empty_submission_supersedes_in_flight_request() {
    init_logging();
    let (state, effects) = submit_text(AppState::new(), "first posting");
    let first = request_of(&effects);
    let (state, _) = submit_text(state, "   ");

    assert!(state.awaiting_response());

    let (state, effects) = respond(state, first, r#"{"prediction":"Real Job"}"#);
    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.result.message, EMPTY_INPUT_MESSAGE);
    assert_eq!(view.result.kind, ResultKind::Error);
    assert!(!view.awaiting_response);
    // The prediction still counts, it just never reaches the result region.
    assert_eq!(view.history.map(|rows| rows.len()), Some(1));
}

#[test]
fn form_stays_usable_after_errors() {
    init_logging();
    let (state, _) = submit_and_respond("not json{");
    let (state, effects) = submit_text(state, "Another posting");
    let request = request_of(&effects);
    assert_eq!(state.view().requests_issued, 2);

    let (state, _) = respond(state, request, r#"{"prediction":"Real Job Posting"}"#);
    assert_eq!(state.view().result.kind, ResultKind::Real);
}
