use std::sync::{mpsc, Arc, Mutex};
use std::time::{Duration, Instant};

use jobcheck_engine::{
    ChannelEventSink, EngineConfig, EngineEvent, EngineHandle, HistoryEntry, HistoryError,
    RawResponse, SubmitSettings, Submitter, TransportError,
};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Waits for the next event without blocking the test runtime.
async fn next_event(rx: &mpsc::Receiver<EngineEvent>) -> EngineEvent {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Ok(event) = rx.try_recv() {
            return event;
        }
        assert!(Instant::now() < deadline, "timed out waiting for engine event");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[derive(Default)]
struct RecordingSubmitter {
    calls: Mutex<Vec<String>>,
}

#[async_trait::async_trait]
impl Submitter for RecordingSubmitter {
    async fn submit(
        &self,
        action: &Url,
        fields: &[(String, String)],
    ) -> Result<RawResponse, TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("POST {} {:?}", action.path(), fields));
        Ok(RawResponse {
            status: 200,
            redirected: false,
            redirect_count: 0,
            final_url: action.to_string(),
            content_type: None,
            body: r#"{"prediction":"Real Job"}"#.to_string(),
        })
    }

    async fn fetch_history(&self, url: &Url) -> Result<Vec<HistoryEntry>, HistoryError> {
        self.calls.lock().unwrap().push(format!("GET {}", url.path()));
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn engine_routes_submissions_and_history() {
    let (tx, rx) = mpsc::channel();
    let submitter = Arc::new(RecordingSubmitter::default());
    let action = Url::parse("http://dashboard.test/predict").unwrap();
    let engine = EngineHandle::with_submitter(
        action,
        submitter.clone(),
        Arc::new(ChannelEventSink::new(tx)),
    )
    .expect("engine");

    engine.submit(7, vec![("text".to_string(), "Nurse".to_string())]);
    match next_event(&rx).await {
        EngineEvent::SubmissionFinished { request, result, .. } => {
            assert_eq!(request, 7);
            assert_eq!(result.unwrap().body, r#"{"prediction":"Real Job"}"#);
        }
        other => panic!("unexpected event {other:?}"),
    }

    engine.load_history();
    assert_eq!(next_event(&rx).await, EngineEvent::HistoryFetched(Ok(Vec::new())));

    let calls = submitter.calls.lock().unwrap().clone();
    assert_eq!(
        calls,
        vec![
            r#"POST /predict [("text", "Nurse")]"#.to_string(),
            "GET /history".to_string(),
        ]
    );
}

#[tokio::test]
async fn engine_timers_fire_unless_cancelled() {
    let (tx, rx) = mpsc::channel();
    let engine = EngineHandle::with_submitter(
        Url::parse("http://dashboard.test/predict").unwrap(),
        Arc::new(RecordingSubmitter::default()),
        Arc::new(ChannelEventSink::new(tx)),
    )
    .expect("engine");

    engine.start_timer(1, Duration::from_millis(150));
    engine.start_timer(2, Duration::from_millis(20));
    engine.cancel_timer(1);

    assert_eq!(next_event(&rx).await, EngineEvent::TimerFired { timer: 2 });
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn engine_posts_to_real_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"prediction":"Fake Job"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let (tx, rx) = mpsc::channel();
    let engine = EngineHandle::new(
        EngineConfig {
            action_url: format!("{}/predict", server.uri()),
            session_cookie: Some("session=abc".to_string()),
            settings: SubmitSettings::default(),
        },
        Arc::new(ChannelEventSink::new(tx)),
    )
    .expect("engine");

    engine.submit(1, vec![("text".to_string(), "Data entry".to_string())]);
    match next_event(&rx).await {
        EngineEvent::SubmissionFinished { request, result, .. } => {
            assert_eq!(request, 1);
            let response = result.expect("response");
            assert!(!response.redirected);
            assert_eq!(response.body, r#"{"prediction":"Fake Job"}"#);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn invalid_action_url_is_rejected() {
    let (tx, _rx) = mpsc::channel();
    let result = EngineHandle::new(
        EngineConfig {
            action_url: "not a url".to_string(),
            session_cookie: None,
            settings: SubmitSettings::default(),
        },
        Arc::new(ChannelEventSink::new(tx)),
    );
    assert!(result.is_err());
}
