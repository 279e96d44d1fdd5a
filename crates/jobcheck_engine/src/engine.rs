use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use chrono::Local;
use jobcheck_logging::{jc_debug, jc_error, jc_info};
use url::Url;

use crate::sink::EventSink;
use crate::submit::{ReqwestSubmitter, SubmitSettings, Submitter};
use crate::timer::TimerRegistry;
use crate::{EngineError, EngineEvent, RequestId, TimerId, TransportError, TransportFailure};

/// Path of the saved-history endpoint, resolved against the form action.
pub const HISTORY_PATH: &str = "/history";

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub action_url: String,
    pub session_cookie: Option<String>,
    pub settings: SubmitSettings,
}

enum EngineCommand {
    Submit {
        request: RequestId,
        fields: Vec<(String, String)>,
    },
    LoadHistory,
    StartTimer {
        timer: TimerId,
        delay: Duration,
    },
    CancelTimer {
        timer: TimerId,
    },
}

impl EngineCommand {
    fn name(&self) -> &'static str {
        match self {
            EngineCommand::Submit { .. } => "submit",
            EngineCommand::LoadHistory => "load-history",
            EngineCommand::StartTimer { .. } => "start-timer",
            EngineCommand::CancelTimer { .. } => "cancel-timer",
        }
    }
}

/// Front of the IO worker. Commands are processed in order on a dedicated
/// thread; results come back through the [`EventSink`].
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    sink: Arc<dyn EventSink>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig, sink: Arc<dyn EventSink>) -> Result<Self, EngineError> {
        let action = Url::parse(&config.action_url)?;
        let mut submitter = ReqwestSubmitter::new(config.settings);
        if let Some(cookie) = config.session_cookie.as_deref() {
            submitter = submitter.with_session_cookie(cookie, &action);
        }
        Self::with_submitter(action, Arc::new(submitter), sink)
    }

    pub fn with_submitter(
        action: Url,
        submitter: Arc<dyn Submitter>,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, EngineError> {
        let history_url = history_url_for(&action)?;
        let runtime = tokio::runtime::Runtime::new()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let handle_sink = Arc::clone(&sink);

        thread::Builder::new()
            .name("jobcheck-engine".to_string())
            .spawn(move || {
                let mut timers = TimerRegistry::default();
                while let Ok(command) = cmd_rx.recv() {
                    match command {
                        EngineCommand::Submit { request, fields } => {
                            let submitter = submitter.clone();
                            let sink = sink.clone();
                            let action = action.clone();
                            runtime.spawn(async move {
                                let result = submitter.submit(&action, &fields).await;
                                sink.emit(EngineEvent::SubmissionFinished {
                                    request,
                                    result,
                                    received_at: Local::now().naive_local(),
                                });
                            });
                        }
                        EngineCommand::LoadHistory => {
                            let submitter = submitter.clone();
                            let sink = sink.clone();
                            let url = history_url.clone();
                            runtime.spawn(async move {
                                let result = submitter.fetch_history(&url).await;
                                sink.emit(EngineEvent::HistoryFetched(result));
                            });
                        }
                        EngineCommand::StartTimer { timer, delay } => {
                            timers.start(runtime.handle(), timer, delay, sink.clone());
                        }
                        EngineCommand::CancelTimer { timer } => {
                            timers.cancel(timer);
                        }
                    }
                }
                jc_debug!("Engine command channel closed; shutting down runtime");
            })?;

        jc_info!("Engine started");
        Ok(Self {
            cmd_tx,
            sink: handle_sink,
        })
    }

    /// Queues a submission. If the worker is gone the request still completes,
    /// as a network failure, so nothing waits on it forever.
    pub fn submit(&self, request: RequestId, fields: Vec<(String, String)>) {
        if !self.send(EngineCommand::Submit { request, fields }) {
            self.sink.emit(EngineEvent::SubmissionFinished {
                request,
                result: Err(TransportError::new(
                    TransportFailure::Network,
                    "engine worker stopped",
                )),
                received_at: Local::now().naive_local(),
            });
        }
    }

    pub fn load_history(&self) {
        self.send(EngineCommand::LoadHistory);
    }

    pub fn start_timer(&self, timer: TimerId, delay: Duration) {
        self.send(EngineCommand::StartTimer { timer, delay });
    }

    pub fn cancel_timer(&self, timer: TimerId) {
        self.send(EngineCommand::CancelTimer { timer });
    }

    fn send(&self, command: EngineCommand) -> bool {
        let name = command.name();
        match self.cmd_tx.send(command) {
            Ok(()) => true,
            Err(_) => {
                jc_error!("Engine worker stopped; dropping {} command", name);
                false
            }
        }
    }
}

/// `http://host/predict` -> `http://host/history`.
pub fn history_url_for(action: &Url) -> Result<Url, url::ParseError> {
    action.join(HISTORY_PATH)
}
