use std::sync::{mpsc, Arc};

use jobcheck_core::{Effect, HistoryRecord, Msg, SubmissionOutcome};
use jobcheck_engine::{EngineConfig, EngineError, EngineEvent, EngineHandle, EventSink};
use jobcheck_logging::{jc_debug, jc_info, jc_warn};

use super::app::LoopEvent;

pub(crate) struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub(crate) fn new(
        config: EngineConfig,
        loop_tx: mpsc::Sender<LoopEvent>,
    ) -> Result<Self, EngineError> {
        let engine = EngineHandle::new(config, Arc::new(MsgSink { tx: loop_tx }))?;
        Ok(Self { engine })
    }

    pub(crate) fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitForm { request, payload } => {
                    jc_info!(
                        "SubmitForm request={} fields={}",
                        request,
                        payload.fields().len()
                    );
                    self.engine.submit(request, payload.into_fields());
                }
                Effect::LoadHistory => {
                    jc_info!("LoadHistory");
                    self.engine.load_history();
                }
                Effect::StartTimer { timer, delay } => {
                    jc_debug!("StartTimer timer={} delay_ms={}", timer, delay.as_millis());
                    self.engine.start_timer(timer, delay);
                }
                Effect::CancelTimer { timer } => {
                    jc_debug!("CancelTimer timer={}", timer);
                    self.engine.cancel_timer(timer);
                }
            }
        }
    }
}

/// Feeds engine events back into the UI loop as messages.
struct MsgSink {
    tx: mpsc::Sender<LoopEvent>,
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        if let Some(msg) = map_event(event) {
            let _ = self.tx.send(LoopEvent::Msg(msg));
        }
    }
}

fn map_event(event: EngineEvent) -> Option<Msg> {
    match event {
        EngineEvent::SubmissionFinished {
            request,
            result,
            received_at,
        } => {
            let outcome = match result {
                Ok(response) => {
                    jc_debug!(
                        "Request {} answered {} from {} (redirects: {})",
                        request,
                        response.status,
                        response.final_url,
                        response.redirect_count
                    );
                    SubmissionOutcome::Response {
                        redirected: response.redirected,
                        body: response.body,
                    }
                }
                Err(err) => SubmissionOutcome::TransportFailed {
                    reason: err.to_string(),
                },
            };
            Some(Msg::SubmissionCompleted {
                request,
                outcome,
                received_at,
            })
        }
        EngineEvent::HistoryFetched(Ok(entries)) => Some(Msg::HistoryLoaded(
            entries
                .into_iter()
                .map(|entry| HistoryRecord {
                    text: entry.text,
                    prediction: entry.prediction,
                    timestamp: entry.timestamp,
                })
                .collect(),
        )),
        EngineEvent::HistoryFetched(Err(err)) => {
            jc_warn!("Saved history unavailable: {}", err);
            None
        }
        EngineEvent::TimerFired { timer } => Some(Msg::TimerElapsed { timer }),
    }
}
