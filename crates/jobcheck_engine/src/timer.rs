use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use jobcheck_logging::jc_trace;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::sink::EventSink;
use crate::{EngineEvent, TimerId};

/// Pending one-shot timers, keyed by the id the caller chose.
#[derive(Default)]
pub(crate) struct TimerRegistry {
    pending: HashMap<TimerId, JoinHandle<()>>,
}

impl TimerRegistry {
    /// Starts `timer`; restarting an id that is still pending replaces it.
    pub(crate) fn start(
        &mut self,
        runtime: &Handle,
        timer: TimerId,
        delay: Duration,
        sink: Arc<dyn EventSink>,
    ) {
        self.pending.retain(|_, handle| !handle.is_finished());
        let task = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            sink.emit(EngineEvent::TimerFired { timer });
        });
        if let Some(previous) = self.pending.insert(timer, task) {
            previous.abort();
        }
    }

    /// Returns whether a still-pending timer was cancelled.
    pub(crate) fn cancel(&mut self, timer: TimerId) -> bool {
        match self.pending.remove(&timer) {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                jc_trace!("Cancelled timer {}", timer);
                true
            }
            _ => false,
        }
    }

    #[cfg(test)]
    fn pending_len(&self) -> usize {
        self.pending.len()
    }
}
