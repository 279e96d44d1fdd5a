use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use jobcheck_core::{update, AppState, FormField, Msg};
use jobcheck_logging::{jc_debug, jc_info};

use super::effects::EffectRunner;
use super::ui::render::TerminalView;
use crate::config::AppConfig;

pub enum RunMode {
    /// One posting per stdin line until end of input.
    Interactive,
    /// Submit a single posting and stop once it resolves.
    Once(String),
}

pub(crate) enum LoopEvent {
    Msg(Msg),
    /// No more user input will arrive.
    InputClosed,
}

/// Messages that fill the structured form fields. The form keeps them across
/// submissions, so they are dispatched once before any input.
pub(crate) fn field_msgs(fields: Vec<(FormField, String)>) -> impl Iterator<Item = Msg> {
    fields
        .into_iter()
        .map(|(field, value)| Msg::FieldEdited { field, value })
}

/// Messages that submit one posting.
pub(crate) fn submission_msgs(text: String) -> [Msg; 2] {
    [Msg::TextEdited(text), Msg::Submitted]
}

pub fn run_app(
    config: AppConfig,
    mode: RunMode,
    fields: Vec<(FormField, String)>,
) -> anyhow::Result<()> {
    let (loop_tx, loop_rx) = mpsc::channel::<LoopEvent>();
    let runner = EffectRunner::new(config.engine_config(), loop_tx.clone())
        .context("failed to start engine")?;
    jc_info!("Prediction form bound to {}", config.action_url);

    let mut state = AppState::with_options(config.page_options());
    let mut terminal = TerminalView::default();
    let mut out = io::stdout().lock();

    if config.load_history {
        state = dispatch(state, Msg::PageLoaded, &runner, &mut terminal, &mut out)?;
    }
    for msg in field_msgs(fields) {
        state = dispatch(state, msg, &runner, &mut terminal, &mut out)?;
    }

    match mode {
        RunMode::Once(text) => {
            let events = submission_msgs(text)
                .into_iter()
                .map(LoopEvent::Msg)
                .chain([LoopEvent::InputClosed]);
            for event in events {
                let _ = loop_tx.send(event);
            }
        }
        RunMode::Interactive => spawn_stdin_reader(loop_tx.clone()),
    }
    drop(loop_tx);

    let mut input_closed = false;
    while let Ok(event) = loop_rx.recv() {
        match event {
            LoopEvent::Msg(msg) => {
                state = dispatch(state, msg, &runner, &mut terminal, &mut out)?;
            }
            LoopEvent::InputClosed => input_closed = true,
        }
        if input_closed && !state.awaiting_response() {
            jc_debug!("Input closed and no request in flight; exiting");
            break;
        }
    }

    Ok(())
}

fn dispatch(
    state: AppState,
    msg: Msg,
    runner: &EffectRunner,
    terminal: &mut TerminalView,
    out: &mut impl Write,
) -> io::Result<AppState> {
    let (mut state, effects) = update(state, msg);
    runner.run(effects);
    if state.consume_dirty() {
        for line in terminal.frame(&state.view()) {
            writeln!(out, "{line}")?;
        }
        out.flush()?;
    }
    Ok(state)
}

fn spawn_stdin_reader(loop_tx: mpsc::Sender<LoopEvent>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            for msg in submission_msgs(line) {
                if loop_tx.send(LoopEvent::Msg(msg)).is_err() {
                    return;
                }
            }
        }
        let _ = loop_tx.send(LoopEvent::InputClosed);
    });
}
