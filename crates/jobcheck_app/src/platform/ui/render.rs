use jobcheck_core::{AppViewModel, HistoryRow, Opacity, ResultKind, ResultView};

/// Remembers what was last printed so only the parts that changed are redrawn.
#[derive(Debug, Default)]
pub struct TerminalView {
    last_result: Option<ResultView>,
    last_history: Option<Vec<HistoryRow>>,
}

impl TerminalView {
    pub fn frame(&mut self, view: &AppViewModel) -> Vec<String> {
        let mut lines = Vec::new();

        if self.last_result.as_ref() != Some(&view.result) {
            lines.push(result_line(&view.result));
            self.last_result = Some(view.result.clone());
        }

        if let Some(rows) = &view.history {
            if self.last_history.as_ref() != Some(rows) {
                lines.extend(history_table(rows));
                self.last_history = Some(rows.clone());
            }
        }

        lines
    }
}

fn result_line(result: &ResultView) -> String {
    if !result.visible {
        return "[result] hidden".to_string();
    }
    let fading = match result.opacity {
        Opacity::Opaque => "",
        Opacity::Transparent => " (fading)",
    };
    format!(
        "[{}] {}{}",
        kind_label(result.kind),
        result.display_text(),
        fading
    )
}

fn kind_label(kind: ResultKind) -> &'static str {
    match kind {
        ResultKind::Hidden => "hidden",
        ResultKind::Loading => "loading",
        ResultKind::Info => "info",
        ResultKind::Fake => "fake",
        ResultKind::Real => "real",
        ResultKind::Error => "error",
    }
}

fn history_table(rows: &[HistoryRow]) -> Vec<String> {
    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format!(
        "{:<4} | {:<19} | {:<20} | {}",
        "#", "When", "Prediction", "Posting"
    ));
    lines.push("-".repeat(72));
    if rows.is_empty() {
        lines.push("(no predictions yet)".to_string());
    }
    lines.extend(rows.iter().map(|row| {
        format!(
            "{:<4} | {:<19} | {:<20} | {}",
            row.label, row.timestamp, row.prediction, row.preview
        )
    }));
    lines
}
