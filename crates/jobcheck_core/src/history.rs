//! History table rows: synthetic rows from fresh predictions and rows loaded
//! from the server's saved history.

use chrono::{DateTime, NaiveDateTime};

pub const PREVIEW_LIMIT: usize = 140;
pub const ELLIPSIS: char = '…';
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const NEW_ROW_LABEL: &str = "New";
/// The dashboard only ever lists this many saved predictions.
pub const HISTORY_LOAD_LIMIT: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    pub label: String,
    pub preview: String,
    pub prediction: String,
    pub timestamp: String,
}

/// A saved prediction as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRecord {
    pub text: String,
    pub prediction: String,
    pub timestamp: String,
}

/// Collapses whitespace runs and cuts to [`PREVIEW_LIMIT`] characters,
/// appending [`ELLIPSIS`] when cut.
pub fn preview_text(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    match collapsed.char_indices().nth(PREVIEW_LIMIT) {
        Some((end, _)) => {
            let mut preview = collapsed[..end].to_string();
            preview.push(ELLIPSIS);
            preview
        }
        None => collapsed,
    }
}

/// Reformats an ISO-8601 timestamp as [`TIMESTAMP_FORMAT`]; unparseable
/// input is returned unchanged.
pub fn format_server_timestamp(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.format(TIMESTAMP_FORMAT).to_string();
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|parsed| parsed.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_else(|| raw.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct HistoryList {
    rows: Vec<HistoryRow>,
}

impl HistoryList {
    pub(crate) fn prepend(&mut self, submitted: &str, prediction: &str, at: NaiveDateTime) {
        self.rows.insert(
            0,
            HistoryRow {
                label: NEW_ROW_LABEL.to_string(),
                preview: preview_text(submitted),
                prediction: prediction.to_string(),
                timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
            },
        );
    }

    /// Appends saved rows below whatever is already listed. Returns how many
    /// rows were added.
    pub(crate) fn extend_saved(&mut self, records: Vec<HistoryRecord>) -> usize {
        let before = self.rows.len();
        self.rows.extend(
            records
                .into_iter()
                .take(HISTORY_LOAD_LIMIT)
                .enumerate()
                .map(|(index, record)| HistoryRow {
                    label: (index + 1).to_string(),
                    preview: preview_text(&record.text),
                    prediction: record.prediction,
                    timestamp: format_server_timestamp(&record.timestamp),
                }),
        );
        self.rows.len() - before
    }

    pub(crate) fn rows(&self) -> &[HistoryRow] {
        &self.rows
    }
}
