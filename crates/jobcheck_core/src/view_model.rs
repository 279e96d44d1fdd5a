use crate::{Glyph, HistoryRow, Opacity, ResultKind, ResultTag};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub result: ResultView,
    /// `None` when the page has no history table.
    pub history: Option<Vec<HistoryRow>>,
    pub awaiting_response: bool,
    pub requests_issued: u64,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultView {
    pub visible: bool,
    pub opacity: Opacity,
    pub kind: ResultKind,
    pub glyph: Option<Glyph>,
    pub tag: Option<ResultTag>,
    pub message: String,
}

impl ResultView {
    /// Message as the badge shows it, glyph first.
    pub fn display_text(&self) -> String {
        match self.glyph {
            Some(glyph) => format!("{} {}", glyph.symbol(), self.message),
            None => self.message.clone(),
        }
    }
}
