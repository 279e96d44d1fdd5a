//! Result region: what the badge shows and how long it stays up.

use std::time::Duration;

/// Variants of the result badge. `Hidden` is the resting state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultKind {
    #[default]
    Hidden,
    Loading,
    Info,
    Fake,
    Real,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Warning,
    Check,
}

impl Glyph {
    pub fn symbol(self) -> &'static str {
        match self {
            Glyph::Warning => "⚠️",
            Glyph::Check => "✅",
        }
    }
}

/// Style marker carried by the region. At most one is set at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultTag {
    Loading,
    Fake,
    Real,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Opacity {
    #[default]
    Opaque,
    Transparent,
}

/// Auto-hide delays, one per terminal path, plus the fixed fade interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub error_hide: Duration,
    pub success_hide: Duration,
    pub network_hide: Duration,
    pub fade: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            error_hide: Duration::from_millis(6000),
            success_hide: Duration::from_millis(8000),
            network_hide: Duration::from_millis(8000),
            fade: Duration::from_millis(600),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct ResultRegion {
    visible: bool,
    opacity: Opacity,
    kind: ResultKind,
    glyph: Option<Glyph>,
    tag: Option<ResultTag>,
    message: String,
}

impl ResultRegion {
    /// Shows `message` with the treatment for `kind`. Visibility, opacity and
    /// content always change together.
    pub(crate) fn present(&mut self, message: impl Into<String>, kind: ResultKind) {
        self.visible = true;
        self.opacity = Opacity::Opaque;
        self.kind = kind;
        self.message = message.into();
        (self.glyph, self.tag) = match kind {
            ResultKind::Fake => (Some(Glyph::Warning), Some(ResultTag::Fake)),
            ResultKind::Real => (Some(Glyph::Check), Some(ResultTag::Real)),
            ResultKind::Error => (Some(Glyph::Warning), None),
            ResultKind::Loading => (None, Some(ResultTag::Loading)),
            ResultKind::Info | ResultKind::Hidden => (None, None),
        };
    }

    pub(crate) fn fade(&mut self) {
        self.opacity = Opacity::Transparent;
    }

    pub(crate) fn hide(&mut self) {
        *self = Self {
            opacity: Opacity::Transparent,
            ..Self::default()
        };
    }

    pub(crate) fn view(&self) -> crate::ResultView {
        crate::ResultView {
            visible: self.visible,
            opacity: self.opacity,
            kind: self.kind,
            glyph: self.glyph,
            tag: self.tag,
            message: self.message.clone(),
        }
    }
}
