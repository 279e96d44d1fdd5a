//! Page and transport configuration, read from a RON file.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use jobcheck_core::{PageOptions, Timings};
use jobcheck_engine::{EngineConfig, SubmitSettings};
use jobcheck_logging::jc_info;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "jobcheck.ron";
pub const DEFAULT_ACTION_URL: &str = "http://127.0.0.1:5000/predict";
/// Overrides `session_cookie`; holds a `name=value` cookie pair.
pub const SESSION_ENV_VAR: &str = "JOBCHECK_SESSION";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Target of the prediction form.
    pub action_url: String,
    pub session_cookie: Option<String>,
    /// Whether the page has a history table at all.
    pub history_table: bool,
    /// Whether saved predictions are fetched when the page loads.
    pub load_history: bool,
    pub timings: TimingsConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingsConfig {
    pub error_hide_ms: u64,
    pub success_hide_ms: u64,
    pub network_hide_ms: u64,
    pub fade_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub redirect_limit: usize,
    pub max_body_bytes: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            action_url: DEFAULT_ACTION_URL.to_string(),
            session_cookie: None,
            history_table: true,
            load_history: true,
            timings: TimingsConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

impl Default for TimingsConfig {
    fn default() -> Self {
        let timings = Timings::default();
        Self {
            error_hide_ms: millis(timings.error_hide),
            success_hide_ms: millis(timings.success_hide),
            network_hide_ms: millis(timings.network_hide),
            fade_ms: millis(timings.fade),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        let settings = SubmitSettings::default();
        Self {
            connect_timeout_ms: millis(settings.connect_timeout),
            request_timeout_ms: millis(settings.request_timeout),
            redirect_limit: settings.redirect_limit,
            max_body_bytes: settings.max_bytes,
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl AppConfig {
    /// Reads `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                jc_info!("No config at {:?}; using defaults", path);
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("failed to read config {path:?}"));
            }
        };
        let config: Self = ron::from_str(&text).with_context(|| format!("invalid config {path:?}"))?;
        jc_info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(cookie) = lookup(SESSION_ENV_VAR).filter(|value| !value.trim().is_empty()) {
            self.session_cookie = Some(cookie);
        }
    }

    pub fn page_options(&self) -> PageOptions {
        PageOptions {
            history_table: self.history_table,
            timings: Timings {
                error_hide: Duration::from_millis(self.timings.error_hide_ms),
                success_hide: Duration::from_millis(self.timings.success_hide_ms),
                network_hide: Duration::from_millis(self.timings.network_hide_ms),
                fade: Duration::from_millis(self.timings.fade_ms),
            },
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            action_url: self.action_url.clone(),
            session_cookie: self.session_cookie.clone(),
            settings: SubmitSettings {
                connect_timeout: Duration::from_millis(self.http.connect_timeout_ms),
                request_timeout: Duration::from_millis(self.http.request_timeout_ms),
                redirect_limit: self.http.redirect_limit,
                max_bytes: self.http.max_body_bytes,
            },
        }
    }
}
