use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;

use futures_util::StreamExt;
use jobcheck_logging::{jc_debug, jc_trace};
use reqwest::cookie::Jar;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::decode::decode_body;
use crate::{HistoryEntry, HistoryError, RawResponse, TransportError, TransportFailure};

/// Header the server uses to tell programmatic requests from page navigation.
pub const REQUESTED_WITH_HEADER: &str = "X-Requested-With";
pub const REQUESTED_WITH_VALUE: &str = "XMLHttpRequest";

#[derive(Debug, Clone)]
pub struct SubmitSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
}

impl Default for SubmitSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
            redirect_limit: 10,
            max_bytes: 1024 * 1024,
        }
    }
}

#[async_trait::async_trait]
pub trait Submitter: Send + Sync {
    /// POSTs the form fields to `action` and returns whatever came back,
    /// whatever the status code.
    async fn submit(
        &self,
        action: &Url,
        fields: &[(String, String)],
    ) -> Result<RawResponse, TransportError>;

    async fn fetch_history(&self, url: &Url) -> Result<Vec<HistoryEntry>, HistoryError>;
}

/// reqwest-backed submitter. Cookies persist across requests through a
/// shared jar, so a session set by one response rides along on the next.
#[derive(Clone)]
pub struct ReqwestSubmitter {
    settings: SubmitSettings,
    jar: Arc<Jar>,
}

impl ReqwestSubmitter {
    pub fn new(settings: SubmitSettings) -> Self {
        Self {
            settings,
            jar: Arc::new(Jar::default()),
        }
    }

    /// Seeds the jar with a `name=value` session cookie scoped to `url`.
    pub fn with_session_cookie(self, cookie: &str, url: &Url) -> Self {
        self.jar.add_cookie_str(cookie, url);
        self
    }

    fn build_client(
        &self,
        redirect_counter: Arc<AtomicUsize>,
    ) -> Result<reqwest::Client, TransportError> {
        let redirect_limit = self.settings.redirect_limit;
        let policy = reqwest::redirect::Policy::custom(move |attempt| {
            let count = attempt.previous().len();
            redirect_counter.store(count, Ordering::Relaxed);
            if count >= redirect_limit {
                attempt.error("redirect limit exceeded")
            } else {
                attempt.follow()
            }
        });

        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .redirect(policy)
            .cookie_provider(self.jar.clone())
            .build()
            .map_err(|err| TransportError::new(TransportFailure::Network, err.to_string()))
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, TransportError> {
        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(too_large(max_bytes, content_len));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(too_large(max_bytes, next_len));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl Submitter for ReqwestSubmitter {
    async fn submit(
        &self,
        action: &Url,
        fields: &[(String, String)],
    ) -> Result<RawResponse, TransportError> {
        let redirect_counter = Arc::new(AtomicUsize::new(0));
        let client = self.build_client(redirect_counter.clone())?;

        let response = client
            .post(action.clone())
            .header(REQUESTED_WITH_HEADER, REQUESTED_WITH_VALUE)
            .form(fields)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let content_type = header_text(&response, CONTENT_TYPE);
        let redirect_count = redirect_counter.load(Ordering::Relaxed);

        let bytes = self.read_body(response).await?;
        let decoded = decode_body(&bytes, content_type.as_deref());
        jc_trace!(
            "POST {} -> {} ({} bytes, {})",
            action,
            status,
            bytes.len(),
            decoded.encoding_label
        );

        Ok(RawResponse {
            status,
            redirected: redirect_count > 0,
            redirect_count,
            final_url,
            content_type,
            body: decoded.text,
        })
    }

    async fn fetch_history(&self, url: &Url) -> Result<Vec<HistoryEntry>, HistoryError> {
        let redirect_counter = Arc::new(AtomicUsize::new(0));
        let client = self.build_client(redirect_counter.clone())?;

        let response = client
            .get(url.clone())
            .header(REQUESTED_WITH_HEADER, REQUESTED_WITH_VALUE)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        if redirect_counter.load(Ordering::Relaxed) > 0 {
            return Err(HistoryError::Redirected(response.url().to_string()));
        }
        let status = response.status();
        if !status.is_success() {
            return Err(HistoryError::HttpStatus(status.as_u16()));
        }

        let content_type = header_text(&response, CONTENT_TYPE);
        let bytes = self.read_body(response).await?;
        let body = decode_body(&bytes, content_type.as_deref()).text;
        if body.trim_start().starts_with('<') {
            return Err(HistoryError::Markup);
        }
        let entries: Vec<HistoryEntry> = serde_json::from_str(&body)
            .map_err(|err| HistoryError::Malformed(err.to_string()))?;
        jc_debug!("GET {} -> {} saved predictions", url, entries.len());
        Ok(entries)
    }
}

fn header_text(
    response: &reqwest::Response,
    name: reqwest::header::HeaderName,
) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string())
}

fn too_large(max_bytes: u64, actual: u64) -> TransportError {
    TransportError::new(
        TransportFailure::TooLarge {
            max_bytes,
            actual: Some(actual),
        },
        "response too large",
    )
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        return TransportError::new(TransportFailure::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return TransportError::new(TransportFailure::RedirectLimitExceeded, err.to_string());
    }
    if err.is_builder() {
        return TransportError::new(TransportFailure::InvalidUrl, err.to_string());
    }
    TransportError::new(TransportFailure::Network, err.to_string())
}
