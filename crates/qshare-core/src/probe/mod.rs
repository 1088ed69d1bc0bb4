//! Token validation by metadata-only probe.
//!
//! Uses the curl crate (libcurl) with `nobody(true)` so a probe is always a
//! HEAD request: the stored file's bytes are never transferred or touched.
//! The response status is classified into a [`ProbeOutcome`].

mod classify;
pub(crate) mod parse;

use async_trait::async_trait;
use std::str;
use std::time::Duration;

use crate::store::{StoreEndpoints, Token};

pub use classify::{classify_response, INVALID_REQUEST, SERVER_ERROR, VALIDATE_FAILED};

/// Metadata carried by a probe response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeMetadata {
    /// `Content-Disposition` value if present (filename hint).
    pub content_disposition: Option<String>,
    /// `Content-Type` value if present.
    pub content_type: Option<String>,
    /// Size in bytes, if `Content-Length` is present.
    pub content_length: Option<u64>,
    /// Reason phrase of the final status line (absent on HTTP/2).
    pub reason: Option<String>,
}

/// Classified result of one validation attempt. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// 2xx: the token currently references a file.
    Valid(ProbeMetadata),
    /// 404.
    NotFound,
    /// 422, with the store's validation message or a generic one.
    InvalidRequest(String),
    /// 500, with the store's text or a generic one.
    ServerError(String),
    /// 405: the store cannot answer a metadata-only probe.
    MethodNotSupported,
    /// Any other status, or no response at all.
    Unknown(String),
}

/// Validates a token against the remote store.
#[async_trait]
pub trait TokenProbe: Send + Sync {
    async fn probe(&self, token: &Token) -> ProbeOutcome;
}

/// Transport timeouts for the probe request.
#[derive(Debug, Clone, Copy)]
pub struct ProbeOptions {
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            timeout: Duration::from_secs(30),
        }
    }
}

/// HEAD prober backed by libcurl, run on the blocking pool.
#[derive(Debug, Clone)]
pub struct CurlProbe {
    endpoints: StoreEndpoints,
    options: ProbeOptions,
}

impl CurlProbe {
    pub fn new(endpoints: StoreEndpoints, options: ProbeOptions) -> Self {
        Self { endpoints, options }
    }
}

#[async_trait]
impl TokenProbe for CurlProbe {
    async fn probe(&self, token: &Token) -> ProbeOutcome {
        let url = self.endpoints.download(token).to_string();
        let options = self.options;
        tracing::debug!(%url, "probing token");

        let response = tokio::task::spawn_blocking(move || head(&url, options)).await;
        match response {
            Ok(Ok(raw)) => {
                tracing::debug!(status = raw.status, "probe response");
                let meta = parse::parse_headers(&raw.header_lines);
                classify_response(raw.status, meta, &raw.body)
            }
            Ok(Err(e)) => {
                tracing::warn!("probe request failed: {}", e);
                ProbeOutcome::Unknown(e.to_string())
            }
            Err(e) => {
                tracing::warn!("probe task failed: {}", e);
                ProbeOutcome::Unknown(e.to_string())
            }
        }
    }
}

/// Raw HEAD response as captured by curl.
struct RawResponse {
    status: u32,
    header_lines: Vec<String>,
    body: Vec<u8>,
}

/// Performs the HEAD request. Follows redirects; a non-2xx status is not an
/// error here, only transport failures are.
fn head(url: &str, options: ProbeOptions) -> Result<RawResponse, curl::Error> {
    let mut header_lines: Vec<String> = Vec::new();
    let mut body: Vec<u8> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.nobody(true)?; // HEAD request
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(options.connect_timeout)?;
    easy.timeout(options.timeout)?;

    {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                header_lines.push(s.trim_end().to_string());
            }
            true
        })?;
        // Only reached if a server sends a body despite HEAD.
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let status = easy.response_code()?;
    Ok(RawResponse {
        status,
        header_lines,
        body,
    })
}
