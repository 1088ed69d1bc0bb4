//! Remote store addressing: tokens and endpoint URLs.
//!
//! All endpoints are relative to a configured base address (for example
//! `https://share-app-backend.onrender.com/api/`).

use anyhow::{Context, Result};
use std::fmt;
use url::Url;

/// A user-supplied share token with surrounding whitespace removed.
///
/// Case and inner whitespace are preserved; the store decides what is valid.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token(String);

impl Token {
    /// Trims `raw`; returns `None` when nothing is left.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builds the remote store's endpoint addresses from its base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEndpoints {
    base: Url,
}

impl StoreEndpoints {
    /// Parses the base address. A missing trailing slash is added so that
    /// relative joins keep the last path segment (e.g. `/api`).
    pub fn new(base: &str) -> Result<Self> {
        let mut base = Url::parse(base.trim()).with_context(|| format!("invalid base URL: {base}"))?;
        if base.cannot_be_a_base() {
            anyhow::bail!("base URL cannot carry paths: {base}");
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// `download/{token}` – probed with HEAD, delivered with GET.
    pub fn download(&self, token: &Token) -> Url {
        self.with_token("download", token)
    }

    /// `qr-code/{token}` – image of the download address.
    pub fn qr_code(&self, token: &Token) -> Url {
        self.with_token("qr-code", token)
    }

    /// `upload/` for a single file, `upload-multiple/` for several.
    pub fn upload(&self, multiple: bool) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push(if multiple { "upload-multiple" } else { "upload" })
                .push("");
        }
        url
    }

    fn with_token(&self, endpoint: &str, token: &Token) -> Url {
        let mut url = self.base.clone();
        // Checked in `new`: the base always accepts path segments.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(endpoint).push(token.as_str());
        }
        url
    }
}
