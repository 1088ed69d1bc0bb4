//! File upload to the remote store.
//!
//! Produces the token later consumed by the resolution pipeline. Multipart
//! encoding is left to libcurl's form API; the request runs on the blocking
//! pool like the probe.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str;
use std::time::Duration;

use crate::probe::parse::parse_headers;
use crate::store::{StoreEndpoints, Token};

pub const MSG_NO_FILES: &str = "Please choose at least one file";
pub const MSG_UPLOADED: &str = "Upload successful";

/// Body returned by `upload/` and `upload-multiple/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub token: String,
    /// Direct download address, when the store provides one.
    #[serde(default)]
    pub download_url: Option<String>,
    /// Stored filenames.
    #[serde(default)]
    pub files: Vec<String>,
}

impl UploadReceipt {
    /// The link to hand to a recipient: the store's own address if it sent
    /// one, else `download/{token}`.
    pub fn share_link(&self, endpoints: &StoreEndpoints) -> Option<String> {
        self.download_url
            .clone()
            .filter(|u| !u.trim().is_empty())
            .or_else(|| {
                Token::parse(&self.token).map(|t| endpoints.download(&t).to_string())
            })
    }

    pub fn qr_code(&self, endpoints: &StoreEndpoints) -> Option<String> {
        Token::parse(&self.token).map(|t| endpoints.qr_code(&t).to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("{}", MSG_NO_FILES)]
    NoFiles,
    #[error("single-file upload got {0} files")]
    TooManyFiles(usize),
    #[error("not a readable file: {}", .0.display())]
    MissingFile(PathBuf),
    #[error("upload request failed: {0}")]
    Transport(#[from] curl::Error),
    #[error("could not build upload form: {0}")]
    Form(#[from] curl::FormError),
    #[error("{message}")]
    Rejected { status: u32, message: String },
    #[error("unexpected upload response: {0}")]
    BadResponse(#[from] serde_json::Error),
    #[error("upload task failed: {0}")]
    Task(String),
}

#[derive(Debug, Clone, Copy)]
pub struct UploadOptions {
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            timeout: Duration::from_secs(600),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Uploader {
    endpoints: StoreEndpoints,
    options: UploadOptions,
}

impl Uploader {
    pub fn new(endpoints: StoreEndpoints, options: UploadOptions) -> Self {
        Self { endpoints, options }
    }

    /// Uploads `files`. Single mode posts one `file` field to `upload/`;
    /// multiple mode posts repeated `files` fields to `upload-multiple/`.
    pub async fn upload(
        &self,
        files: &[PathBuf],
        multiple: bool,
    ) -> Result<UploadReceipt, UploadError> {
        if files.is_empty() {
            return Err(UploadError::NoFiles);
        }
        if !multiple && files.len() > 1 {
            return Err(UploadError::TooManyFiles(files.len()));
        }
        if let Some(missing) = files.iter().find(|p| !p.is_file()) {
            return Err(UploadError::MissingFile(missing.clone()));
        }

        let url = self.endpoints.upload(multiple).to_string();
        let field = if multiple { "files" } else { "file" };
        let files = files.to_vec();
        let options = self.options;
        tracing::info!(%url, count = files.len(), "uploading");

        tokio::task::spawn_blocking(move || post_form(&url, field, &files, options))
            .await
            .map_err(|e| UploadError::Task(e.to_string()))?
    }
}

fn post_form(
    url: &str,
    field: &str,
    files: &[PathBuf],
    options: UploadOptions,
) -> Result<UploadReceipt, UploadError> {
    let mut form = curl::easy::Form::new();
    for path in files {
        form.part(field).file(Path::new(path)).add()?;
    }

    let mut header_lines: Vec<String> = Vec::new();
    let mut body: Vec<u8> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.httppost(form)?;
    easy.follow_location(true)?;
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
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let status = easy.response_code()?;
    tracing::debug!(status, "upload response");
    if !(200..300).contains(&status) {
        let message = str::from_utf8(&body)
            .ok()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .or(parse_headers(&header_lines).reason)
            .unwrap_or_else(|| "Upload failed".to_string());
        return Err(UploadError::Rejected { status, message });
    }

    Ok(serde_json::from_slice(&body)?)
}
