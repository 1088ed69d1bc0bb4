//! Token resolution: validate a token, infer its filename, deliver the file.
//!
//! Two entry points with different guarantees:
//! - [`TokenResolutionPipeline::resolve`] probes the store first and only
//!   delivers a token the store did not reject.
//! - [`TokenResolutionPipeline::resolve_and_deliver_immediately`] skips the
//!   probe and opens the download address straight away. Nothing confirms
//!   that the token is valid; only delivery failures are reported.
//!
//! Every user-visible outcome goes through the [`Notifier`]. The busy flag is
//! cleared by a guard on every exit path. Concurrent calls are not
//! serialized: the last one to finish decides the observable state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use url::Url;

use crate::content_disposition::filename_from_header;
use crate::delivery::{DeliveryChain, DeliveryResult};
use crate::notify::Notifier;
use crate::probe::{ProbeOutcome, TokenProbe};
use crate::store::{StoreEndpoints, Token};

pub const MSG_EMPTY_TOKEN: &str = "Please enter a token";
pub const MSG_CHECKING: &str = "Checking token...";
pub const MSG_VALID: &str = "Token valid — starting download";
pub const MSG_NOT_FOUND: &str = "Token not found or expired";
pub const MSG_COPIED: &str = "Popup blocked — download link copied to clipboard";
pub const MSG_DELIVERY_FAILED: &str = "Unable to open or copy download link";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineState {
    #[default]
    Idle,
    Checking,
    Resolved,
    Failed,
}

/// A token the pipeline decided to deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDownload {
    pub token: Token,
    pub download_address: Url,
    /// `None` when the store sent no usable filename metadata.
    pub filename: Option<String>,
}

/// Why a resolution attempt ended without a delivered file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("{}", MSG_EMPTY_TOKEN)]
    EmptyInput,
    #[error("{}", MSG_NOT_FOUND)]
    TokenNotFound,
    #[error("{0}")]
    InvalidRequest(String),
    #[error("{0}")]
    RemoteServerError(String),
    /// No response, or a status the store does not document.
    #[error("{0}")]
    NetworkFailure(String),
    /// Resolved, but no mechanism could hand the address over.
    #[error("{}", MSG_DELIVERY_FAILED)]
    DeliveryFailure,
}

/// A successful resolution: what was resolved and how it reached the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub download: ResolvedDownload,
    pub delivery: DeliveryResult,
}

/// Clears the busy flag when dropped.
struct BusyGuard<'a> {
    busy: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    fn engage(busy: &'a AtomicBool) -> Self {
        busy.store(true, Ordering::SeqCst);
        Self { busy }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::SeqCst);
    }
}

pub struct TokenResolutionPipeline<P> {
    endpoints: StoreEndpoints,
    probe: P,
    delivery: DeliveryChain,
    notifier: Notifier,
    busy: AtomicBool,
    state: Mutex<PipelineState>,
    last: Mutex<Option<ResolvedDownload>>,
}

impl<P: TokenProbe> TokenResolutionPipeline<P> {
    pub fn new(
        endpoints: StoreEndpoints,
        probe: P,
        delivery: DeliveryChain,
        notifier: Notifier,
    ) -> Self {
        Self {
            endpoints,
            probe,
            delivery,
            notifier,
            busy: AtomicBool::new(false),
            state: Mutex::new(PipelineState::Idle),
            last: Mutex::new(None),
        }
    }

    /// True while an attempt is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// State left by the most recent attempt.
    pub fn state(&self) -> PipelineState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Download produced by the most recent successful attempt.
    pub fn last_resolved(&self) -> Option<ResolvedDownload> {
        self.last
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Probes the token, then delivers it.
    ///
    /// A store that rejects HEAD (405) cannot confirm the token, so delivery
    /// goes ahead without a filename and without the "valid" status.
    pub async fn resolve(&self, raw_token: &str) -> Result<Resolution, ResolveError> {
        let _busy = BusyGuard::engage(&self.busy);
        self.set_last(None);

        let Some(token) = Token::parse(raw_token) else {
            self.set_state(PipelineState::Idle);
            return Err(self.fail(ResolveError::EmptyInput));
        };

        self.set_state(PipelineState::Checking);
        self.notifier.info(MSG_CHECKING);

        let outcome = self.probe.probe(&token).await;
        tracing::debug!(%token, ?outcome, "probe classified");

        let download = match outcome {
            ProbeOutcome::Valid(meta) => {
                let download = ResolvedDownload {
                    download_address: self.endpoints.download(&token),
                    filename: filename_from_header(meta.content_disposition.as_deref()),
                    token,
                };
                self.notifier.success(MSG_VALID);
                download
            }
            ProbeOutcome::MethodNotSupported => {
                tracing::warn!(%token, "store does not support HEAD; delivering unvalidated");
                ResolvedDownload {
                    download_address: self.endpoints.download(&token),
                    filename: None,
                    token,
                }
            }
            ProbeOutcome::NotFound => return Err(self.fail(ResolveError::TokenNotFound)),
            ProbeOutcome::InvalidRequest(msg) => {
                return Err(self.fail(ResolveError::InvalidRequest(msg)))
            }
            ProbeOutcome::ServerError(msg) => {
                return Err(self.fail(ResolveError::RemoteServerError(msg)))
            }
            ProbeOutcome::Unknown(msg) => return Err(self.fail(ResolveError::NetworkFailure(msg))),
        };

        self.deliver(download).await
    }

    /// Opens the download address without probing the token first.
    pub async fn resolve_and_deliver_immediately(
        &self,
        raw_token: &str,
    ) -> Result<Resolution, ResolveError> {
        let _busy = BusyGuard::engage(&self.busy);
        self.set_last(None);

        let Some(token) = Token::parse(raw_token) else {
            self.set_state(PipelineState::Idle);
            return Err(self.fail(ResolveError::EmptyInput));
        };

        let download = ResolvedDownload {
            download_address: self.endpoints.download(&token),
            filename: None,
            token,
        };
        self.deliver(download).await
    }

    /// Hands the address to the delivery chain. The download stays resolved
    /// even when every mechanism fails, so callers can still show the address.
    async fn deliver(&self, download: ResolvedDownload) -> Result<Resolution, ResolveError> {
        self.set_last(Some(download.clone()));
        self.set_state(PipelineState::Resolved);

        let delivery = self.delivery.deliver(download.download_address.as_str()).await;
        match delivery {
            DeliveryResult::Opened => {}
            DeliveryResult::CopiedToClipboard => {
                self.notifier.info(MSG_COPIED);
            }
            DeliveryResult::Failed => {
                self.notifier.error(MSG_DELIVERY_FAILED);
                return Err(ResolveError::DeliveryFailure);
            }
        }
        Ok(Resolution { download, delivery })
    }

    /// Reports `err` and records the failed state; returns it for `Err(..)`.
    fn fail(&self, err: ResolveError) -> ResolveError {
        if err != ResolveError::EmptyInput {
            self.set_state(PipelineState::Failed);
        }
        self.notifier.error(err.to_string());
        err
    }

    fn set_state(&self, state: PipelineState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }

    fn set_last(&self, download: Option<ResolvedDownload>) {
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = download;
    }
}
