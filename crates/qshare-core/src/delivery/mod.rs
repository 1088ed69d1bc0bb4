//! Hand-off of a download address to the user's desktop.
//!
//! A [`DeliveryChain`] is an ordered list of [`DeliveryMechanism`]s tried one
//! after another until one succeeds. Every failure is logged and swallowed;
//! the chain itself never errors, it reports [`DeliveryResult::Failed`].
//!
//! The standard chain is: browser launch, platform URL opener, clipboard.

mod clipboard;
mod command;
mod launch;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use clipboard::{copy_to_clipboard, ClipboardCopy};
pub use command::CommandSpec;
pub use launch::{BrowserLaunch, SystemOpener};

/// How (and whether) the address reached the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryResult {
    Opened,
    CopiedToClipboard,
    Failed,
}

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("{0} not configured")]
    NotConfigured(&'static str),
    #[error("could not start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{program}` exited with {status}")]
    Exit {
        program: String,
        status: std::process::ExitStatus,
    },
    #[error("could not write to `{program}`: {source}")]
    Pipe {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("no clipboard tool available")]
    NoClipboard,
}

/// One way of handing an address to the user.
#[async_trait]
pub trait DeliveryMechanism: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// What a successful attempt means for the user.
    fn on_success(&self) -> DeliveryResult;

    async fn attempt(&self, address: &str) -> Result<(), DeliveryError>;
}

/// Commands used by the standard chain (optional section in config.toml).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryConfig {
    /// Browser command, e.g. `"firefox --new-tab"`. Falls back to `$BROWSER`.
    #[serde(default)]
    pub browser: Option<String>,
    /// Overrides the platform URL opener (`xdg-open`, `open`, `start`).
    #[serde(default)]
    pub opener: Option<String>,
    /// Overrides the clipboard tools tried in order, e.g. `["wl-copy"]`.
    #[serde(default)]
    pub clipboard: Option<Vec<String>>,
}

pub struct DeliveryChain {
    mechanisms: Vec<Box<dyn DeliveryMechanism>>,
}

impl DeliveryChain {
    pub fn new(mechanisms: Vec<Box<dyn DeliveryMechanism>>) -> Self {
        Self { mechanisms }
    }

    /// Browser launch, then URL opener, then clipboard.
    pub fn standard(config: &DeliveryConfig) -> Self {
        Self::new(vec![
            Box::new(BrowserLaunch::from_config(config.browser.as_deref())),
            Box::new(SystemOpener::from_config(config.opener.as_deref())),
            Box::new(ClipboardCopy::from_config(config.clipboard.as_deref())),
        ])
    }

    pub fn len(&self) -> usize {
        self.mechanisms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mechanisms.is_empty()
    }

    /// Tries each mechanism in order, stopping at the first success.
    pub async fn deliver(&self, address: &str) -> DeliveryResult {
        for mechanism in &self.mechanisms {
            match mechanism.attempt(address).await {
                Ok(()) => {
                    tracing::debug!(mechanism = mechanism.name(), "delivered {}", address);
                    return mechanism.on_success();
                }
                Err(e) => {
                    tracing::warn!(mechanism = mechanism.name(), "delivery attempt failed: {}", e);
                }
            }
        }
        DeliveryResult::Failed
    }
}
