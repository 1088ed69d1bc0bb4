//! Clipboard write through the platform's command-line clipboard tools.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;

use super::{CommandSpec, DeliveryError, DeliveryMechanism, DeliveryResult};

/// Copies the address to the system clipboard using the first tool that works.
#[derive(Debug, Clone)]
pub struct ClipboardCopy {
    tools: Vec<CommandSpec>,
}

impl ClipboardCopy {
    pub fn new(tools: Vec<CommandSpec>) -> Self {
        Self { tools }
    }

    pub fn from_config(tools: Option<&[String]>) -> Self {
        match tools {
            Some(lines) => Self::new(lines.iter().filter_map(|l| CommandSpec::parse(l)).collect()),
            None => Self::new(platform_tools()),
        }
    }

    /// Writes `text` to the clipboard.
    pub async fn copy(&self, text: &str) -> Result<(), DeliveryError> {
        let mut last_err = DeliveryError::NoClipboard;
        for tool in &self.tools {
            match pipe_into(tool, text).await {
                Ok(()) => return Ok(()),
                // Tool not installed: try the next one quietly.
                Err(DeliveryError::Spawn { source, .. }) if source.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::debug!(tool = %tool.program, "clipboard tool failed: {}", e);
                    last_err = e;
                }
            }
        }
        Err(last_err)
    }
}

/// Copies `text` with the platform clipboard tools (used for share links).
pub async fn copy_to_clipboard(text: &str, tools: Option<&[String]>) -> Result<(), DeliveryError> {
    ClipboardCopy::from_config(tools).copy(text).await
}

fn platform_tools() -> Vec<CommandSpec> {
    if cfg!(target_os = "macos") {
        vec![CommandSpec::new("pbcopy", &[])]
    } else if cfg!(target_os = "windows") {
        vec![CommandSpec::new("clip", &[])]
    } else {
        vec![
            CommandSpec::new("wl-copy", &[]),
            CommandSpec::new("xclip", &["-selection", "clipboard"]),
            CommandSpec::new("xsel", &["--clipboard", "--input"]),
        ]
    }
}

async fn pipe_into(tool: &CommandSpec, text: &str) -> Result<(), DeliveryError> {
    let mut child = tool
        .command()
        .stdin(Stdio::piped())
        .spawn()
        .map_err(|source| DeliveryError::Spawn {
            program: tool.program.clone(),
            source,
        })?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(text.as_bytes())
            .await
            .map_err(|source| DeliveryError::Pipe {
                program: tool.program.clone(),
                source,
            })?;
        // Closing stdin lets the tool finish reading.
        drop(stdin);
    }

    let status = child.wait().await.map_err(|source| DeliveryError::Spawn {
        program: tool.program.clone(),
        source,
    })?;
    if status.success() {
        Ok(())
    } else {
        Err(DeliveryError::Exit {
            program: tool.program.clone(),
            status,
        })
    }
}

#[async_trait]
impl DeliveryMechanism for ClipboardCopy {
    fn name(&self) -> &'static str {
        "clipboard"
    }

    fn on_success(&self) -> DeliveryResult {
        DeliveryResult::CopiedToClipboard
    }

    async fn attempt(&self, address: &str) -> Result<(), DeliveryError> {
        self.copy(address).await
    }
}
