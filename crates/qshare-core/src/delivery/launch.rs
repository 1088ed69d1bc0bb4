//! Opening the address in a browser or through the platform URL handler.

use async_trait::async_trait;

use super::{CommandSpec, DeliveryError, DeliveryMechanism, DeliveryResult};

/// Starts the user's browser on the address in a detached process.
///
/// Success means the process started; a browser that exits immediately or
/// refuses the address is not detected, the next mechanism is not tried.
#[derive(Debug, Clone)]
pub struct BrowserLaunch {
    command: Option<CommandSpec>,
}

impl BrowserLaunch {
    pub fn new(command: Option<CommandSpec>) -> Self {
        Self { command }
    }

    /// Configured command, else the first entry of `$BROWSER`.
    pub fn from_config(browser: Option<&str>) -> Self {
        let command = browser.and_then(CommandSpec::parse).or_else(|| {
            std::env::var("BROWSER")
                .ok()
                .and_then(|v| v.split(':').next().and_then(CommandSpec::parse))
        });
        Self::new(command)
    }
}

#[async_trait]
impl DeliveryMechanism for BrowserLaunch {
    fn name(&self) -> &'static str {
        "browser"
    }

    fn on_success(&self) -> DeliveryResult {
        DeliveryResult::Opened
    }

    async fn attempt(&self, address: &str) -> Result<(), DeliveryError> {
        let spec = self
            .command
            .as_ref()
            .ok_or(DeliveryError::NotConfigured("browser"))?;
        spec.command()
            .arg(address)
            .spawn()
            .map(drop)
            .map_err(|source| DeliveryError::Spawn {
                program: spec.program.clone(),
                source,
            })
    }
}

/// Passes the address to the platform's URL handler and waits for it to
/// accept the request.
#[derive(Debug, Clone)]
pub struct SystemOpener {
    command: CommandSpec,
}

impl SystemOpener {
    pub fn new(command: CommandSpec) -> Self {
        Self { command }
    }

    pub fn from_config(opener: Option<&str>) -> Self {
        Self::new(
            opener
                .and_then(CommandSpec::parse)
                .unwrap_or_else(platform_opener),
        )
    }
}

fn platform_opener() -> CommandSpec {
    opener_for(std::env::consts::OS)
}

/// URL handler for `os`. The address is always passed as a plain argument,
/// never through a shell, so `&` and `^` in it stay literal.
fn opener_for(os: &str) -> CommandSpec {
    match os {
        "macos" => CommandSpec::new("open", &[]),
        "windows" => CommandSpec::new("rundll32", &["url.dll,FileProtocolHandler"]),
        _ => CommandSpec::new("xdg-open", &[]),
    }
}

#[async_trait]
impl DeliveryMechanism for SystemOpener {
    fn name(&self) -> &'static str {
        "opener"
    }

    fn on_success(&self) -> DeliveryResult {
        DeliveryResult::Opened
    }

    async fn attempt(&self, address: &str) -> Result<(), DeliveryError> {
        let program = self.command.program.clone();
        let status = self
            .command
            .command()
            .arg(address)
            .status()
            .await
            .map_err(|source| DeliveryError::Spawn {
                program: program.clone(),
                source,
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(DeliveryError::Exit { program, status })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn browser_without_command_is_not_configured() {
        let launch = BrowserLaunch::new(None);
        let err = launch.attempt("https://x").await.unwrap_err();
        assert!(matches!(err, DeliveryError::NotConfigured("browser")));
    }

    #[tokio::test]
    async fn browser_missing_program_fails_to_spawn() {
        let launch = BrowserLaunch::new(CommandSpec::parse("qshare-no-such-browser-xyz"));
        let err = launch.attempt("https://x").await.unwrap_err();
        assert!(matches!(err, DeliveryError::Spawn { .. }));
    }

    #[test]
    fn configured_browser_wins_over_env() {
        let launch = BrowserLaunch::from_config(Some("firefox --new-tab"));
        assert_eq!(
            launch.command,
            Some(CommandSpec::new("firefox", &["--new-tab"]))
        );
    }

    #[test]
    fn opener_override() {
        let opener = SystemOpener::from_config(Some("gio open"));
        assert_eq!(opener.command, CommandSpec::new("gio", &["open"]));
        let default = SystemOpener::from_config(None);
        assert_eq!(default.command, platform_opener());
    }

    #[test]
    fn platform_openers_bypass_the_shell() {
        assert_eq!(opener_for("linux"), CommandSpec::new("xdg-open", &[]));
        assert_eq!(opener_for("freebsd"), CommandSpec::new("xdg-open", &[]));
        assert_eq!(opener_for("macos"), CommandSpec::new("open", &[]));
        let windows = opener_for("windows");
        assert_eq!(windows.program, "rundll32");
        assert_eq!(windows.args, vec!["url.dll,FileProtocolHandler".to_string()]);
        for os in ["linux", "macos", "windows"] {
            assert_ne!(opener_for(os).program, "cmd");
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn opener_passes_address_as_single_argument() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("arg.txt");
        let script = format!("printf '%s' \"$1\" > '{}'", out.display());
        let opener = SystemOpener::new(CommandSpec {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), script, "sh".to_string()],
        });
        let address = "https://share.example.com/api/download/A&B%20C";
        opener.attempt(address).await.unwrap();
        assert_eq!(std::fs::read_to_string(&out).unwrap(), address);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn opener_reports_exit_status() {
        let ok = SystemOpener::new(CommandSpec::new("true", &[]));
        assert!(ok.attempt("https://x").await.is_ok());

        let failing = SystemOpener::new(CommandSpec::new("false", &[]));
        let err = failing.attempt("https://x").await.unwrap_err();
        assert!(matches!(err, DeliveryError::Exit { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn browser_spawn_counts_as_opened() {
        let launch = BrowserLaunch::new(Some(CommandSpec::new("true", &[])));
        assert!(launch.attempt("https://x").await.is_ok());
        assert_eq!(launch.on_success(), DeliveryResult::Opened);
    }
}
