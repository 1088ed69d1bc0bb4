use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::delivery::DeliveryConfig;
use crate::probe::ProbeOptions;
use crate::store::StoreEndpoints;
use crate::upload::UploadOptions;

pub const DEFAULT_BASE_URL: &str = "https://share-app-backend.onrender.com/api/";

/// Global configuration loaded from `~/.config/qshare/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QshareConfig {
    /// Base address of the remote store; endpoints are joined onto it.
    pub base_url: String,
    /// Connect timeout in seconds for every request.
    pub connect_timeout_secs: u64,
    /// Total timeout in seconds for a token probe.
    pub probe_timeout_secs: u64,
    /// Total timeout in seconds for an upload.
    pub upload_timeout_secs: u64,
    /// Optional delivery commands; if missing, platform defaults are used.
    #[serde(default)]
    pub delivery: Option<DeliveryConfig>,
}

impl Default for QshareConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout_secs: 15,
            probe_timeout_secs: 30,
            upload_timeout_secs: 600,
            delivery: None,
        }
    }
}

impl QshareConfig {
    pub fn endpoints(&self) -> Result<StoreEndpoints> {
        StoreEndpoints::new(&self.base_url)
    }

    pub fn probe_options(&self) -> ProbeOptions {
        ProbeOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            timeout: Duration::from_secs(self.probe_timeout_secs),
        }
    }

    pub fn upload_options(&self) -> UploadOptions {
        UploadOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            timeout: Duration::from_secs(self.upload_timeout_secs),
        }
    }

    pub fn delivery(&self) -> DeliveryConfig {
        self.delivery.clone().unwrap_or_default()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("qshare")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<QshareConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = QshareConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)
        .with_context(|| format!("read config {}", path.display()))?;
    let cfg: QshareConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = QshareConfig::default();
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.connect_timeout_secs, 15);
        assert_eq!(cfg.probe_timeout_secs, 30);
        assert_eq!(cfg.upload_timeout_secs, 600);
        assert!(cfg.delivery.is_none());
        assert!(cfg.endpoints().is_ok());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = QshareConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: QshareConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_toml_delivery_section() {
        let toml = r#"
            base_url = "http://127.0.0.1:8000/api"
            connect_timeout_secs = 5
            probe_timeout_secs = 10
            upload_timeout_secs = 60

            [delivery]
            browser = "firefox --new-tab"
            clipboard = ["wl-copy"]
        "#;
        let cfg: QshareConfig = toml::from_str(toml).unwrap();
        let delivery = cfg.delivery();
        assert_eq!(delivery.browser.as_deref(), Some("firefox --new-tab"));
        assert!(delivery.opener.is_none());
        assert_eq!(delivery.clipboard, Some(vec!["wl-copy".to_string()]));
        assert_eq!(
            cfg.endpoints().unwrap().base().as_str(),
            "http://127.0.0.1:8000/api/"
        );
    }

    #[test]
    fn timeouts_map_to_options() {
        let cfg = QshareConfig {
            connect_timeout_secs: 3,
            probe_timeout_secs: 7,
            upload_timeout_secs: 90,
            ..QshareConfig::default()
        };
        assert_eq!(cfg.probe_options().connect_timeout, Duration::from_secs(3));
        assert_eq!(cfg.probe_options().timeout, Duration::from_secs(7));
        assert_eq!(cfg.upload_options().timeout, Duration::from_secs(90));
    }
}
