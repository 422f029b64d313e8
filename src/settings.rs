//! Engine settings.
//!
//! Fixed paths and tunables the strategies and detectors need. Values are
//! assembled once (by the CLI from flags and environment variables) and
//! passed by reference; nothing here mutates at runtime.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{HwcapError, Result};

/// Default directory that receives one fixed symlink per TPR-backed tool.
pub const DEFAULT_TOOLS_DIR: &str = "/usr/sbin";

/// Snap channels must be `<track>/<risk>`.
const SNAP_RISKS: [&str; 4] = ["stable", "candidate", "beta", "edge"];

/// Runtime settings for the engine.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory holding the per-tool symlinks.
    pub tools_dir: PathBuf,
    /// Filesystem root for apt configuration writes (`/` in production,
    /// a temp dir in tests).
    pub apt_root: PathBuf,
    /// Channel to install the DCGM snap from.
    pub dcgm_snap_channel: String,
    /// Timeout for one Redfish probe attempt.
    pub redfish_timeout: Duration,
    /// Retries after a timed-out Redfish probe attempt.
    pub redfish_retries: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            tools_dir: PathBuf::from(DEFAULT_TOOLS_DIR),
            apt_root: PathBuf::from("/"),
            dcgm_snap_channel: "latest/stable".to_string(),
            redfish_timeout: Duration::from_secs(10),
            redfish_retries: 2,
        }
    }
}

impl Settings {
    /// Validate settings that come from user input.
    pub fn validate(&self) -> Result<()> {
        let Some((track, risk)) = self.dcgm_snap_channel.split_once('/') else {
            return Err(HwcapError::Other(anyhow::anyhow!(
                "snap channel '{}' must be in the form '<track>/<risk>'",
                self.dcgm_snap_channel
            )));
        };
        if track.is_empty() || !SNAP_RISKS.contains(&risk) {
            return Err(HwcapError::Other(anyhow::anyhow!(
                "invalid snap channel '{}': risk must be one of {:?}",
                self.dcgm_snap_channel,
                SNAP_RISKS
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn channel_without_risk_is_rejected() {
        let settings = Settings {
            dcgm_snap_channel: "stable".to_string(),
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn channel_with_unknown_risk_is_rejected() {
        let settings = Settings {
            dcgm_snap_channel: "v4/nightly".to_string(),
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn track_risk_channel_is_accepted() {
        let settings = Settings {
            dcgm_snap_channel: "v4/edge".to_string(),
            ..Settings::default()
        };
        assert!(settings.validate().is_ok());
    }
}
