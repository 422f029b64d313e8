//! OS platform description.
//!
//! The catalog constrains trusted artifact versions by CPU architecture and
//! Ubuntu series; [`OsPlatform`] captures both, computed once per run.

use std::path::Path;

use crate::error::Result;

/// CPU architecture the engine runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Architecture {
    X86_64,
    Aarch64,
    /// Anything the catalog carries no records for.
    Unsupported,
}

impl Architecture {
    /// Detect the architecture of the running process.
    pub fn current() -> Self {
        match std::env::consts::ARCH {
            "x86_64" => Architecture::X86_64,
            "aarch64" => Architecture::Aarch64,
            _ => Architecture::Unsupported,
        }
    }
}

/// Ubuntu release series, as published in `/etc/os-release` `VERSION_ID`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UbuntuSeries {
    Xenial,
    Bionic,
    Focal,
    Jammy,
    Noble,
}

impl UbuntuSeries {
    fn from_version_id(version_id: &str) -> Option<Self> {
        match version_id {
            "16.04" => Some(UbuntuSeries::Xenial),
            "18.04" => Some(UbuntuSeries::Bionic),
            "20.04" => Some(UbuntuSeries::Focal),
            "22.04" => Some(UbuntuSeries::Jammy),
            "24.04" => Some(UbuntuSeries::Noble),
            _ => None,
        }
    }
}

/// Description of the machine the engine runs on. Immutable once computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OsPlatform {
    /// Ubuntu series, `None` on non-Ubuntu systems or unrecognized releases.
    pub series: Option<UbuntuSeries>,
    pub architecture: Architecture,
}

impl OsPlatform {
    /// Detect the current platform from `/etc/os-release`.
    pub fn detect() -> Result<Self> {
        let contents = std::fs::read_to_string(Path::new("/etc/os-release"))?;
        Ok(Self::from_os_release(&contents, Architecture::current()))
    }

    /// Build a platform description from `os-release` contents.
    ///
    /// Ubuntu derivatives (`ID_LIKE` contains `ubuntu`) are treated as
    /// Ubuntu, as they install from the same archives.
    pub fn from_os_release(contents: &str, architecture: Architecture) -> Self {
        let mut id = None;
        let mut id_like = None;
        let mut version_id = None;
        for line in contents.lines() {
            if let Some((key, value)) = line.split_once('=') {
                let value = value.trim().trim_matches('"');
                match key.trim() {
                    "ID" => id = Some(value.to_string()),
                    "ID_LIKE" => id_like = Some(value.to_string()),
                    "VERSION_ID" => version_id = Some(value.to_string()),
                    _ => {}
                }
            }
        }

        let is_ubuntu = id.as_deref() == Some("ubuntu")
            || id_like
                .as_deref()
                .is_some_and(|like| like.split_whitespace().any(|word| word == "ubuntu"));

        let series = if is_ubuntu {
            version_id
                .as_deref()
                .and_then(UbuntuSeries::from_version_id)
        } else {
            None
        };

        OsPlatform {
            series,
            architecture,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JAMMY_OS_RELEASE: &str = r#"PRETTY_NAME="Ubuntu 22.04.4 LTS"
NAME="Ubuntu"
VERSION_ID="22.04"
VERSION="22.04.4 LTS (Jammy Jellyfish)"
ID=ubuntu
ID_LIKE=debian
"#;

    #[test]
    fn parses_ubuntu_jammy() {
        let platform = OsPlatform::from_os_release(JAMMY_OS_RELEASE, Architecture::X86_64);
        assert_eq!(platform.series, Some(UbuntuSeries::Jammy));
        assert_eq!(platform.architecture, Architecture::X86_64);
    }

    #[test]
    fn ubuntu_derivative_maps_to_series() {
        let contents = "ID=pop\nID_LIKE=\"ubuntu debian\"\nVERSION_ID=\"22.04\"\n";
        let platform = OsPlatform::from_os_release(contents, Architecture::X86_64);
        assert_eq!(platform.series, Some(UbuntuSeries::Jammy));
    }

    #[test]
    fn non_ubuntu_has_no_series() {
        let contents = "ID=fedora\nVERSION_ID=\"39\"\n";
        let platform = OsPlatform::from_os_release(contents, Architecture::X86_64);
        assert_eq!(platform.series, None);
    }

    #[test]
    fn unrecognized_ubuntu_release_has_no_series() {
        let contents = "ID=ubuntu\nVERSION_ID=\"21.10\"\n";
        let platform = OsPlatform::from_os_release(contents, Architecture::X86_64);
        assert_eq!(platform.series, None);
    }

    #[test]
    fn every_lts_version_id_maps() {
        for (id, series) in [
            ("16.04", UbuntuSeries::Xenial),
            ("18.04", UbuntuSeries::Bionic),
            ("20.04", UbuntuSeries::Focal),
            ("22.04", UbuntuSeries::Jammy),
            ("24.04", UbuntuSeries::Noble),
        ] {
            assert_eq!(UbuntuSeries::from_version_id(id), Some(series));
        }
    }

    #[test]
    fn current_architecture_is_known_on_test_hosts() {
        // Test hosts are x86_64 or aarch64; either way this must not panic.
        let _ = Architecture::current();
    }
}
