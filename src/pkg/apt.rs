//! apt/dpkg collaborator.
//!
//! Package installs, local deb handling, candidate-version pinning, and
//! vendor repository management. Filesystem writes (sources lists, trust
//! keys) are rooted at a configurable directory so tests never touch
//! `/etc/apt`.
//!
//! Candidate pinning exists because some vendor repositories publish newer
//! builds than the one validated for the running series; `install_pinned`
//! asks `apt-cache policy` for the configured candidate and installs exactly
//! that version string.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::Context;
use regex::Regex;
use tracing::{debug, info};

use crate::error::{HwcapError, Result};
use crate::shell::{check_output, CommandRunner};

/// A vendor apt repository with its signing keys.
#[derive(Debug, Clone, Copy)]
pub struct Repository {
    /// Basename for the sources.list.d entry and key files.
    pub name: &'static str,
    /// Full one-line sources.list entry.
    pub line: &'static str,
    /// Vendor-published armored public keys to trust.
    pub key_urls: &'static [&'static str],
}

/// apt/dpkg operations over a [`CommandRunner`].
pub struct Apt<'r> {
    runner: &'r dyn CommandRunner,
    root: PathBuf,
}

impl<'r> Apt<'r> {
    /// `root` is `/` in production; tests pass a temp dir.
    pub fn new(runner: &'r dyn CommandRunner, root: impl Into<PathBuf>) -> Self {
        Apt {
            runner,
            root: root.into(),
        }
    }

    /// Refresh the package index.
    pub fn update(&self) -> Result<()> {
        check_output(self.runner, "apt-get", &["update"])?;
        Ok(())
    }

    /// Install a package at the resolver's default selection.
    pub fn install(&self, package: &str) -> Result<()> {
        check_output(self.runner, "apt-get", &["install", "-y", package])?;
        info!(package, "installed apt package");
        Ok(())
    }

    /// Install a package pinned to the currently configured candidate
    /// version rather than the resolver's newest selection.
    pub fn install_pinned(&self, package: &str) -> Result<()> {
        let version = self.candidate_version(package)?;
        let pinned = format!("{package}={version}");
        check_output(self.runner, "apt-get", &["install", "-y", &pinned])?;
        info!(package, %version, "installed apt package at candidate version");
        Ok(())
    }

    /// Query `apt-cache policy` for the configured candidate version.
    pub fn candidate_version(&self, package: &str) -> Result<String> {
        static CANDIDATE_RE: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"(?m)^\s*Candidate:\s+(?P<version>\S+)").unwrap());

        let output = check_output(self.runner, "apt-cache", &["policy", package])?;
        match CANDIDATE_RE
            .captures(&output)
            .map(|captures| captures["version"].to_string())
        {
            Some(version) if version != "(none)" => Ok(version),
            _ => Err(HwcapError::UnderlyingTool {
                tool: "apt-cache".to_string(),
                message: format!("no candidate version for {package}"),
            }),
        }
    }

    /// Uninstall a package.
    pub fn remove(&self, package: &str) -> Result<()> {
        check_output(self.runner, "apt-get", &["remove", "-y", package])?;
        info!(package, "removed apt package");
        Ok(())
    }

    /// Whether the package is in the "install ok installed" state.
    pub fn installed(&self, package: &str) -> bool {
        self.runner
            .run("dpkg-query", &["-W", "-f=${Status}", package])
            .map(|output| output.success && output.stdout.contains("install ok installed"))
            .unwrap_or(false)
    }

    /// Install a local deb file.
    pub fn install_deb(&self, package: &str, path: &Path) -> Result<()> {
        let path_arg = path.to_string_lossy();
        check_output(self.runner, "dpkg", &["-i", &path_arg])?;
        info!(package, path = %path.display(), "installed local deb");
        Ok(())
    }

    /// Remove a package installed from a local deb.
    pub fn remove_deb(&self, package: &str) -> Result<()> {
        check_output(self.runner, "dpkg", &["--remove", package])?;
        info!(package, "removed local deb");
        Ok(())
    }

    /// Download and trust the repository's signing keys.
    pub fn import_keys(&self, repo: &Repository) -> Result<()> {
        let key_dir = self.root.join("etc/apt/trusted.gpg.d");
        std::fs::create_dir_all(&key_dir)?;
        for url in repo.key_urls {
            let body = reqwest::blocking::get(*url)
                .and_then(|response| response.error_for_status())
                .and_then(|response| response.bytes())
                .with_context(|| format!("fetching signing key {url}"))?;
            let file_name = url.rsplit('/').next().unwrap_or(repo.name);
            let dest = key_dir.join(format!("{}-{}", repo.name, file_name));
            std::fs::write(&dest, &body)?;
            debug!(url, dest = %dest.display(), "imported repository key");
        }
        Ok(())
    }

    /// Write the repository's sources.list entry and refresh the index.
    pub fn add_repository(&self, repo: &Repository) -> Result<()> {
        let sources_dir = self.root.join("etc/apt/sources.list.d");
        std::fs::create_dir_all(&sources_dir)?;
        let dest = sources_dir.join(format!("{}.list", repo.name));
        std::fs::write(&dest, format!("{}\n", repo.line))?;
        info!(repo = repo.name, "added apt repository");
        self.update()
    }

    /// Disable the repository by commenting its entry out. The file is kept
    /// so an operator can re-enable it; it is never deleted.
    pub fn disable_repository(&self, repo: &Repository) -> Result<()> {
        let dest = self
            .root
            .join("etc/apt/sources.list.d")
            .join(format!("{}.list", repo.name));
        if !dest.exists() {
            debug!(repo = repo.name, "repository entry absent, nothing to disable");
            return Ok(());
        }
        let contents = std::fs::read_to_string(&dest)?;
        let disabled: String = contents
            .lines()
            .map(|line| {
                if line.trim_start().starts_with('#') || line.trim().is_empty() {
                    line.to_string()
                } else {
                    format!("# {line}")
                }
            })
            .collect::<Vec<_>>()
            .join("\n");
        std::fs::write(&dest, disabled + "\n")?;
        info!(repo = repo.name, "disabled apt repository");
        Ok(())
    }
}
