//! Installation strategy for operator-supplied third-party tools.
//!
//! The four RAID CLIs cannot be redistributed, so the operator supplies the
//! vendor artifact and this strategy validates it before anything touches
//! the system: an empty placeholder is rejected first (the operator never
//! uploaded the real binary), then the digest must match a catalog record
//! trusted for this platform. Only a validated artifact is installed, either
//! as a local deb or as a bare binary, and a fixed-name symlink in the tools
//! directory becomes the stable entry point.

use std::path::{Path, PathBuf};

use crate::capability::Capability;
use crate::catalog::{catalog_for, validate_checksum, VersionRecord};
use crate::error::{HwcapError, Result};
use crate::fsutil;
use crate::pkg::Apt;
use crate::platform::OsPlatform;
use crate::strategy::EngineContext;

/// How a validated artifact lands on the system.
#[derive(Debug, Clone, Copy)]
pub enum TprMechanism {
    /// The artifact is a deb; dpkg installs it and the symlink points at
    /// the vendor's fixed install path.
    DebPackage {
        package: &'static str,
        origin: &'static str,
    },
    /// The artifact is the tool itself; it is marked executable and
    /// symlinked in place.
    DirectBinary,
}

pub struct TprStrategy<'r> {
    capability: Capability,
    mechanism: TprMechanism,
    catalog: &'static [VersionRecord],
    platform: OsPlatform,
    apt: Apt<'r>,
    symlink_bin: PathBuf,
}

impl<'r> TprStrategy<'r> {
    pub fn storcli(ctx: &EngineContext<'r>) -> Self {
        Self::new(
            ctx,
            Capability::StorCli,
            TprMechanism::DebPackage {
                package: "storcli",
                origin: "/opt/MegaRAID/storcli/storcli64",
            },
            catalog_for(Capability::StorCli).unwrap_or(&[]),
        )
    }

    pub fn perccli(ctx: &EngineContext<'r>) -> Self {
        Self::new(
            ctx,
            Capability::PercCli,
            TprMechanism::DebPackage {
                package: "perccli",
                origin: "/opt/MegaRAID/perccli/perccli64",
            },
            catalog_for(Capability::PercCli).unwrap_or(&[]),
        )
    }

    pub fn sas2ircu(ctx: &EngineContext<'r>) -> Self {
        Self::new(
            ctx,
            Capability::Sas2Ircu,
            TprMechanism::DirectBinary,
            catalog_for(Capability::Sas2Ircu).unwrap_or(&[]),
        )
    }

    pub fn sas3ircu(ctx: &EngineContext<'r>) -> Self {
        Self::new(
            ctx,
            Capability::Sas3Ircu,
            TprMechanism::DirectBinary,
            catalog_for(Capability::Sas3Ircu).unwrap_or(&[]),
        )
    }

    fn new(
        ctx: &EngineContext<'r>,
        capability: Capability,
        mechanism: TprMechanism,
        catalog: &'static [VersionRecord],
    ) -> Self {
        TprStrategy {
            capability,
            mechanism,
            catalog,
            platform: ctx.platform,
            apt: Apt::new(ctx.runner, ctx.settings.apt_root.clone()),
            symlink_bin: ctx.settings.tools_dir.join(capability.name()),
        }
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }

    /// Validate the artifact, install it, and publish the symlink.
    ///
    /// The empty-placeholder gate runs before any hashing: a zero-size file
    /// is a missing upload even if its digest happens to be cataloged.
    pub fn install(&self, artifact: &Path) -> Result<()> {
        if fsutil::file_is_empty(artifact)? {
            return Err(HwcapError::MissingArtifact {
                capability: self.capability,
                path: artifact.to_path_buf(),
            });
        }
        if !validate_checksum(self.catalog, &self.platform, artifact)? {
            return Err(HwcapError::ChecksumMismatch {
                capability: self.capability,
                path: artifact.to_path_buf(),
            });
        }
        match self.mechanism {
            TprMechanism::DebPackage { package, origin } => {
                self.apt.install_deb(package, artifact)?;
                fsutil::symlink_replace(Path::new(origin), &self.symlink_bin)
            }
            TprMechanism::DirectBinary => {
                fsutil::make_executable(artifact)?;
                fsutil::symlink_replace(artifact, &self.symlink_bin)
            }
        }
    }

    pub fn remove(&self) -> Result<()> {
        fsutil::remove_symlink(&self.symlink_bin)?;
        if let TprMechanism::DebPackage { package, .. } = self.mechanism {
            self.apt.remove_deb(package)?;
        }
        Ok(())
    }

    pub fn check(&self) -> bool {
        self.symlink_bin.exists() && fsutil::is_executable(&self.symlink_bin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SeriesSupport;
    use crate::platform::Architecture;
    use crate::settings::Settings;
    use crate::shell::testing::ScriptedRunner;
    use std::fs;
    use tempfile::TempDir;

    // sha256 of b"trusted content"
    const TRUSTED_SHA: &str = "c057a979afc2b228aa3dd57b07b444d015a8439d8483cf445b3fb532a7abbc87";
    // sha256 of empty input
    const EMPTY_SHA: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    static TRUSTED_CATALOG: &[VersionRecord] = &[VersionRecord {
        version: "1.0",
        architectures: &[Architecture::X86_64],
        series: SeriesSupport::All,
        sha256: TRUSTED_SHA,
        link: "",
        description: "test",
    }];

    static EMPTY_FILE_CATALOG: &[VersionRecord] = &[VersionRecord {
        version: "1.0",
        architectures: &[Architecture::X86_64],
        series: SeriesSupport::All,
        sha256: EMPTY_SHA,
        link: "",
        description: "test",
    }];

    fn context<'r>(
        runner: &'r ScriptedRunner,
        settings: &'r Settings,
    ) -> EngineContext<'r> {
        EngineContext {
            runner,
            platform: OsPlatform {
                series: None,
                architecture: Architecture::X86_64,
            },
            settings,
        }
    }

    fn test_settings(dir: &TempDir) -> Settings {
        Settings {
            tools_dir: dir.path().join("sbin"),
            apt_root: dir.path().to_path_buf(),
            ..Settings::default()
        }
    }

    fn strategy<'r>(
        ctx: &EngineContext<'r>,
        mechanism: TprMechanism,
        catalog: &'static [VersionRecord],
    ) -> TprStrategy<'r> {
        TprStrategy::new(ctx, Capability::Sas3Ircu, mechanism, catalog)
    }

    fn deb_strategy<'r>(
        ctx: &EngineContext<'r>,
        catalog: &'static [VersionRecord],
    ) -> TprStrategy<'r> {
        TprStrategy::new(
            ctx,
            Capability::StorCli,
            TprMechanism::DebPackage {
                package: "storcli",
                origin: "/opt/MegaRAID/storcli/storcli64",
            },
            catalog,
        )
    }

    #[test]
    fn empty_artifact_is_rejected_before_checksum() {
        let dir = TempDir::new().unwrap();
        let settings = test_settings(&dir);
        let runner = ScriptedRunner::new();
        let ctx = context(&runner, &settings);
        // The empty file's digest is in the catalog, so only the size gate
        // can explain a rejection here.
        let tpr = strategy(&ctx, TprMechanism::DirectBinary, EMPTY_FILE_CATALOG);

        let artifact = dir.path().join("sas3ircu-bin");
        fs::write(&artifact, b"").unwrap();
        let err = tpr.install(&artifact).unwrap_err();
        assert!(matches!(err, HwcapError::MissingArtifact { .. }));
    }

    #[test]
    fn checksum_mismatch_blocks_install() {
        let dir = TempDir::new().unwrap();
        let settings = test_settings(&dir);
        let runner = ScriptedRunner::new();
        let ctx = context(&runner, &settings);
        let tpr = strategy(&ctx, TprMechanism::DirectBinary, TRUSTED_CATALOG);

        let artifact = dir.path().join("sas3ircu-bin");
        fs::write(&artifact, b"tampered content").unwrap();
        let err = tpr.install(&artifact).unwrap_err();
        assert!(matches!(err, HwcapError::ChecksumMismatch { .. }));
        assert!(!dir.path().join("sbin").join("sas3ircu").exists());
    }

    #[test]
    fn direct_binary_install_makes_executable_and_symlinks() {
        let dir = TempDir::new().unwrap();
        let settings = test_settings(&dir);
        fs::create_dir_all(&settings.tools_dir).unwrap();
        let runner = ScriptedRunner::new();
        let ctx = context(&runner, &settings);
        let tpr = strategy(&ctx, TprMechanism::DirectBinary, TRUSTED_CATALOG);

        let artifact = dir.path().join("sas3ircu-bin");
        fs::write(&artifact, b"trusted content").unwrap();
        tpr.install(&artifact).unwrap();

        let link = settings.tools_dir.join("sas3ircu");
        assert_eq!(fs::read_link(&link).unwrap(), artifact);
        assert!(fsutil::is_executable(&artifact));
        assert!(tpr.check());
    }

    #[test]
    fn deb_install_runs_dpkg_and_symlinks_to_origin() {
        let dir = TempDir::new().unwrap();
        let settings = test_settings(&dir);
        fs::create_dir_all(&settings.tools_dir).unwrap();
        let runner = ScriptedRunner::new();
        let ctx = context(&runner, &settings);
        let tpr = deb_strategy(&ctx, TRUSTED_CATALOG);

        let artifact = dir.path().join("storcli.deb");
        fs::write(&artifact, b"trusted content").unwrap();
        tpr.install(&artifact).unwrap();

        assert_eq!(runner.calls_matching("dpkg -i"), 1);
        let link = settings.tools_dir.join("storcli");
        assert_eq!(
            fs::read_link(&link).unwrap(),
            PathBuf::from("/opt/MegaRAID/storcli/storcli64")
        );
    }

    #[test]
    fn remove_unlinks_then_removes_deb() {
        let dir = TempDir::new().unwrap();
        let settings = test_settings(&dir);
        fs::create_dir_all(&settings.tools_dir).unwrap();
        let runner = ScriptedRunner::new();
        let ctx = context(&runner, &settings);
        let tpr = deb_strategy(&ctx, TRUSTED_CATALOG);

        tpr.remove().unwrap();
        assert_eq!(runner.calls_matching("dpkg --remove storcli"), 1);
    }

    #[test]
    fn remove_of_direct_binary_only_unlinks() {
        let dir = TempDir::new().unwrap();
        let settings = test_settings(&dir);
        let runner = ScriptedRunner::new();
        let ctx = context(&runner, &settings);
        let tpr = strategy(&ctx, TprMechanism::DirectBinary, TRUSTED_CATALOG);

        tpr.remove().unwrap();
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn check_requires_executable_symlink_target() {
        let dir = TempDir::new().unwrap();
        let settings = test_settings(&dir);
        fs::create_dir_all(&settings.tools_dir).unwrap();
        let runner = ScriptedRunner::new();
        let ctx = context(&runner, &settings);
        let tpr = strategy(&ctx, TprMechanism::DirectBinary, TRUSTED_CATALOG);

        assert!(!tpr.check());

        let artifact = dir.path().join("sas3ircu-bin");
        fs::write(&artifact, b"trusted content").unwrap();
        tpr.install(&artifact).unwrap();
        assert!(tpr.check());
    }
}
