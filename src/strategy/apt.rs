//! Installation strategy for tools shipped as apt packages.
//!
//! Most packages come straight from the Ubuntu archive at the configured
//! candidate version. ssacli is the exception: HPE publishes it from their
//! own repository, so its install first trusts the HPE signing keys and
//! registers the repository. Removal uninstalls the packages and disables
//! (never deletes) any repository the install added.

use crate::capability::Capability;
use crate::error::Result;
use crate::pkg::{Apt, Repository};
use crate::strategy::EngineContext;

/// HPE Management Component Pack, the source of ssacli.
pub const HPE_MCP_REPOSITORY: Repository = Repository {
    name: "hpe-mcp",
    line: "deb http://downloads.linux.hpe.com/SDR/repo/mcp stretch/current non-free",
    key_urls: &[
        "https://downloads.linux.hpe.com/SDR/hpePublicKey2048_key1.pub",
        "https://downloads.linux.hpe.com/SDR/hpePublicKey2048_key2.pub",
    ],
};

/// One package a strategy manages.
#[derive(Debug, Clone, Copy)]
pub struct AptPackage {
    pub name: &'static str,
    /// Whether to pin the install to the apt candidate version.
    pub pinned: bool,
}

pub struct AptStrategy<'r> {
    capability: Capability,
    packages: &'static [AptPackage],
    repository: Option<Repository>,
    apt: Apt<'r>,
}

impl<'r> AptStrategy<'r> {
    pub fn ssacli(ctx: &EngineContext<'r>) -> Self {
        Self::new(
            ctx,
            Capability::SsaCli,
            &[AptPackage {
                name: "ssacli",
                pinned: false,
            }],
            Some(HPE_MCP_REPOSITORY),
        )
    }

    pub fn ipmi_sel(ctx: &EngineContext<'r>) -> Self {
        // ipmiseld polls the SEL into syslog alongside the probe tools.
        Self::new(
            ctx,
            Capability::IpmiSel,
            &[
                AptPackage {
                    name: "freeipmi-tools",
                    pinned: true,
                },
                AptPackage {
                    name: "freeipmi-ipmiseld",
                    pinned: true,
                },
            ],
            None,
        )
    }

    pub fn ipmi_dcmi(ctx: &EngineContext<'r>) -> Self {
        Self::new(
            ctx,
            Capability::IpmiDcmi,
            &[AptPackage {
                name: "freeipmi-tools",
                pinned: true,
            }],
            None,
        )
    }

    pub fn ipmi_sensor(ctx: &EngineContext<'r>) -> Self {
        Self::new(
            ctx,
            Capability::IpmiSensor,
            &[AptPackage {
                name: "freeipmi-tools",
                pinned: true,
            }],
            None,
        )
    }

    pub fn smartctl(ctx: &EngineContext<'r>) -> Self {
        Self::new(
            ctx,
            Capability::SmartCtl,
            &[AptPackage {
                name: "smartmontools",
                pinned: true,
            }],
            None,
        )
    }

    fn new(
        ctx: &EngineContext<'r>,
        capability: Capability,
        packages: &'static [AptPackage],
        repository: Option<Repository>,
    ) -> Self {
        AptStrategy {
            capability,
            packages,
            repository,
            apt: Apt::new(ctx.runner, ctx.settings.apt_root.clone()),
        }
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }

    pub fn install(&self) -> Result<()> {
        if let Some(repo) = &self.repository {
            self.apt.import_keys(repo)?;
            self.apt.add_repository(repo)?;
        }
        for package in self.packages {
            if package.pinned {
                self.apt.install_pinned(package.name)?;
            } else {
                self.apt.install(package.name)?;
            }
        }
        Ok(())
    }

    pub fn remove(&self) -> Result<()> {
        for package in self.packages {
            self.apt.remove(package.name)?;
        }
        if let Some(repo) = &self.repository {
            self.apt.disable_repository(repo)?;
        }
        Ok(())
    }

    pub fn check(&self) -> bool {
        self.packages
            .iter()
            .all(|package| self.apt.installed(package.name))
    }
}
