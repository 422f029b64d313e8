//! Capability detection.
//!
//! Each submodule answers one question about the machine; the available set
//! is their union. lshw failures are fatal (a broken hardware enumerator
//! would silently empty every answer); everything else degrades to "not
//! present".

use std::collections::BTreeSet;

use tracing::info;

use crate::capability::Capability;
use crate::error::Result;
use crate::pkg::Apt;
use crate::settings::Settings;
use crate::shell::CommandRunner;

pub mod bmc;
pub mod disk;
pub mod gpu;
pub mod raid;

/// Detect every capability the machine supports.
pub fn detect_available(
    runner: &dyn CommandRunner,
    apt: &Apt,
    settings: &Settings,
) -> Result<BTreeSet<Capability>> {
    let mut found = raid::detect(runner, apt)?;
    found.extend(bmc::detect(runner, apt, settings));
    found.extend(disk::detect(runner)?);
    found.extend(gpu::detect(runner)?);
    info!(capabilities = ?found, "detection complete");
    Ok(found)
}
