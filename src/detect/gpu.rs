//! NVIDIA GPU detection for DCGM telemetry.

use std::collections::BTreeSet;

use crate::capability::Capability;
use crate::error::Result;
use crate::inspect::{lshw, LshwNode};
use crate::shell::CommandRunner;

/// DCGM applies when any display adapter is NVIDIA; other adapters on the
/// same machine are irrelevant.
pub fn detect(runner: &dyn CommandRunner) -> Result<BTreeSet<Capability>> {
    let displays = lshw::class(runner, "display")?;
    Ok(from_nodes(&displays))
}

pub fn from_nodes(displays: &[LshwNode]) -> BTreeSet<Capability> {
    let has_nvidia = displays.iter().any(|node| {
        node.vendor
            .as_deref()
            .is_some_and(|vendor| vendor.to_lowercase().contains("nvidia"))
    });
    if has_nvidia {
        BTreeSet::from([Capability::Dcgm])
    } else {
        BTreeSet::new()
    }
}
