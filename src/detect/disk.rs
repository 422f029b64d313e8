//! Disk presence detection for S.M.A.R.T. monitoring.

use std::collections::BTreeSet;

use crate::capability::Capability;
use crate::error::Result;
use crate::inspect::{lshw, LshwNode};
use crate::shell::CommandRunner;

/// Any disk at all means smartctl is worth installing.
pub fn detect(runner: &dyn CommandRunner) -> Result<BTreeSet<Capability>> {
    let disks = lshw::class(runner, "disk")?;
    Ok(from_nodes(&disks))
}

pub fn from_nodes(disks: &[LshwNode]) -> BTreeSet<Capability> {
    if disks.is_empty() {
        BTreeSet::new()
    } else {
        BTreeSet::from([Capability::SmartCtl])
    }
}
