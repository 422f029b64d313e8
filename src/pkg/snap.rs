//! snapd collaborator.
//!
//! Confined-package install/remove at a channel, plus service health
//! inspection via `snap services`.

use tracing::info;

use crate::error::Result;
use crate::shell::{check_output, CommandRunner};

/// One service declared by an installed snap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapService {
    pub name: String,
    pub startup: String,
    pub current: String,
    pub notes: String,
}

impl SnapService {
    pub fn is_active(&self) -> bool {
        self.current == "active"
    }
}

/// snapd operations over a [`CommandRunner`].
pub struct Snap<'r> {
    runner: &'r dyn CommandRunner,
}

impl<'r> Snap<'r> {
    pub fn new(runner: &'r dyn CommandRunner) -> Self {
        Snap { runner }
    }

    /// Install a snap from the given channel.
    pub fn add(&self, name: &str, channel: &str) -> Result<()> {
        check_output(self.runner, "snap", &["install", name, "--channel", channel])?;
        info!(snap = name, channel, "installed snap");
        Ok(())
    }

    /// Remove a snap.
    pub fn remove(&self, name: &str) -> Result<()> {
        check_output(self.runner, "snap", &["remove", name])?;
        info!(snap = name, "removed snap");
        Ok(())
    }

    /// List the services a snap declares. A snap that declares none yields
    /// an empty list.
    pub fn services(&self, name: &str) -> Result<Vec<SnapService>> {
        let output = self.runner.run("snap", &["services", name])?;
        // snapd reports "has no services" as a failure; that is a valid,
        // empty service list, not an error.
        if !output.success {
            if output.stderr.contains("has no services") {
                return Ok(Vec::new());
            }
            return Err(crate::error::HwcapError::UnderlyingTool {
                tool: format!("snap services {name}"),
                message: output.stderr.trim().to_string(),
            });
        }
        Ok(parse_services(&output.stdout))
    }

    /// Whether every declared service is active. Zero declared services is
    /// healthy by definition; a missing snap is not.
    pub fn healthy(&self, name: &str) -> bool {
        match self.services(name) {
            Ok(services) => services.iter().all(SnapService::is_active),
            Err(_) => false,
        }
    }
}

/// Parse the `snap services` table: a header row then one row of
/// whitespace-separated columns per service.
fn parse_services(output: &str) -> Vec<SnapService> {
    output
        .lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let mut columns = line.split_whitespace();
            let name = columns.next()?.to_string();
            let startup = columns.next().unwrap_or_default().to_string();
            let current = columns.next().unwrap_or_default().to_string();
            let notes = columns.next().unwrap_or_default().to_string();
            Some(SnapService {
                name,
                startup,
                current,
                notes,
            })
        })
        .collect()
}
