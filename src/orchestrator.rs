//! Batch install/check/remove across the detected capability set.
//!
//! Installation is all-or-nothing only at the resource gate: if any desired
//! capability's third-party artifact is missing, nothing is installed at
//! all, so the operator fixes uploads once instead of discovering them one
//! failed batch at a time. Past the gate, capabilities are independent:
//! each failure is recorded and the batch keeps going. There is no
//! rollback; a report says exactly what stuck.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::capability::Capability;
use crate::fsutil;
use crate::resource::ResourceProvider;
use crate::strategy::{EngineContext, StrategyRegistry};

/// Outcome of one batch operation.
#[derive(Debug, Serialize)]
pub struct BatchReport {
    pub ok: bool,
    /// Empty when ok; otherwise a one-line summary.
    pub message: String,
    /// Per-capability failure detail, in evaluation order.
    pub failed: BTreeMap<Capability, String>,
    /// TPR resource names the operator still has to supply.
    pub missing_resources: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

impl BatchReport {
    fn success() -> Self {
        BatchReport {
            ok: true,
            message: String::new(),
            failed: BTreeMap::new(),
            missing_resources: Vec::new(),
            generated_at: Utc::now(),
        }
    }

    fn missing(missing_resources: Vec<String>) -> Self {
        BatchReport {
            ok: false,
            message: format!("Missing resources: [{}]", missing_resources.join(", ")),
            failed: BTreeMap::new(),
            missing_resources,
            generated_at: Utc::now(),
        }
    }

    fn failures(prefix: &str, failed: BTreeMap<Capability, String>) -> Self {
        let names: Vec<&str> = failed.keys().map(Capability::name).collect();
        BatchReport {
            ok: false,
            message: format!("{prefix}: [{}]", names.join(", ")),
            failed,
            missing_resources: Vec::new(),
            generated_at: Utc::now(),
        }
    }
}

/// Runs batch operations over the strategy registry.
pub struct Orchestrator<'r> {
    registry: StrategyRegistry<'r>,
}

impl<'r> Orchestrator<'r> {
    pub fn new(ctx: &EngineContext<'r>) -> Self {
        Orchestrator {
            registry: StrategyRegistry::new(ctx),
        }
    }

    /// Install tooling for every desired capability.
    ///
    /// All desired TPR artifacts are fetched and gated up front; an
    /// unsupplied or empty one fails the whole batch before any strategy
    /// runs. Individual strategy failures past the gate do not stop the
    /// remaining strategies.
    pub fn install(
        &self,
        provider: &dyn ResourceProvider,
        desired: &BTreeSet<Capability>,
    ) -> BatchReport {
        let (artifacts, missing) = self.fetch_artifacts(provider, desired);
        if !missing.is_empty() {
            warn!(?missing, "batch install blocked on missing resources");
            return BatchReport::missing(missing);
        }

        let mut failed = BTreeMap::new();
        for strategy in self.registry.iter() {
            let capability = strategy.capability();
            if !desired.contains(&capability) {
                continue;
            }
            let artifact = artifacts.get(&capability).map(PathBuf::as_path);
            match strategy.install(artifact) {
                Ok(()) => info!(%capability, "install succeeded"),
                Err(err) => {
                    warn!(%capability, %err, "install failed");
                    failed.insert(capability, err.to_string());
                }
            }
        }

        if failed.is_empty() {
            BatchReport::success()
        } else {
            BatchReport::failures("Fail strategies", failed)
        }
    }

    /// Health-check every desired capability without side effects.
    pub fn check_installed(&self, desired: &BTreeSet<Capability>) -> BatchReport {
        let mut failed = BTreeMap::new();
        for strategy in self.registry.iter() {
            let capability = strategy.capability();
            if desired.contains(&capability) && !strategy.check() {
                failed.insert(capability, "check failed".to_string());
            }
        }
        if failed.is_empty() {
            BatchReport::success()
        } else {
            BatchReport::failures("Fail strategy checks", failed)
        }
    }

    /// Tear down every desired capability. Best-effort: failures are logged
    /// in the report but the batch always completes and reports ok.
    pub fn remove(&self, desired: &BTreeSet<Capability>) -> BatchReport {
        let mut report = BatchReport::success();
        for strategy in self.registry.iter() {
            let capability = strategy.capability();
            if !desired.contains(&capability) {
                continue;
            }
            match strategy.remove() {
                Ok(()) => info!(%capability, "remove succeeded"),
                Err(err) => {
                    warn!(%capability, %err, "remove failed, continuing");
                    report.failed.insert(capability, err.to_string());
                }
            }
        }
        report
    }

    /// Fetch TPR artifacts for the desired capabilities.
    ///
    /// An unsupplied resource and a zero-size placeholder both count as
    /// missing; the caller gates on the whole list.
    fn fetch_artifacts(
        &self,
        provider: &dyn ResourceProvider,
        desired: &BTreeSet<Capability>,
    ) -> (BTreeMap<Capability, PathBuf>, Vec<String>) {
        let mut artifacts = BTreeMap::new();
        let mut missing = Vec::new();
        for capability in desired {
            let Some(resource) = capability.tpr_resource() else {
                continue;
            };
            match provider.fetch(resource) {
                Ok(path) => {
                    if fsutil::file_is_empty(&path).unwrap_or(true) {
                        warn!(resource, path = %path.display(), "empty resource file");
                        missing.push(resource.to_string());
                    } else {
                        artifacts.insert(*capability, path);
                    }
                }
                Err(err) => {
                    warn!(resource, %err, "failed to fetch resource");
                    missing.push(resource.to_string());
                }
            }
        }
        (artifacts, missing)
    }
}
