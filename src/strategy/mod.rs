//! Installation strategies.
//!
//! Every capability maps to exactly one [`Strategy`] describing how its
//! tooling gets onto and off the machine. The [`StrategyRegistry`] holds one
//! strategy per capability in the order batch operations walk them.

use std::path::Path;

use crate::capability::Capability;
use crate::error::{HwcapError, Result};
use crate::platform::OsPlatform;
use crate::settings::Settings;
use crate::shell::CommandRunner;

pub mod apt;
pub mod snap;
pub mod tpr;

pub use apt::AptStrategy;
pub use snap::SnapStrategy;
pub use tpr::TprStrategy;

/// Shared context strategies are built from.
pub struct EngineContext<'r> {
    pub runner: &'r dyn CommandRunner,
    pub platform: OsPlatform,
    pub settings: &'r Settings,
}

/// One capability's installation mechanics.
pub enum Strategy<'r> {
    /// Operator-supplied third-party artifact, checksum-gated.
    Tpr(TprStrategy<'r>),
    /// apt packages, optionally from a vendor repository.
    Apt(AptStrategy<'r>),
    /// Snap at a configured channel.
    Snap(SnapStrategy<'r>),
    /// Nothing to install; the capability is pure service discovery.
    NoOp(Capability),
}

impl<'r> Strategy<'r> {
    pub fn capability(&self) -> Capability {
        match self {
            Strategy::Tpr(s) => s.capability(),
            Strategy::Apt(s) => s.capability(),
            Strategy::Snap(s) => s.capability(),
            Strategy::NoOp(capability) => *capability,
        }
    }

    /// Install the capability's tooling. TPR strategies require the
    /// operator-supplied artifact; every other kind ignores it.
    pub fn install(&self, artifact: Option<&Path>) -> Result<()> {
        match self {
            Strategy::Tpr(s) => {
                let path = artifact.ok_or_else(|| HwcapError::MissingArtifact {
                    capability: s.capability(),
                    path: Default::default(),
                })?;
                s.install(path)
            }
            Strategy::Apt(s) => s.install(),
            Strategy::Snap(s) => s.install(),
            Strategy::NoOp(_) => Ok(()),
        }
    }

    pub fn remove(&self) -> Result<()> {
        match self {
            Strategy::Tpr(s) => s.remove(),
            Strategy::Apt(s) => s.remove(),
            Strategy::Snap(s) => s.remove(),
            Strategy::NoOp(_) => Ok(()),
        }
    }

    /// Side-effect-free health check, callable before or after install.
    pub fn check(&self) -> bool {
        match self {
            Strategy::Tpr(s) => s.check(),
            Strategy::Apt(s) => s.check(),
            Strategy::Snap(s) => s.check(),
            Strategy::NoOp(_) => true,
        }
    }
}

/// All strategies, one per capability, in evaluation order.
pub struct StrategyRegistry<'r> {
    strategies: Vec<Strategy<'r>>,
}

impl<'r> StrategyRegistry<'r> {
    pub fn new(ctx: &EngineContext<'r>) -> Self {
        let strategies = vec![
            Strategy::Tpr(TprStrategy::storcli(ctx)),
            Strategy::Tpr(TprStrategy::perccli(ctx)),
            Strategy::Tpr(TprStrategy::sas2ircu(ctx)),
            Strategy::Tpr(TprStrategy::sas3ircu(ctx)),
            Strategy::Apt(AptStrategy::ssacli(ctx)),
            Strategy::Apt(AptStrategy::ipmi_sel(ctx)),
            Strategy::Apt(AptStrategy::ipmi_dcmi(ctx)),
            Strategy::Apt(AptStrategy::ipmi_sensor(ctx)),
            Strategy::NoOp(Capability::Redfish),
            Strategy::Apt(AptStrategy::smartctl(ctx)),
            Strategy::Snap(SnapStrategy::dcgm(ctx)),
        ];
        let declared: Vec<Capability> =
            strategies.iter().map(Strategy::capability).collect();
        assert_eq!(declared, Capability::ALL);
        StrategyRegistry { strategies }
    }

    pub fn get(&self, capability: Capability) -> &Strategy<'r> {
        self.strategies
            .iter()
            .find(|strategy| strategy.capability() == capability)
            .unwrap_or_else(|| unreachable!("registry covers every capability"))
    }

    /// Strategies in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = &Strategy<'r>> {
        self.strategies.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Architecture;
    use crate::shell::testing::ScriptedRunner;

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

    #[test]
    fn registry_covers_every_capability_in_order() {
        let runner = ScriptedRunner::new();
        let settings = Settings::default();
        let registry = StrategyRegistry::new(&context(&runner, &settings));
        let order: Vec<Capability> = registry.iter().map(Strategy::capability).collect();
        assert_eq!(order, Capability::ALL);
    }

    #[test]
    fn lookup_returns_the_matching_strategy() {
        let runner = ScriptedRunner::new();
        let settings = Settings::default();
        let registry = StrategyRegistry::new(&context(&runner, &settings));
        assert_eq!(
            registry.get(Capability::Dcgm).capability(),
            Capability::Dcgm
        );
    }

    #[test]
    fn redfish_strategy_is_a_noop() {
        let runner = ScriptedRunner::new();
        let settings = Settings::default();
        let registry = StrategyRegistry::new(&context(&runner, &settings));
        let redfish = registry.get(Capability::Redfish);
        assert!(redfish.install(None).is_ok());
        assert!(redfish.remove().is_ok());
        assert!(redfish.check());
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn tpr_strategy_requires_an_artifact() {
        let runner = ScriptedRunner::new();
        let settings = Settings::default();
        let registry = StrategyRegistry::new(&context(&runner, &settings));
        let err = registry.get(Capability::StorCli).install(None).unwrap_err();
        assert!(matches!(err, HwcapError::MissingArtifact { .. }));
    }
}
