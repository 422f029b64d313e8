//! Installation strategy for tools shipped as snaps.

use crate::capability::Capability;
use crate::error::Result;
use crate::pkg::Snap;
use crate::strategy::EngineContext;

pub struct SnapStrategy<'r> {
    capability: Capability,
    snap_name: &'static str,
    channel: String,
    snap: Snap<'r>,
}

impl<'r> SnapStrategy<'r> {
    pub fn dcgm(ctx: &EngineContext<'r>) -> Self {
        SnapStrategy {
            capability: Capability::Dcgm,
            snap_name: "dcgm",
            channel: ctx.settings.dcgm_snap_channel.clone(),
            snap: Snap::new(ctx.runner),
        }
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }

    pub fn install(&self) -> Result<()> {
        self.snap.add(self.snap_name, &self.channel)
    }

    pub fn remove(&self) -> Result<()> {
        self.snap.remove(self.snap_name)
    }

    /// Healthy when every declared service is active.
    pub fn check(&self) -> bool {
        self.snap.healthy(self.snap_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{Architecture, OsPlatform};
    use crate::settings::Settings;
    use crate::shell::testing::ScriptedRunner;
    use crate::shell::CommandOutput;

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
    fn installs_from_configured_channel() {
        let runner = ScriptedRunner::new();
        let settings = Settings {
            dcgm_snap_channel: "v4/edge".to_string(),
            ..Settings::default()
        };
        let ctx = context(&runner, &settings);
        SnapStrategy::dcgm(&ctx).install().unwrap();
        assert_eq!(
            runner.calls_matching("snap install dcgm --channel v4/edge"),
            1
        );
    }

    #[test]
    fn check_reflects_service_health() {
        let runner = ScriptedRunner::new().with_rule(
            "snap services dcgm",
            CommandOutput::ok(
                "Service              Startup  Current   Notes\n\
                 dcgm.nv-hostengine   enabled  inactive  -\n",
            ),
        );
        let settings = Settings::default();
        let ctx = context(&runner, &settings);
        assert!(!SnapStrategy::dcgm(&ctx).check());
    }
}
