//! Command-line interface.
//!
//! Argument definitions use clap's derive macros; [`run`] dispatches the
//! parsed command. Reports and capability sets are printed as JSON so the
//! output is scriptable.

use std::collections::BTreeSet;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use crate::capability::Capability;
use crate::detect;
use crate::error::Result;
use crate::orchestrator::{BatchReport, Orchestrator};
use crate::pkg::Apt;
use crate::platform::OsPlatform;
use crate::resource::{DirResourceProvider, NoResources, ResourceProvider};
use crate::settings::{Settings, DEFAULT_TOOLS_DIR};
use crate::shell::SystemRunner;
use crate::strategy::EngineContext;

/// Hardware monitoring capability detection and tool installation.
#[derive(Debug, Parser)]
#[command(name = "hwcap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Directory receiving the per-tool symlinks
    #[arg(long, global = true, env = "HWCAP_TOOLS_DIR", default_value = DEFAULT_TOOLS_DIR)]
    pub tools_dir: PathBuf,

    /// Filesystem root for apt configuration writes
    #[arg(long, global = true, env = "HWCAP_APT_ROOT", default_value = "/", hide = true)]
    pub apt_root: PathBuf,

    /// Channel to install the DCGM snap from
    #[arg(long, global = true, env = "HWCAP_DCGM_CHANNEL", default_value = "latest/stable")]
    pub dcgm_channel: String,

    /// Timeout in seconds for one Redfish probe attempt
    #[arg(long, global = true, env = "HWCAP_REDFISH_TIMEOUT", default_value_t = 10)]
    pub redfish_timeout: u64,

    /// Retries after a timed-out Redfish probe attempt
    #[arg(long, global = true, env = "HWCAP_REDFISH_RETRIES", default_value_t = 2)]
    pub redfish_retries: u32,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Detect which capabilities this machine supports
    Detect,

    /// Install tooling for detected (or explicitly listed) capabilities
    Install(InstallArgs),

    /// Health-check installed tooling
    Check(SelectArgs),

    /// Remove installed tooling (best effort)
    Remove(SelectArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `install` command.
#[derive(Debug, Clone, clap::Args)]
pub struct InstallArgs {
    /// Directory holding operator-supplied tool artifacts, named after
    /// their resources (storcli-deb, perccli-deb, sas2ircu-bin, sas3ircu-bin)
    #[arg(long)]
    pub resource_dir: Option<PathBuf>,

    /// Capabilities to install; detected from hardware when omitted
    #[arg(long = "capability", value_parser = parse_capability)]
    pub capabilities: Vec<Capability>,
}

/// Capability selection shared by `check` and `remove`.
#[derive(Debug, Clone, clap::Args)]
pub struct SelectArgs {
    /// Capabilities to act on; detected from hardware when omitted
    #[arg(long = "capability", value_parser = parse_capability)]
    pub capabilities: Vec<Capability>,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}

fn parse_capability(value: &str) -> std::result::Result<Capability, String> {
    value.parse()
}

impl Cli {
    fn settings(&self) -> Settings {
        Settings {
            tools_dir: self.tools_dir.clone(),
            apt_root: self.apt_root.clone(),
            dcgm_snap_channel: self.dcgm_channel.clone(),
            redfish_timeout: Duration::from_secs(self.redfish_timeout),
            redfish_retries: self.redfish_retries,
        }
    }
}

/// Execute the parsed command.
pub fn run(cli: Cli) -> Result<ExitCode> {
    if let Commands::Completions(args) = &cli.command {
        clap_complete::generate(args.shell, &mut Cli::command(), "hwcap", &mut io::stdout());
        return Ok(ExitCode::SUCCESS);
    }

    let settings = cli.settings();
    settings.validate()?;
    let runner = SystemRunner;
    let platform = OsPlatform::detect()?;
    let ctx = EngineContext {
        runner: &runner,
        platform,
        settings: &settings,
    };

    match cli.command {
        Commands::Detect => {
            let apt = Apt::new(&runner, settings.apt_root.clone());
            let available = detect::detect_available(&runner, &apt, &settings)?;
            println!("{}", render_json(&available)?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Install(args) => {
            let desired = desired_set(&ctx, &args.capabilities)?;
            let provider: Box<dyn ResourceProvider> = match &args.resource_dir {
                Some(dir) => Box::new(DirResourceProvider::new(dir)),
                None => Box::new(NoResources),
            };
            let report = Orchestrator::new(&ctx).install(provider.as_ref(), &desired);
            print_report(&report)
        }
        Commands::Check(args) => {
            let desired = desired_set(&ctx, &args.capabilities)?;
            let report = Orchestrator::new(&ctx).check_installed(&desired);
            print_report(&report)
        }
        Commands::Remove(args) => {
            let desired = desired_set(&ctx, &args.capabilities)?;
            let report = Orchestrator::new(&ctx).remove(&desired);
            print_report(&report)
        }
        Commands::Completions(_) => unreachable!("handled above"),
    }
}

fn desired_set(
    ctx: &EngineContext<'_>,
    explicit: &[Capability],
) -> Result<BTreeSet<Capability>> {
    if explicit.is_empty() {
        let apt = Apt::new(ctx.runner, ctx.settings.apt_root.clone());
        detect::detect_available(ctx.runner, &apt, ctx.settings)
    } else {
        Ok(explicit.iter().copied().collect())
    }
}

fn print_report(report: &BatchReport) -> Result<ExitCode> {
    println!("{}", render_json(report)?);
    if report.ok {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn render_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|err| anyhow::Error::from(err).into())
}
