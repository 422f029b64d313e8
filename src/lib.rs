//! hwcap - Hardware monitoring capability detection and tool installation.
//!
//! hwcap inspects a bare-metal server, decides which hardware monitoring
//! tools apply to it (RAID CLIs, IPMI utilities, the Redfish API, disk
//! S.M.A.R.T. tooling, GPU telemetry), and installs, checks, or removes
//! that tooling as one orchestrated batch.
//!
//! # Modules
//!
//! - [`capability`] - Capability identifiers and their artifact resources
//! - [`catalog`] - Trusted version catalog and checksum validation
//! - [`cli`] - Command-line interface and dispatch
//! - [`detect`] - Capability detectors over hardware probes
//! - [`error`] - Error types and result alias
//! - [`fsutil`] - Filesystem helpers for tool installation
//! - [`inspect`] - Parsers over OS hardware probe tools
//! - [`orchestrator`] - Batch install/check/remove with reports
//! - [`pkg`] - apt and snap collaborators
//! - [`platform`] - OS series and architecture detection
//! - [`resource`] - Operator-supplied artifact providers
//! - [`settings`] - Engine settings
//! - [`shell`] - Subprocess execution seam
//! - [`strategy`] - Per-capability installation strategies

pub mod capability;
pub mod catalog;
pub mod cli;
pub mod detect;
pub mod error;
pub mod fsutil;
pub mod inspect;
pub mod orchestrator;
pub mod pkg;
pub mod platform;
pub mod resource;
pub mod settings;
pub mod shell;
pub mod strategy;

pub use capability::Capability;
pub use error::{HwcapError, Result};
