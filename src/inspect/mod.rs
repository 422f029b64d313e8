//! Platform inspection: structured parsers over OS hardware probe tools.
//!
//! - [`lshw`] - JSON hardware tree (whole machine or class-filtered)
//! - [`hwinfo`] - free-text record blocks split on numbered headers
//! - [`bmc`] - BMC LAN address extraction via ipmitool

pub mod bmc;
pub mod hwinfo;
pub mod lshw;

pub use lshw::LshwNode;
