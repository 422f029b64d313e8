//! OS package manager collaborators.
//!
//! Thin wrappers over apt/dpkg and snapd, driven through the
//! [`CommandRunner`](crate::shell::CommandRunner) seam so strategies stay
//! testable without a package database.

pub mod apt;
pub mod snap;

pub use apt::{Apt, Repository};
pub use snap::{Snap, SnapService};
