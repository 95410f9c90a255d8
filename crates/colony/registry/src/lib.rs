#![deny(unsafe_code)]
//! # colony-registry
//!
//! The network's catalogues of implementation bundles.
//!
//! - [`VersionRegistry`]: colony versions `1..=N`, append-only, each a
//!   resolver. Colonies move forward by repointing their dispatcher, which
//!   only the network (as dispatcher owner) can do.
//! - [`ExtensionRegistry`]: per-identifier extension versions and the
//!   install / enable / disable / upgrade / deprecate / uninstall lifecycle
//!   of each colony's instances.
//!
//! Catalogue changes require a [`MetaAuthority`], obtained by proving Root in
//! the meta colony.

pub mod authority;
pub mod error;
pub mod extension;
pub mod lifecycle;
pub mod probe;
pub mod version;

#[cfg(test)]
mod testkit;

pub use authority::MetaAuthority;
pub use error::RegistryError;
pub use extension::{default_install_roles, ExtensionRegistry};
pub use lifecycle::ExtensionCore;
pub use version::VersionRegistry;
