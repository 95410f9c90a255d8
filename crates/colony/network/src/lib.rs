#![deny(unsafe_code)]
//! # colony-network
//!
//! The Colony Network over a single host: one network dispatcher, every
//! colony and extension instance, the deployed implementation modules, and an
//! ordered event log.
//!
//! [`ColonyNetwork`] is the typed entry point. It owns the registries,
//! creates colonies, drives extension lifecycles, and exposes recovery on any
//! contract it knows. Arbitrary calls go through [`ColonyNetwork::call`],
//! which routes them by selector like any other caller would.
//!
//! [`SharedNetwork`] wraps a network for use from many tokio tasks.

pub mod config;
pub mod error;
pub mod events;
pub mod modules;
pub mod network;
pub mod shared;

pub use config::NetworkConfig;
pub use error::{NetworkError, NetworkResult};
pub use events::{EventLog, EventRecord};
pub use modules::{colony_sig, extension_token, network_sig, ColonyCore, NetworkViews};
pub use network::ColonyNetwork;
pub use shared::SharedNetwork;
