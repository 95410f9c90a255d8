#![deny(unsafe_code)]
//! # colony-types
//!
//! Foundation value types shared by every Colony crate.
//!
//! - [`Address`] and [`Word`]: 20-byte account identifiers and 32-byte storage words
//! - [`Selector`]: 4-byte function identifiers derived from signature text
//! - [`Slot`]: a position in a contract's persistent storage
//! - [`ColonyRole`] / [`RoleSet`]: permission bitmasks scoped to a [`DomainId`]
//! - [`Token`] / [`CallData`]: typed call arguments routed through dispatchers
//! - [`Event`]: observable lifecycle events
//! - [`ErrorCode`]: stable, machine-matchable reason codes

pub mod address;
pub mod call;
pub mod error;
pub mod event;
pub mod ids;
pub mod roles;
pub mod selector;
pub mod slot;

pub use address::{Address, Word};
pub use call::{CallData, Token};
pub use error::{ErrorCode, HexError};
pub use event::{Event, ReputationLogEntry};
pub use ids::{DomainId, ExtensionId, Version};
pub use roles::{ColonyRole, RoleSet};
pub use selector::Selector;
pub use slot::Slot;
