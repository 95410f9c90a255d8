#![deny(unsafe_code)]
//! # colony-recovery
//!
//! Emergency repair of a contract's storage.
//!
//! ```text
//!            enter_recovery (recovery role)
//!   Normal ─────────────────────────────────▶ Recovery
//!      ▲                                        │  edit_slot, approve_exit
//!      └────────────────────────────────────────┘
//!            exit_recovery (role + quorum)
//! ```
//!
//! While a contract is in recovery its dispatcher rejects every mutating
//! call. Recovery role holders may write raw words to any slot outside the
//! family's protected set, then approve exit. Each edit starts a new approval
//! round, so approvals always cover the state as finally edited.

pub mod controller;
pub mod error;
pub mod module;
pub mod policy;
pub mod replacement;

pub use controller::RecoveryController;
pub use error::RecoveryError;
pub use module::RecoveryModule;
pub use policy::QuorumPolicy;
pub use replacement::replacement_log_entry;
