#![deny(unsafe_code)]
//! # colony-dispatch
//!
//! Signature-routed dispatch. A [`Dispatcher`] is a stable address with its
//! own [`Storage`](colony_storage::Storage); a [`Resolver`] maps each
//! [`Selector`](colony_types::Selector) to the implementation [`Module`] that
//! handles it. Replacing the resolver upgrades every function at once while
//! storage stays put.
//!
//! ```text
//! caller ──▶ Dispatcher ──▶ Resolver.lookup(selector) ──▶ Module.invoke(storage)
//! ```
//!
//! Calls are atomic: a module error rolls back every write the call made.
//! While a dispatcher is in recovery mode, only view and recovery functions
//! are forwarded.

pub mod dispatcher;
pub mod error;
pub mod host;
pub mod interface;
pub mod ledger;
pub mod module;
pub mod resolver;

pub use dispatcher::{CallOutcome, Dispatcher};
pub use error::{DispatchError, ModuleError};
pub use host::Host;
pub use interface::Interface;
pub use ledger::Ledger;
pub use module::{FunctionSpec, Invocation, Module, Mutability};
pub use resolver::{Binding, Resolver};
