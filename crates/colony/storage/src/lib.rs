#![deny(unsafe_code)]
//! # colony-storage
//!
//! The persistent state shared by every implementation module reached through
//! one dispatcher.
//!
//! Modules never address storage positionally. They go through typed
//! [`Field`] and [`Mapping`] handles declared once in [`layout`], so the slot
//! order every module relies on is a compile-time artifact rather than a
//! convention:
//!
//! - [`layout::header`]: slots 0..=6, identical for every contract family
//! - [`layout::colony`], [`layout::extension`], [`layout::network`]: family slots from 7
//!
//! [`Storage`] is a journaled slot map. [`Storage::atomically`] gives
//! all-or-nothing semantics to any closure that returns a `Result`.
//!
//! The numbering in [`layout`] is frozen: recovery edits and cross-module
//! sharing depend on it positionally.

pub mod authority;
pub mod field;
pub mod layout;
pub mod store;
pub mod value;

pub use field::{Field, Mapping};
pub use layout::{layout_for, Family, FieldInfo, FieldKind, Layout, RecoveryHeader};
pub use store::Storage;
pub use value::{MappingKey, SlotValue};
