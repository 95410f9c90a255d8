use serde::{Deserialize, Serialize};
use std::fmt;

use crate::address::Word;

/// A position in a contract's persistent storage.
///
/// Scalar fields occupy `Index` slots. Mapping entries are addressed
/// structurally by the base slot of their mapping, the 32-byte key, and a
/// field offset within the entry, so a slot always knows which mapping it
/// belongs to.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Index(u64),
    Entry { base: u64, key: Word, offset: u64 },
}

impl Slot {
    pub const fn index(n: u64) -> Self {
        Slot::Index(n)
    }

    pub const fn entry(base: u64, key: Word) -> Self {
        Slot::Entry {
            base,
            key,
            offset: 0,
        }
    }

    /// Same entry, a different field within it. No-op on scalar slots.
    pub fn with_offset(self, offset: u64) -> Self {
        match self {
            Slot::Index(n) => Slot::Index(n),
            Slot::Entry { base, key, .. } => Slot::Entry { base, key, offset },
        }
    }

    /// The scalar index, or the mapping base for entries.
    pub fn base(&self) -> u64 {
        match self {
            Slot::Index(n) => *n,
            Slot::Entry { base, .. } => *base,
        }
    }

    pub fn is_entry(&self) -> bool {
        matches!(self, Slot::Entry { .. })
    }
}

impl From<u64> for Slot {
    fn from(n: u64) -> Self {
        Slot::Index(n)
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Index(n) => write!(f, "slot {}", n),
            Slot::Entry { base, key, offset } => {
                write!(f, "slot {}[{}]", base, &key.to_hex()[..12])?;
                if *offset > 0 {
                    write!(f, "+{}", offset)?;
                }
                Ok(())
            }
        }
    }
}
