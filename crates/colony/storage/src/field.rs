use std::fmt;
use std::marker::PhantomData;

use colony_types::Slot;

use crate::value::MappingKey;

/// A typed handle to a scalar slot.
pub struct Field<T> {
    index: u64,
    _value: PhantomData<fn() -> T>,
}

impl<T> Field<T> {
    pub const fn new(index: u64) -> Self {
        Self {
            index,
            _value: PhantomData,
        }
    }

    pub const fn index(&self) -> u64 {
        self.index
    }

    pub const fn slot(&self) -> Slot {
        Slot::Index(self.index)
    }
}

impl<T> Clone for Field<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Field<T> {}

impl<T> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Field({})", self.index)
    }
}

/// A typed handle to a mapping rooted at a base slot.
///
/// Entries live at `Slot::Entry { base, key, offset }`; multi-field entries
/// use consecutive offsets.
pub struct Mapping<K, V> {
    base: u64,
    _entry: PhantomData<fn(K) -> V>,
}

impl<K: MappingKey, V> Mapping<K, V> {
    pub const fn new(base: u64) -> Self {
        Self {
            base,
            _entry: PhantomData,
        }
    }

    pub const fn base(&self) -> u64 {
        self.base
    }

    pub fn slot(&self, key: &K) -> Slot {
        Slot::entry(self.base, key.key_word())
    }

    pub fn field_slot(&self, key: &K, offset: u64) -> Slot {
        self.slot(key).with_offset(offset)
    }
}

impl<K, V> Clone for Mapping<K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for Mapping<K, V> {}

impl<K, V> fmt::Debug for Mapping<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mapping({})", self.base)
    }
}
