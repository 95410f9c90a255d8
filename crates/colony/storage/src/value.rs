//! Conversions between typed values and 32-byte storage words.

use colony_types::{Address, DomainId, ExtensionId, RoleSet, Version, Word};

/// A value that fits in exactly one storage word.
pub trait SlotValue: Sized {
    fn to_word(&self) -> Word;
    fn from_word(word: &Word) -> Self;
}

/// A value usable as a mapping key.
pub trait MappingKey {
    fn key_word(&self) -> Word;
}

impl SlotValue for Word {
    fn to_word(&self) -> Word {
        *self
    }

    fn from_word(word: &Word) -> Self {
        *word
    }
}

impl SlotValue for Address {
    fn to_word(&self) -> Word {
        Word::from_address(self)
    }

    fn from_word(word: &Word) -> Self {
        word.to_address()
    }
}

impl SlotValue for bool {
    fn to_word(&self) -> Word {
        Word::from_bool(*self)
    }

    fn from_word(word: &Word) -> Self {
        !word.is_zero()
    }
}

impl SlotValue for u64 {
    fn to_word(&self) -> Word {
        Word::from_u64(*self)
    }

    fn from_word(word: &Word) -> Self {
        word.low_u64()
    }
}

impl SlotValue for u128 {
    fn to_word(&self) -> Word {
        Word::from_u128(*self)
    }

    fn from_word(word: &Word) -> Self {
        word.low_u128()
    }
}

impl SlotValue for i128 {
    fn to_word(&self) -> Word {
        Word::from_i128(*self)
    }

    fn from_word(word: &Word) -> Self {
        word.low_i128()
    }
}

impl SlotValue for Version {
    fn to_word(&self) -> Word {
        Word::from_u64(self.0)
    }

    fn from_word(word: &Word) -> Self {
        Version(word.low_u64())
    }
}

impl SlotValue for DomainId {
    fn to_word(&self) -> Word {
        Word::from_u64(self.0)
    }

    fn from_word(word: &Word) -> Self {
        DomainId(word.low_u64())
    }
}

impl SlotValue for RoleSet {
    fn to_word(&self) -> Word {
        Word::from_u64(self.0 as u64)
    }

    fn from_word(word: &Word) -> Self {
        RoleSet(word.0[31])
    }
}

impl SlotValue for ExtensionId {
    fn to_word(&self) -> Word {
        Word(self.0)
    }

    fn from_word(word: &Word) -> Self {
        ExtensionId(word.0)
    }
}

impl MappingKey for Word {
    fn key_word(&self) -> Word {
        *self
    }
}

impl MappingKey for Address {
    fn key_word(&self) -> Word {
        Word::from_address(self)
    }
}

impl MappingKey for u64 {
    fn key_word(&self) -> Word {
        Word::from_u64(*self)
    }
}

impl MappingKey for Version {
    fn key_word(&self) -> Word {
        Word::from_u64(self.0)
    }
}

impl MappingKey for DomainId {
    fn key_word(&self) -> Word {
        Word::from_u64(self.0)
    }
}

impl MappingKey for ExtensionId {
    fn key_word(&self) -> Word {
        Word(self.0)
    }
}

impl<A: MappingKey, B: MappingKey> MappingKey for (A, B) {
    fn key_word(&self) -> Word {
        Word::combine(&[self.0.key_word(), self.1.key_word()])
    }
}
