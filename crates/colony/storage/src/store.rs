use std::collections::BTreeMap;

use colony_types::{Slot, Word};
use tracing::debug;

use crate::field::{Field, Mapping};
use crate::layout::Layout;
use crate::value::{MappingKey, SlotValue};

/// Journaled slot store owned by one dispatcher.
///
/// Unwritten slots read as zero; writing zero removes the slot. While a
/// journal frame is open every write records the previous value so the frame
/// can be undone.
#[derive(Clone, Debug)]
pub struct Storage {
    layout: &'static Layout,
    slots: BTreeMap<Slot, Word>,
    journal: Vec<(Slot, Option<Word>)>,
    depth: usize,
}

impl Storage {
    pub fn new(layout: &'static Layout) -> Self {
        Self {
            layout,
            slots: BTreeMap::new(),
            journal: Vec::new(),
            depth: 0,
        }
    }

    pub fn layout(&self) -> &'static Layout {
        self.layout
    }

    pub fn is_protected(&self, slot: &Slot) -> bool {
        self.layout.is_protected(slot)
    }

    pub fn read(&self, slot: &Slot) -> Word {
        self.slots.get(slot).copied().unwrap_or(Word::ZERO)
    }

    /// Write a raw word, returning the previous value.
    pub fn write(&mut self, slot: Slot, value: Word) -> Word {
        let previous = if value.is_zero() {
            self.slots.remove(&slot)
        } else {
            self.slots.insert(slot, value)
        };
        if self.depth > 0 {
            self.journal.push((slot, previous));
        }
        previous.unwrap_or(Word::ZERO)
    }

    pub fn get<T: SlotValue>(&self, field: Field<T>) -> T {
        T::from_word(&self.read(&field.slot()))
    }

    pub fn set<T: SlotValue>(&mut self, field: Field<T>, value: T) {
        self.write(field.slot(), value.to_word());
    }

    pub fn get_entry<K: MappingKey, V: SlotValue>(&self, mapping: Mapping<K, V>, key: &K) -> V {
        V::from_word(&self.read(&mapping.slot(key)))
    }

    pub fn set_entry<K: MappingKey, V: SlotValue>(
        &mut self,
        mapping: Mapping<K, V>,
        key: &K,
        value: V,
    ) {
        self.write(mapping.slot(key), value.to_word());
    }

    /// Run `f` as one all-or-nothing unit. Frames nest: an inner success is
    /// still undone if an enclosing frame fails.
    pub fn atomically<R, E>(&mut self, f: impl FnOnce(&mut Storage) -> Result<R, E>) -> Result<R, E> {
        let mark = self.journal.len();
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        match result {
            Ok(value) => {
                if self.depth == 0 {
                    self.journal.clear();
                }
                Ok(value)
            }
            Err(err) => {
                self.rollback_to(mark);
                Err(err)
            }
        }
    }

    /// Run `f` and always discard its writes.
    pub fn simulate<R>(&mut self, f: impl FnOnce(&mut Storage) -> R) -> R {
        let mark = self.journal.len();
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        self.rollback_to(mark);
        result
    }

    fn rollback_to(&mut self, mark: usize) {
        let undone = self.journal.len() - mark;
        while self.journal.len() > mark {
            if let Some((slot, previous)) = self.journal.pop() {
                match previous {
                    Some(word) => {
                        self.slots.insert(slot, word);
                    }
                    None => {
                        self.slots.remove(&slot);
                    }
                }
            }
        }
        if self.depth == 0 {
            self.journal.clear();
        }
        if undone > 0 {
            debug!(family = %self.layout.family, writes = undone, "Storage frame rolled back");
        }
    }

    /// Non-zero slots in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (&Slot, &Word)> {
        self.slots.iter()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
