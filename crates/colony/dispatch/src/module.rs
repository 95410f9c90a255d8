use colony_storage::{authority, layout::header, Storage};
use colony_types::{Address, ColonyRole, DomainId, Event, Selector, Slot, Token, Word};
use serde::{Deserialize, Serialize};

use crate::error::ModuleError;

/// How a function interacts with storage and recovery mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mutability {
    /// Reads only. Any writes are discarded after the call.
    View,
    /// Ordinary state change. Rejected while the contract is in recovery.
    Mutating,
    /// Recovery entry point. Forwarded in recovery mode; gates itself.
    Recovery,
}

/// One externally callable function of a module.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FunctionSpec {
    pub signature: &'static str,
    /// The contract family that declares the function. Two modules may both
    /// implement a selector only when they share its origin.
    pub origin: &'static str,
    pub mutability: Mutability,
}

impl FunctionSpec {
    pub const fn view(signature: &'static str, origin: &'static str) -> Self {
        Self {
            signature,
            origin,
            mutability: Mutability::View,
        }
    }

    pub const fn mutating(signature: &'static str, origin: &'static str) -> Self {
        Self {
            signature,
            origin,
            mutability: Mutability::Mutating,
        }
    }

    pub const fn recovery(signature: &'static str, origin: &'static str) -> Self {
        Self {
            signature,
            origin,
            mutability: Mutability::Recovery,
        }
    }

    pub fn selector(&self) -> Selector {
        Selector::from_signature(self.signature)
    }
}

/// A stateless implementation module.
///
/// Modules own no storage of their own: every invocation runs against the
/// calling dispatcher's [`Storage`].
pub trait Module: Send + Sync {
    fn name(&self) -> &str;

    fn functions(&self) -> Vec<FunctionSpec>;

    fn invoke(&self, call: &mut Invocation<'_>) -> Result<Vec<Token>, ModuleError>;

    fn function(&self, selector: Selector) -> Option<FunctionSpec> {
        self.functions()
            .into_iter()
            .find(|f| f.selector() == selector)
    }
}

/// The execution context handed to a module.
pub struct Invocation<'a> {
    pub caller: Address,
    /// The dispatcher whose storage is in use.
    pub this: Address,
    pub selector: Selector,
    pub args: &'a [Token],
    pub storage: &'a mut Storage,
    events: &'a mut Vec<Event>,
}

impl<'a> Invocation<'a> {
    pub fn new(
        caller: Address,
        this: Address,
        selector: Selector,
        args: &'a [Token],
        storage: &'a mut Storage,
        events: &'a mut Vec<Event>,
    ) -> Self {
        Self {
            caller,
            this,
            selector,
            args,
            storage,
            events,
        }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    fn arg(&self, index: usize) -> Result<&Token, ModuleError> {
        self.args
            .get(index)
            .ok_or_else(|| ModuleError::bad_argument(index, "present"))
    }

    pub fn address_arg(&self, index: usize) -> Result<Address, ModuleError> {
        self.arg(index)?
            .as_address()
            .ok_or_else(|| ModuleError::bad_argument(index, "an address"))
    }

    pub fn uint_arg(&self, index: usize) -> Result<u128, ModuleError> {
        self.arg(index)?
            .as_uint()
            .ok_or_else(|| ModuleError::bad_argument(index, "an unsigned integer"))
    }

    pub fn u64_arg(&self, index: usize) -> Result<u64, ModuleError> {
        let value = self.uint_arg(index)?;
        u64::try_from(value).map_err(|_| ModuleError::bad_argument(index, "at most 64 bits"))
    }

    pub fn int_arg(&self, index: usize) -> Result<i128, ModuleError> {
        self.arg(index)?
            .as_int()
            .ok_or_else(|| ModuleError::bad_argument(index, "a signed integer"))
    }

    pub fn bool_arg(&self, index: usize) -> Result<bool, ModuleError> {
        self.arg(index)?
            .as_bool()
            .ok_or_else(|| ModuleError::bad_argument(index, "a bool"))
    }

    pub fn word_arg(&self, index: usize) -> Result<Word, ModuleError> {
        self.arg(index)?
            .as_word()
            .ok_or_else(|| ModuleError::bad_argument(index, "a 32-byte word"))
    }

    pub fn slot_arg(&self, index: usize) -> Result<Slot, ModuleError> {
        self.arg(index)?
            .as_slot()
            .ok_or_else(|| ModuleError::bad_argument(index, "a storage slot"))
    }

    pub fn owner(&self) -> Address {
        self.storage.get(header::OWNER)
    }

    pub fn require_owner(&self) -> Result<(), ModuleError> {
        if self.caller == self.owner() {
            Ok(())
        } else {
            Err(ModuleError::unauthorized(self.caller, "ownership"))
        }
    }

    pub fn require_role(&self, domain: DomainId, role: ColonyRole) -> Result<(), ModuleError> {
        if authority::has_role(&*self.storage, &self.caller, domain, role) {
            Ok(())
        } else {
            Err(ModuleError::unauthorized(
                self.caller,
                &format!("{role} in domain {domain}"),
            ))
        }
    }
}
