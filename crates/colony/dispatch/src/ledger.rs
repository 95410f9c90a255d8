use std::collections::BTreeMap;

use colony_types::{Address, CallData};
use tracing::info;

use crate::dispatcher::{CallOutcome, Dispatcher};
use crate::error::DispatchError;
use crate::host::Host;

/// Every deployed dispatcher plus the native balance of each address.
#[derive(Clone, Debug, Default)]
pub struct Ledger {
    contracts: BTreeMap<Address, Dispatcher>,
    balances: BTreeMap<Address, u128>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deploy(&mut self, dispatcher: Dispatcher) -> Address {
        let address = dispatcher.address();
        info!(
            address = %address,
            family = %dispatcher.storage().layout().family,
            "Dispatcher deployed"
        );
        self.contracts.insert(address, dispatcher);
        address
    }

    pub fn contract(&self, address: &Address) -> Result<&Dispatcher, DispatchError> {
        self.contracts
            .get(address)
            .ok_or(DispatchError::UnknownContract(*address))
    }

    pub fn contract_mut(&mut self, address: &Address) -> Result<&mut Dispatcher, DispatchError> {
        self.contracts
            .get_mut(address)
            .ok_or(DispatchError::UnknownContract(*address))
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.contracts.contains_key(address)
    }

    pub fn remove(&mut self, address: &Address) -> Option<Dispatcher> {
        self.contracts.remove(address)
    }

    pub fn addresses(&self) -> impl Iterator<Item = &Address> {
        self.contracts.keys()
    }

    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }

    /// Route `call` to the dispatcher at `target`.
    pub fn call(
        &mut self,
        host: &Host,
        caller: Address,
        target: Address,
        call: &CallData,
    ) -> Result<CallOutcome, DispatchError> {
        self.contract_mut(&target)?.dispatch(host, caller, call)
    }

    pub fn balance(&self, address: &Address) -> u128 {
        self.balances.get(address).copied().unwrap_or(0)
    }

    pub fn credit(&mut self, address: Address, amount: u128) {
        let entry = self.balances.entry(address).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    /// Move the whole balance of `from` to `to`, returning the amount moved.
    pub fn sweep(&mut self, from: &Address, to: Address) -> u128 {
        let amount = self.balances.remove(from).unwrap_or(0);
        if amount > 0 {
            self.credit(to, amount);
        }
        amount
    }
}
