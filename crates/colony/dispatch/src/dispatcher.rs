use std::sync::Arc;

use colony_storage::{layout::header, Layout, Storage};
use colony_types::{Address, CallData, Event, Selector, Token};
use tracing::{debug, info, warn};

use crate::error::DispatchError;
use crate::host::Host;
use crate::module::{FunctionSpec, Invocation, Module, Mutability};

/// What a successful mutating call produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallOutcome {
    pub output: Vec<Token>,
    pub events: Vec<Event>,
}

/// A stable address fronting swappable implementation modules.
///
/// The dispatcher owns the storage; the resolver it points at decides which
/// module runs for each selector. Only the owner may repoint it.
#[derive(Clone, Debug)]
pub struct Dispatcher {
    address: Address,
    storage: Storage,
}

impl Dispatcher {
    pub fn new(address: Address, layout: &'static Layout, owner: Address, resolver: Address) -> Self {
        let mut storage = Storage::new(layout);
        storage.set(header::OWNER, owner);
        storage.set(header::RESOLVER, resolver);
        Self { address, storage }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn owner(&self) -> Address {
        self.storage.get(header::OWNER)
    }

    pub fn resolver(&self) -> Address {
        self.storage.get(header::RESOLVER)
    }

    pub fn is_in_recovery(&self) -> bool {
        self.storage.get(header::RECOVERY).in_recovery
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut Storage {
        &mut self.storage
    }

    pub fn set_resolver(&mut self, caller: Address, resolver: Address) -> Result<(), DispatchError> {
        self.require_owner(caller)?;
        let previous = self.resolver();
        self.storage.set(header::RESOLVER, resolver);
        info!(
            contract = %self.address,
            from = %previous,
            to = %resolver,
            "Resolver replaced"
        );
        Ok(())
    }

    pub fn set_owner(&mut self, caller: Address, owner: Address) -> Result<(), DispatchError> {
        self.require_owner(caller)?;
        self.storage.set(header::OWNER, owner);
        info!(contract = %self.address, owner = %owner, "Ownership transferred");
        Ok(())
    }

    fn require_owner(&self, caller: Address) -> Result<(), DispatchError> {
        if caller == self.owner() {
            Ok(())
        } else {
            warn!(contract = %self.address, caller = %caller, "Owner-only call rejected");
            Err(DispatchError::NotOwner {
                caller,
                contract: self.address,
            })
        }
    }

    /// Resolve `selector` to the module and function that will handle it.
    pub fn route(
        &self,
        host: &Host,
        selector: Selector,
    ) -> Result<(Arc<dyn Module>, FunctionSpec), DispatchError> {
        let resolver_address = self.resolver();
        let resolver = host
            .resolver(&resolver_address)
            .ok_or(DispatchError::UnknownResolver(resolver_address))?;
        let target = resolver.lookup(selector);
        if target.is_zero() {
            return Err(DispatchError::Unroutable(selector));
        }
        let module = host
            .module(&target)
            .ok_or(DispatchError::UnknownModule(target))?;
        let function = module
            .function(selector)
            .ok_or(DispatchError::Unroutable(selector))?;
        Ok((Arc::clone(module), function))
    }

    /// Forward `call` to the bound module, as `caller`.
    ///
    /// Mutating calls are rejected while in recovery mode. The call's writes
    /// and events are kept only if the module returns `Ok`; view calls never
    /// keep writes.
    pub fn dispatch(
        &mut self,
        host: &Host,
        caller: Address,
        call: &CallData,
    ) -> Result<CallOutcome, DispatchError> {
        let (module, function) = self.route(host, call.selector)?;

        if function.mutability == Mutability::Mutating && self.is_in_recovery() {
            warn!(
                contract = %self.address,
                signature = function.signature,
                "Call rejected in recovery mode"
            );
            return Err(DispatchError::InRecoveryMode(self.address));
        }

        debug!(
            contract = %self.address,
            module = module.name(),
            signature = function.signature,
            caller = %caller,
            "Dispatching"
        );

        let this = self.address;
        let mut events = Vec::new();
        let output = if function.mutability == Mutability::View {
            self.storage.simulate(|storage| {
                let mut inv = Invocation::new(caller, this, call.selector, &call.args, storage, &mut events);
                module.invoke(&mut inv)
            })?
        } else {
            self.storage.atomically(|storage| {
                let mut inv = Invocation::new(caller, this, call.selector, &call.args, storage, &mut events);
                module.invoke(&mut inv)
            })?
        };
        if function.mutability == Mutability::View {
            events.clear();
        }
        Ok(CallOutcome { output, events })
    }

    /// Execute `call` with every write discarded, whatever the function's
    /// declared mutability.
    pub fn static_call(&mut self, host: &Host, call: &CallData) -> Result<Vec<Token>, DispatchError> {
        let (module, _) = self.route(host, call.selector)?;
        let this = self.address;
        let mut events = Vec::new();
        let output = self.storage.simulate(|storage| {
            let mut inv = Invocation::new(Address::ZERO, this, call.selector, &call.args, storage, &mut events);
            module.invoke(&mut inv)
        })?;
        Ok(output)
    }
}
