use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use colony_types::{Address, Selector};
use tracing::{info, warn};

use crate::error::DispatchError;
use crate::interface::Interface;
use crate::module::Module;
use crate::resolver::Resolver;

/// Deployed code: modules and resolvers, addressed like contracts.
#[derive(Default)]
pub struct Host {
    modules: HashMap<Address, Arc<dyn Module>>,
    resolvers: HashMap<Address, Arc<Resolver>>,
    resolver_owners: HashMap<Address, Address>,
    nonce: u64,
}

impl Host {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh deterministic address in `namespace`.
    pub fn next_address(&mut self, namespace: &str) -> Address {
        self.nonce += 1;
        Address::derive(namespace, self.nonce)
    }

    pub fn deploy_module(&mut self, module: Arc<dyn Module>) -> Address {
        let address = self.next_address("module");
        info!(module = module.name(), address = %address, "Module deployed");
        self.modules.insert(address, module);
        address
    }

    pub fn deploy_resolver(&mut self, resolver: Resolver) -> Address {
        let address = self.next_address("resolver");
        info!(address = %address, bindings = resolver.len(), "Resolver deployed");
        self.resolvers.insert(address, Arc::new(resolver));
        address
    }

    /// Deploy a resolver that `owner` may extend later with
    /// [`register`](Self::register).
    pub fn deploy_owned_resolver(&mut self, owner: Address, resolver: Resolver) -> Address {
        let address = self.deploy_resolver(resolver);
        self.resolver_owners.insert(address, owner);
        address
    }

    /// Bind `signature` to `target` on a deployed resolver. Only the owner the
    /// resolver was deployed with may do this; resolvers deployed without an
    /// owner are sealed. Dispatchers pointing at the resolver route the new
    /// selector from the next call on.
    pub fn register(
        &mut self,
        caller: Address,
        resolver: Address,
        signature: &str,
        target: Address,
    ) -> Result<Selector, DispatchError> {
        if !self.resolvers.contains_key(&resolver) {
            return Err(DispatchError::UnknownResolver(resolver));
        }
        if self.resolver_owners.get(&resolver) != Some(&caller) {
            warn!(caller = %caller, resolver = %resolver, "Resolver registration rejected");
            return Err(DispatchError::NotOwner {
                caller,
                contract: resolver,
            });
        }
        let table = self
            .resolvers
            .get_mut(&resolver)
            .ok_or(DispatchError::UnknownResolver(resolver))?;
        let selector = Arc::make_mut(table).register(signature, target);
        info!(resolver = %resolver, selector = %selector, target = %target, "Resolver binding registered");
        Ok(selector)
    }

    pub fn resolver_owner(&self, resolver: &Address) -> Option<Address> {
        self.resolver_owners.get(resolver).copied()
    }

    /// Build a resolver for `interface` from already-deployed modules and
    /// deploy it.
    pub fn build_resolver(
        &mut self,
        interface: &Interface,
        modules: &[(&str, Address)],
    ) -> Result<Address, DispatchError> {
        let resolver = Resolver::build(interface, modules, self)?;
        Ok(self.deploy_resolver(resolver))
    }

    pub fn module(&self, address: &Address) -> Option<&Arc<dyn Module>> {
        self.modules.get(address)
    }

    pub fn resolver(&self, address: &Address) -> Option<&Arc<Resolver>> {
        self.resolvers.get(address)
    }

    pub fn has_resolver(&self, address: &Address) -> bool {
        self.resolvers.contains_key(address)
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    pub fn resolver_count(&self) -> usize {
        self.resolvers.len()
    }
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host")
            .field("modules", &self.modules.len())
            .field("resolvers", &self.resolvers.len())
            .finish()
    }
}
