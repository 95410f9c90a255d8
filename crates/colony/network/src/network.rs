use std::sync::Arc;

use colony_dispatch::{CallOutcome, Dispatcher, Host, Interface, Ledger, Module};
use colony_recovery::{replacement_log_entry, RecoveryController, RecoveryModule};
use colony_registry::{ExtensionCore, ExtensionRegistry, MetaAuthority, VersionRegistry};
use colony_storage::{
    authority,
    layout::{colony, header, network},
    Family, Storage,
};
use colony_types::{
    Address, CallData, ColonyRole, DomainId, Event, ExtensionId, ReputationLogEntry, RoleSet, Slot,
    Token, Version, Word,
};
use tracing::{debug, info, warn};

use crate::config::NetworkConfig;
use crate::error::{NetworkError, NetworkResult};
use crate::events::EventLog;
use crate::modules::{ColonyCore, NetworkViews};

/// Roles a colony creator receives in the root domain.
fn founder_roles() -> RoleSet {
    RoleSet::from_roles(&[
        ColonyRole::Root,
        ColonyRole::Arbitration,
        ColonyRole::Architecture,
        ColonyRole::Funding,
        ColonyRole::Administration,
    ])
}

/// The whole system on one host: the network dispatcher, every colony and
/// extension instance, deployed code, balances, and the event log.
///
/// Each public operation either completes or leaves no trace. Operations that
/// change the network's catalogue are refused while the network itself is in
/// recovery mode; recovery entry points never are.
pub struct ColonyNetwork {
    config: NetworkConfig,
    host: Host,
    network: Dispatcher,
    ledger: Ledger,
    events: EventLog,
    recovery_module: Address,
}

impl ColonyNetwork {
    pub fn new(owner: Address, config: NetworkConfig) -> NetworkResult<Self> {
        let mut host = Host::new();
        let recovery = RecoveryModule::new(config.quorum);
        let views = NetworkViews;
        let iface = Interface::from_modules("IColonyNetwork", &[&views, &recovery]);
        let recovery_module = host.deploy_module(Arc::new(recovery));
        let views_module = host.deploy_module(Arc::new(views));
        let resolver = host.build_resolver(
            &iface,
            &[("NetworkViews", views_module), ("ContractRecovery", recovery_module)],
        )?;

        let address = Address::derive("network", 0);
        let mut network = Dispatcher::new(address, &network::LAYOUT, owner, resolver);
        authority::grant(network.storage_mut(), &owner, DomainId::ROOT, ColonyRole::Root.into());
        info!(name = %config.name, network = %address, owner = %owner, "Colony network created");

        Ok(Self {
            events: EventLog::new(config.event_log_capacity),
            config,
            host,
            network,
            ledger: Ledger::new(),
            recovery_module,
        })
    }

    pub fn address(&self) -> Address {
        self.network.address()
    }

    pub fn owner(&self) -> Address {
        self.network.owner()
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut Host {
        &mut self.host
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn contract(&self, address: &Address) -> NetworkResult<&Dispatcher> {
        if *address == self.network.address() {
            Ok(&self.network)
        } else {
            Ok(self.ledger.contract(address)?)
        }
    }

    fn storage(&self, target: &Address) -> NetworkResult<&Storage> {
        Ok(self.contract(target)?.storage())
    }

    fn storage_mut(&mut self, target: &Address) -> NetworkResult<&mut Storage> {
        if *target == self.network.address() {
            Ok(self.network.storage_mut())
        } else {
            Ok(self.ledger.contract_mut(target)?.storage_mut())
        }
    }

    fn record(&mut self, source: Address, event: Event) {
        debug!(source = %source, event = event.name(), "Event recorded");
        self.events.record(source, event);
    }

    fn require_active(&self) -> NetworkResult<()> {
        if self.network.is_in_recovery() {
            warn!(network = %self.network.address(), "Network operation rejected in recovery mode");
            Err(NetworkError::InRecoveryMode(self.network.address()))
        } else {
            Ok(())
        }
    }

    // ── Code deployment ────────────────────────────────────────────────

    /// Deploy a colony implementation: `ColonyCore` at `version`, the shared
    /// recovery module, and any business modules. Returns the resolver.
    pub fn deploy_colony_version(
        &mut self,
        version: Version,
        modules: Vec<Arc<dyn Module>>,
    ) -> NetworkResult<Address> {
        let core: Arc<dyn Module> = Arc::new(ColonyCore::new(version));
        self.deploy_bundle(&format!("IColony.{version}"), core, modules)
    }

    /// Deploy one version of extension `name`. Returns the resolver.
    pub fn deploy_extension_version(
        &mut self,
        name: &str,
        version: Version,
        modules: Vec<Arc<dyn Module>>,
    ) -> NetworkResult<Address> {
        let core: Arc<dyn Module> = Arc::new(ExtensionCore::new(name, version));
        self.deploy_bundle(&format!("I{name}.{version}"), core, modules)
    }

    fn deploy_bundle(
        &mut self,
        interface: &str,
        core: Arc<dyn Module>,
        extra: Vec<Arc<dyn Module>>,
    ) -> NetworkResult<Address> {
        let mut signatures: Vec<&'static str> = Vec::new();
        let mut named: Vec<(String, Address)> = Vec::new();
        for module in std::iter::once(core).chain(extra) {
            signatures.extend(module.functions().into_iter().map(|f| f.signature));
            let name = module.name().to_string();
            named.push((name, self.host.deploy_module(module)));
        }
        if let Some(recovery) = self.host.module(&self.recovery_module) {
            signatures.extend(recovery.functions().into_iter().map(|f| f.signature));
        }
        named.push(("ContractRecovery".to_string(), self.recovery_module));

        let iface = Interface::new(interface, signatures);
        let modules: Vec<(&str, Address)> = named.iter().map(|(n, a)| (n.as_str(), *a)).collect();
        Ok(self.host.build_resolver(&iface, &modules)?)
    }

    // ── Versions and colonies ──────────────────────────────────────────

    /// Register colony version 1. Network owner only, once.
    pub fn initialise(&mut self, caller: Address, resolver: Address) -> NetworkResult<()> {
        self.require_active()?;
        let meta = MetaAuthority::bootstrap(&self.network, caller)?;
        let event = VersionRegistry::new(&mut self.network, &self.host).register_version(&meta, resolver)?;
        self.record(self.network.address(), event);
        Ok(())
    }

    pub fn add_colony_version(&mut self, caller: Address, resolver: Address) -> NetworkResult<Version> {
        self.require_active()?;
        let meta = MetaAuthority::verify(&self.network, &self.ledger, caller)?;
        let mut registry = VersionRegistry::new(&mut self.network, &self.host);
        let event = registry.register_version(&meta, resolver)?;
        let version = registry.current_version();
        self.record(self.network.address(), event);
        Ok(version)
    }

    pub fn current_colony_version(&self) -> Version {
        self.network.storage().get(network::CURRENT_COLONY_VERSION)
    }

    pub fn colony_version_resolver(&mut self, version: Version) -> NetworkResult<Address> {
        Ok(VersionRegistry::new(&mut self.network, &self.host).resolver_for(version)?)
    }

    /// The version a colony currently runs.
    pub fn colony_version(&mut self, colony: Address) -> NetworkResult<Version> {
        let dispatcher = self.ledger.contract_mut(&colony)?;
        Ok(VersionRegistry::new(&mut self.network, &self.host).colony_version(dispatcher)?)
    }

    pub fn colony_count(&self) -> u64 {
        self.network.storage().get(network::COLONY_COUNT)
    }

    /// Colony by creation index, starting at 1.
    pub fn colony_at(&self, index: u64) -> Option<Address> {
        let address = self.network.storage().get_entry(network::COLONIES, &index);
        (!address.is_zero()).then_some(address)
    }

    pub fn meta_colony(&self) -> Option<Address> {
        let address = self.network.storage().get(network::META_COLONY);
        (!address.is_zero()).then_some(address)
    }

    pub fn create_meta_colony(&mut self, caller: Address, token: Address) -> NetworkResult<Address> {
        self.require_active()?;
        if caller != self.network.owner() {
            return Err(NetworkError::Unauthorized {
                caller,
                needed: "network ownership",
            });
        }
        if let Some(existing) = self.meta_colony() {
            return Err(NetworkError::MetaColonyExists(existing));
        }
        let address = self.deploy_colony(caller, token)?;
        self.network.storage_mut().set(network::META_COLONY, address);
        self.record(self.network.address(), Event::MetaColonyCreated { colony: address });
        Ok(address)
    }

    pub fn create_colony(&mut self, caller: Address, token: Address) -> NetworkResult<Address> {
        self.require_active()?;
        self.deploy_colony(caller, token)
    }

    fn deploy_colony(&mut self, creator: Address, token: Address) -> NetworkResult<Address> {
        let version = self.current_colony_version();
        if version.is_none() {
            return Err(NetworkError::NotInitialised);
        }
        let resolver = VersionRegistry::new(&mut self.network, &self.host).resolver_for(version)?;
        let index = self.colony_count() + 1;
        let address = Address::derive("colony", index);
        let network_address = self.network.address();

        let mut dispatcher = Dispatcher::new(address, &colony::LAYOUT, network_address, resolver);
        let storage = dispatcher.storage_mut();
        storage.set(colony::NETWORK, network_address);
        storage.set(colony::TOKEN, token);
        storage.set(colony::DOMAIN_COUNT, 1);
        authority::grant(storage, &creator, DomainId::ROOT, founder_roles());
        let role_event = RecoveryController::new(storage, self.config.quorum).set_recovery_role(creator, creator)?;

        let network_storage = self.network.storage_mut();
        network_storage.set_entry(network::COLONIES, &index, address);
        network_storage.set(network::COLONY_COUNT, index);
        self.ledger.deploy(dispatcher);

        info!(colony = %address, index, version = %version, creator = %creator, "Colony created");
        self.record(address, role_event);
        self.record(
            network_address,
            Event::ColonyAdded {
                index,
                colony: address,
                token,
            },
        );
        Ok(address)
    }

    pub fn upgrade_colony(&mut self, caller: Address, colony: Address, target: Version) -> NetworkResult<()> {
        self.require_active()?;
        let dispatcher = self.ledger.contract_mut(&colony)?;
        let event = VersionRegistry::new(&mut self.network, &self.host).upgrade(caller, dispatcher, target)?;
        self.record(colony, event);
        Ok(())
    }

    // ── Extensions ─────────────────────────────────────────────────────

    fn extensions(&mut self) -> ExtensionRegistry<'_> {
        let roles = self.config.install_role_set();
        ExtensionRegistry::new(&mut self.network, &self.host, &mut self.ledger).with_install_roles(roles)
    }

    pub fn add_extension(
        &mut self,
        caller: Address,
        id: ExtensionId,
        resolver: Address,
        roles: RoleSet,
    ) -> NetworkResult<Version> {
        self.require_active()?;
        let meta = MetaAuthority::verify(&self.network, &self.ledger, caller)?;
        let event = self.extensions().add_version(&meta, id, resolver, roles)?;
        self.record(self.network.address(), event);
        Ok(self.extensions().latest_version(id))
    }

    pub fn extension_latest_version(&mut self, id: ExtensionId) -> Version {
        self.extensions().latest_version(id)
    }

    pub fn extension_installation(&mut self, id: ExtensionId, colony: Address) -> Option<Address> {
        self.extensions().installation(id, colony)
    }

    pub fn installed_extension_version(&mut self, id: ExtensionId, colony: Address) -> NetworkResult<Version> {
        Ok(self.extensions().installed_version(id, colony)?)
    }

    /// Install `id` at `version` in `colony`, returning the new instance.
    pub fn install_extension(
        &mut self,
        caller: Address,
        colony: Address,
        id: ExtensionId,
        version: Version,
    ) -> NetworkResult<Address> {
        self.require_active()?;
        let instance = self.host.next_address("extension");
        let event = self.extensions().install(caller, id, version, colony, instance)?;
        self.record(colony, event);
        Ok(instance)
    }

    pub fn enable_extension(
        &mut self,
        caller: Address,
        colony: Address,
        id: ExtensionId,
        domain: DomainId,
    ) -> NetworkResult<()> {
        self.require_active()?;
        let event = self.extensions().enable(caller, id, colony, domain)?;
        self.record(colony, event);
        Ok(())
    }

    pub fn disable_extension(
        &mut self,
        caller: Address,
        colony: Address,
        id: ExtensionId,
        domain: DomainId,
    ) -> NetworkResult<()> {
        self.require_active()?;
        let event = self.extensions().disable(caller, id, colony, domain)?;
        self.record(colony, event);
        Ok(())
    }

    pub fn upgrade_extension(
        &mut self,
        caller: Address,
        colony: Address,
        id: ExtensionId,
        target: Version,
    ) -> NetworkResult<()> {
        self.require_active()?;
        let event = self.extensions().upgrade(caller, id, colony, target)?;
        self.record(colony, event);
        Ok(())
    }

    pub fn deprecate_extension(
        &mut self,
        caller: Address,
        colony: Address,
        id: ExtensionId,
        deprecated: bool,
    ) -> NetworkResult<()> {
        self.require_active()?;
        let event = self.extensions().deprecate(caller, id, colony, deprecated)?;
        self.record(colony, event);
        Ok(())
    }

    /// Remove an installation; returns the balance swept to the colony.
    pub fn uninstall_extension(&mut self, caller: Address, colony: Address, id: ExtensionId) -> NetworkResult<u128> {
        self.require_active()?;
        let event = self.extensions().uninstall(caller, id, colony)?;
        let swept = match &event {
            Event::ExtensionUninstalled { swept, .. } => *swept,
            _ => 0,
        };
        self.record(colony, event);
        Ok(swept)
    }

    // ── Recovery ───────────────────────────────────────────────────────

    fn recovery(&mut self, target: &Address) -> NetworkResult<RecoveryController<'_>> {
        let quorum = self.config.quorum;
        Ok(RecoveryController::new(self.storage_mut(target)?, quorum))
    }

    pub fn set_recovery_role(&mut self, caller: Address, target: Address, user: Address) -> NetworkResult<()> {
        let event = self.recovery(&target)?.set_recovery_role(caller, user)?;
        self.record(target, event);
        Ok(())
    }

    pub fn remove_recovery_role(&mut self, caller: Address, target: Address, user: Address) -> NetworkResult<()> {
        let event = self.recovery(&target)?.remove_recovery_role(caller, user)?;
        self.record(target, event);
        Ok(())
    }

    pub fn enter_recovery(&mut self, caller: Address, target: Address) -> NetworkResult<()> {
        let event = self.recovery(&target)?.enter_recovery(caller)?;
        self.record(target, event);
        Ok(())
    }

    pub fn edit_slot(&mut self, caller: Address, target: Address, slot: Slot, value: Word) -> NetworkResult<()> {
        let event = self.recovery(&target)?.edit_slot(caller, slot, value)?;
        self.record(target, event);
        Ok(())
    }

    pub fn approve_exit(&mut self, caller: Address, target: Address) -> NetworkResult<()> {
        let event = self.recovery(&target)?.approve_exit(caller)?;
        self.record(target, event);
        Ok(())
    }

    /// Leave recovery mode, optionally moving a colony to `new_version` in
    /// the same step. Either both happen or neither does.
    pub fn exit_recovery(
        &mut self,
        caller: Address,
        target: Address,
        new_version: Option<Version>,
    ) -> NetworkResult<()> {
        let Some(version) = new_version else {
            let event = self.recovery(&target)?.exit_recovery(caller)?;
            self.record(target, event);
            return Ok(());
        };

        if self.storage(&target)?.layout().family != Family::Colony {
            return Err(NetworkError::NotAColony(target));
        }
        self.recovery(&target)?.check_exit(&caller)?;
        let upgraded = {
            let dispatcher = self.ledger.contract_mut(&target)?;
            let registry = VersionRegistry::new(&mut self.network, &self.host);
            registry.check_target(dispatcher, version)?;
            registry.upgrade_on_exit(dispatcher, version)?
        };
        let exited = self.recovery(&target)?.exit_recovery(caller)?;
        self.record(target, upgraded);
        self.record(target, exited);
        Ok(())
    }

    pub fn is_in_recovery(&self, target: &Address) -> NetworkResult<bool> {
        Ok(self.storage(target)?.get(header::RECOVERY).in_recovery)
    }

    pub fn num_recovery_roles(&self, target: &Address) -> NetworkResult<u64> {
        Ok(self.storage(target)?.get(header::RECOVERY).role_count)
    }

    pub fn approval_count(&self, target: &Address) -> NetworkResult<u64> {
        Ok(self.storage(target)?.get(header::RECOVERY).approval_count)
    }

    pub fn has_recovery_role(&self, target: &Address, user: &Address) -> NetworkResult<bool> {
        Ok(self.storage(target)?.get_entry(header::RECOVERY_ROLES, user))
    }

    pub fn read_slot(&self, target: &Address, slot: &Slot) -> NetworkResult<Word> {
        Ok(self.storage(target)?.read(slot))
    }

    /// Correct entry `index` of a mining cycle's update log. Network recovery
    /// mode and a network recovery role are required.
    pub fn set_replacement_log_entry(
        &mut self,
        caller: Address,
        cycle: Address,
        index: u64,
        entry: &ReputationLogEntry,
    ) -> NetworkResult<()> {
        let network = self.network.address();
        let event = self
            .recovery(&network)?
            .set_replacement_log_entry(caller, cycle, index, entry)?;
        self.record(network, event);
        Ok(())
    }

    pub fn replacement_log_entry(&self, cycle: Address, index: u64) -> Option<ReputationLogEntry> {
        replacement_log_entry(self.network.storage(), cycle, index)
    }

    // ── Calls and balances ─────────────────────────────────────────────

    /// Route `call` through the dispatcher at `target`.
    pub fn call(&mut self, caller: Address, target: Address, call: &CallData) -> NetworkResult<CallOutcome> {
        let outcome = if target == self.network.address() {
            self.network.dispatch(&self.host, caller, call)?
        } else {
            self.ledger.call(&self.host, caller, target, call)?
        };
        for event in &outcome.events {
            self.record(target, event.clone());
        }
        Ok(outcome)
    }

    pub fn static_call(&mut self, target: Address, call: &CallData) -> NetworkResult<Vec<Token>> {
        if target == self.network.address() {
            Ok(self.network.static_call(&self.host, call)?)
        } else {
            Ok(self.ledger.contract_mut(&target)?.static_call(&self.host, call)?)
        }
    }

    pub fn balance(&self, address: &Address) -> u128 {
        self.ledger.balance(address)
    }

    pub fn credit(&mut self, address: Address, amount: u128) {
        self.ledger.credit(address, amount);
    }
}
