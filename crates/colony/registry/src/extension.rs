use colony_dispatch::{Dispatcher, Host, Ledger};
use colony_storage::{
    authority,
    layout::{colony, extension, network},
    Family,
};
use colony_types::{
    Address, CallData, ColonyRole, DomainId, Event, ExtensionId, RoleSet, Token, Version,
};
use tracing::{info, warn};

use crate::authority::MetaAuthority;
use crate::error::RegistryError;
use crate::lifecycle;
use crate::probe::{declared_identifier, declared_version};

/// Roles that may install the latest version of an extension when no other
/// policy is configured.
pub fn default_install_roles() -> RoleSet {
    RoleSet::from_roles(&[ColonyRole::Root, ColonyRole::Administration])
}

/// Extension catalogue plus per-colony installations.
///
/// The catalogue and installation records live in network storage; each
/// installation is its own dispatcher in the [`Ledger`], owned by the network.
pub struct ExtensionRegistry<'a> {
    network: &'a mut Dispatcher,
    host: &'a Host,
    ledger: &'a mut Ledger,
    install_roles: RoleSet,
}

impl<'a> ExtensionRegistry<'a> {
    pub fn new(network: &'a mut Dispatcher, host: &'a Host, ledger: &'a mut Ledger) -> Self {
        Self {
            network,
            host,
            ledger,
            install_roles: default_install_roles(),
        }
    }

    pub fn with_install_roles(mut self, roles: RoleSet) -> Self {
        self.install_roles = roles;
        self
    }

    pub fn latest_version(&self, id: ExtensionId) -> Version {
        self.network.storage().get_entry(network::EXTENSION_LATEST, &id)
    }

    pub fn resolver_for(&self, id: ExtensionId, version: Version) -> Option<Address> {
        let resolver = self
            .network
            .storage()
            .get_entry(network::EXTENSION_RESOLVERS, &(id, version));
        (!resolver.is_zero()).then_some(resolver)
    }

    pub fn required_roles(&self, id: ExtensionId) -> RoleSet {
        self.network.storage().get_entry(network::EXTENSION_ROLES, &id)
    }

    pub fn installation(&self, id: ExtensionId, colony: Address) -> Option<Address> {
        let instance = self
            .network
            .storage()
            .get_entry(network::INSTALLATIONS, &(id, colony));
        (!instance.is_zero()).then_some(instance)
    }

    /// The version an installed instance reports.
    pub fn installed_version(&mut self, id: ExtensionId, colony: Address) -> Result<Version, RegistryError> {
        let instance = self.require_installed(id, colony)?;
        let out = self
            .ledger
            .contract_mut(&instance)?
            .static_call(self.host, &CallData::bare(lifecycle::VERSION))?;
        out.first()
            .and_then(Token::as_uint)
            .and_then(|v| u64::try_from(v).ok())
            .map(Version)
            .ok_or(RegistryError::BadResolver(instance))
    }

    pub fn add_version(
        &mut self,
        meta: &MetaAuthority,
        id: ExtensionId,
        resolver: Address,
        roles: RoleSet,
    ) -> Result<Event, RegistryError> {
        let declared_id = declared_identifier(self.host, &extension::LAYOUT, resolver)?;
        if declared_id != id {
            warn!(expected = %id, declared = %declared_id, "Extension resolver identifier mismatch");
            return Err(RegistryError::BadResolver(resolver));
        }
        let declared = declared_version(self.host, &extension::LAYOUT, resolver)?;
        let expected = self.latest_version(id).next();
        if declared != expected {
            return Err(RegistryError::BadVersionOrder { expected, declared });
        }
        if declared != Version::FIRST && !roles.is_empty() {
            return Err(RegistryError::NonEmptyRolesOnUpgrade(declared));
        }

        let storage = self.network.storage_mut();
        storage.set_entry(network::EXTENSION_RESOLVERS, &(id, declared), resolver);
        storage.set_entry(network::EXTENSION_LATEST, &id, declared);
        if declared == Version::FIRST {
            storage.set_entry(network::EXTENSION_ROLES, &id, roles);
        }
        info!(
            extension = %id,
            version = %declared,
            resolver = %resolver,
            by = %meta.holder(),
            "Extension added to network"
        );
        Ok(Event::ExtensionAddedToNetwork {
            extension_id: id,
            version: declared,
        })
    }

    /// Create an instance of `id` at `version` for `colony`, at `instance`.
    ///
    /// Holders of the install roles may install the latest version; only
    /// colony Root may pick an older one.
    pub fn install(
        &mut self,
        caller: Address,
        id: ExtensionId,
        version: Version,
        colony: Address,
        instance: Address,
    ) -> Result<Event, RegistryError> {
        let colony_storage = self.active_colony(&colony)?.storage();
        let is_root = authority::is_root(colony_storage, &caller);
        let may_install = authority::has_any_root_domain_role(colony_storage, &caller, self.install_roles);

        if !is_root && !may_install {
            return Err(RegistryError::Unauthorized {
                caller,
                needed: "an administrative role in the colony",
            });
        }
        let resolver = self
            .resolver_for(id, version)
            .ok_or(RegistryError::BadVersion(version))?;
        let latest = self.latest_version(id);
        if version != latest && !is_root {
            return Err(RegistryError::RootOrLatestOnly {
                requested: version,
                latest,
            });
        }
        if self.installation(id, colony).is_some() {
            return Err(RegistryError::AlreadyInstalled {
                extension: id,
                colony,
            });
        }
        if self.ledger.contains(&instance) {
            return Err(RegistryError::BadResolver(instance));
        }

        let owner = self.network.address();
        let mut dispatcher = Dispatcher::new(instance, &extension::LAYOUT, owner, resolver);
        dispatcher.dispatch(
            self.host,
            owner,
            &CallData::new(lifecycle::INSTALL, vec![colony.into()]),
        )?;
        self.ledger.deploy(dispatcher);
        self.network
            .storage_mut()
            .set_entry(network::INSTALLATIONS, &(id, colony), instance);

        info!(extension = %id, colony = %colony, version = %version, instance = %instance, "Extension installed");
        Ok(Event::ExtensionInstalled {
            extension_id: id,
            colony,
            version,
            instance,
        })
    }

    /// Grant the extension's declared roles to its instance in `domain`.
    pub fn enable(
        &mut self,
        caller: Address,
        id: ExtensionId,
        colony: Address,
        domain: DomainId,
    ) -> Result<Event, RegistryError> {
        self.require_colony_root(caller, &colony)?;
        let instance = self.require_installed(id, colony)?;
        if self.ledger.contract(&instance)?.storage().get(extension::DEPRECATED) {
            return Err(RegistryError::ExtensionDeprecated(id));
        }
        let domains = self.colony(&colony)?.storage().get(colony::DOMAIN_COUNT);
        if domain.0 == 0 || domain.0 > domains {
            return Err(RegistryError::DomainNotFound(domain));
        }
        let roles = self.required_roles(id);
        if roles.contains(ColonyRole::Root) && !domain.is_root() {
            return Err(RegistryError::DomainNotAllowedForRole(domain));
        }
        let colony_storage = self.ledger.contract_mut(&colony)?.storage_mut();
        authority::grant(colony_storage, &instance, domain, roles);
        info!(extension = %id, colony = %colony, domain = %domain, roles = %roles, "Extension enabled");
        Ok(Event::ExtensionEnabled {
            extension_id: id,
            colony,
            domain,
            roles,
        })
    }

    pub fn disable(
        &mut self,
        caller: Address,
        id: ExtensionId,
        colony: Address,
        domain: DomainId,
    ) -> Result<Event, RegistryError> {
        self.require_colony_root(caller, &colony)?;
        let instance = self.require_installed(id, colony)?;
        let roles = self.required_roles(id);
        let colony_storage = self.ledger.contract_mut(&colony)?.storage_mut();
        authority::revoke(colony_storage, &instance, domain, roles);
        info!(extension = %id, colony = %colony, domain = %domain, "Extension disabled");
        Ok(Event::ExtensionDisabled {
            extension_id: id,
            colony,
            domain,
        })
    }

    /// Move an installation forward by exactly one registered version.
    pub fn upgrade(
        &mut self,
        caller: Address,
        id: ExtensionId,
        colony: Address,
        target: Version,
    ) -> Result<Event, RegistryError> {
        self.require_colony_root(caller, &colony)?;
        let instance = self.require_installed(id, colony)?;
        let installed = self.installed_version(id, colony)?;
        if target != installed.next() {
            return Err(RegistryError::BadIncrement { installed, target });
        }
        let resolver = self
            .resolver_for(id, target)
            .ok_or(RegistryError::BadVersion(target))?;

        let owner = self.network.address();
        let host = self.host;
        let dispatcher = self.ledger.contract_mut(&instance)?;
        let previous = dispatcher.resolver();
        dispatcher.set_resolver(owner, resolver)?;
        if let Err(e) = dispatcher.dispatch(host, owner, &CallData::bare(lifecycle::FINISH_UPGRADE)) {
            dispatcher.set_resolver(owner, previous)?;
            return Err(e.into());
        }
        info!(extension = %id, colony = %colony, from = %installed, to = %target, "Extension upgraded");
        Ok(Event::ExtensionUpgraded {
            extension_id: id,
            colony,
            version: target,
        })
    }

    pub fn deprecate(
        &mut self,
        caller: Address,
        id: ExtensionId,
        colony: Address,
        deprecated: bool,
    ) -> Result<Event, RegistryError> {
        self.require_colony_root(caller, &colony)?;
        let instance = self.require_installed(id, colony)?;
        let owner = self.network.address();
        self.ledger.call(
            self.host,
            owner,
            instance,
            &CallData::new(lifecycle::DEPRECATE, vec![deprecated.into()]),
        )?;
        info!(extension = %id, colony = %colony, deprecated, "Extension deprecation set");
        Ok(Event::ExtensionDeprecated {
            extension_id: id,
            colony,
            deprecated,
        })
    }

    /// Tear down an installation, sweeping the instance's balance to the
    /// colony.
    pub fn uninstall(&mut self, caller: Address, id: ExtensionId, colony: Address) -> Result<Event, RegistryError> {
        self.require_colony_root(caller, &colony)?;
        let instance = self.require_installed(id, colony)?;
        let owner = self.network.address();
        self.ledger
            .call(self.host, owner, instance, &CallData::bare(lifecycle::UNINSTALL))?;

        let swept = self.ledger.sweep(&instance, colony);
        self.ledger.remove(&instance);
        self.network
            .storage_mut()
            .set_entry(network::INSTALLATIONS, &(id, colony), Address::ZERO);
        info!(extension = %id, colony = %colony, swept, "Extension uninstalled");
        Ok(Event::ExtensionUninstalled {
            extension_id: id,
            colony,
            swept,
        })
    }

    fn colony(&self, address: &Address) -> Result<&Dispatcher, RegistryError> {
        let colony = self.ledger.contract(address)?;
        if colony.storage().layout().family != Family::Colony {
            return Err(RegistryError::WrongFamily(*address, Family::Colony));
        }
        Ok(colony)
    }

    fn active_colony(&self, address: &Address) -> Result<&Dispatcher, RegistryError> {
        let colony = self.colony(address)?;
        if colony.is_in_recovery() {
            return Err(RegistryError::InRecoveryMode(*address));
        }
        Ok(colony)
    }

    fn require_colony_root(&self, caller: Address, colony: &Address) -> Result<(), RegistryError> {
        let colony = self.active_colony(colony)?;
        if authority::is_root(colony.storage(), &caller) {
            Ok(())
        } else {
            Err(RegistryError::Unauthorized {
                caller,
                needed: "colony root",
            })
        }
    }

    fn require_installed(&self, id: ExtensionId, colony: Address) -> Result<Address, RegistryError> {
        self.installation(id, colony)
            .ok_or(RegistryError::NotInstalled {
                extension: id,
                colony,
            })
    }
}
