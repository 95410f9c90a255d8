use colony_dispatch::{Dispatcher, Host};
use colony_storage::{
    authority,
    layout::{colony, network},
    Family,
};
use colony_types::{Address, CallData, Event, Version};
use tracing::{info, warn};

use crate::authority::MetaAuthority;
use crate::error::RegistryError;
use crate::probe::declared_version;

/// The append-only list of colony implementations, kept in network storage.
pub struct VersionRegistry<'a> {
    network: &'a mut Dispatcher,
    host: &'a Host,
}

impl<'a> VersionRegistry<'a> {
    pub fn new(network: &'a mut Dispatcher, host: &'a Host) -> Self {
        Self { network, host }
    }

    pub fn current_version(&self) -> Version {
        self.network.storage().get(network::CURRENT_COLONY_VERSION)
    }

    pub fn resolver_for(&self, version: Version) -> Result<Address, RegistryError> {
        let resolver = self
            .network
            .storage()
            .get_entry(network::COLONY_VERSION_RESOLVERS, &version);
        if resolver.is_zero() {
            Err(RegistryError::VersionNotFound(version))
        } else {
            Ok(resolver)
        }
    }

    /// Append `resolver` as the next version.
    ///
    /// The version number comes from the resolver's own `version()`, which
    /// must be exactly one past the current version.
    pub fn register_version(&mut self, meta: &MetaAuthority, resolver: Address) -> Result<Event, RegistryError> {
        let declared = declared_version(self.host, &colony::LAYOUT, resolver)?;
        let expected = self.current_version().next();
        if declared != expected {
            warn!(expected = %expected, declared = %declared, "Colony version out of order");
            return Err(RegistryError::BadVersionOrder { expected, declared });
        }
        let storage = self.network.storage_mut();
        storage.set_entry(network::COLONY_VERSION_RESOLVERS, &declared, resolver);
        storage.set(network::CURRENT_COLONY_VERSION, declared);
        info!(
            version = %declared,
            resolver = %resolver,
            by = %meta.holder(),
            "Colony version added"
        );
        Ok(Event::ColonyVersionAdded {
            version: declared,
            resolver,
        })
    }

    /// The version a colony's current resolver reports.
    pub fn colony_version(&self, colony: &mut Dispatcher) -> Result<Version, RegistryError> {
        if colony.storage().layout().family != Family::Colony {
            return Err(RegistryError::WrongFamily(colony.address(), Family::Colony));
        }
        let out = colony.static_call(self.host, &CallData::bare("version()"))?;
        out.first()
            .and_then(|t| t.as_uint())
            .and_then(|v| u64::try_from(v).ok())
            .map(Version)
            .ok_or(RegistryError::BadResolver(colony.resolver()))
    }

    /// Version preconditions of an upgrade, returning the current version
    /// and the target's resolver.
    pub fn check_target(&self, colony: &mut Dispatcher, target: Version) -> Result<(Version, Address), RegistryError> {
        let current = self.colony_version(colony)?;
        if target <= current {
            return Err(RegistryError::MustBeNewer { current, target });
        }
        let resolver = self
            .resolver_for(target)
            .map_err(|_| RegistryError::MustBeRegistered(target))?;
        Ok((current, resolver))
    }

    /// Repoint a colony at a newer registered version. Needs colony Root in
    /// the root domain and a colony in normal mode.
    pub fn upgrade(&self, caller: Address, colony: &mut Dispatcher, target: Version) -> Result<Event, RegistryError> {
        if !authority::is_root(colony.storage(), &caller) {
            return Err(RegistryError::Unauthorized {
                caller,
                needed: "colony root",
            });
        }
        if colony.is_in_recovery() {
            return Err(RegistryError::InRecoveryMode(colony.address()));
        }
        self.repoint(colony, target)
    }

    /// The upgrade half of a recovery exit. Caller authorization belongs to
    /// the recovery controller.
    pub fn upgrade_on_exit(&self, colony: &mut Dispatcher, target: Version) -> Result<Event, RegistryError> {
        if !colony.is_in_recovery() {
            return Err(RegistryError::NotInRecoveryMode(colony.address()));
        }
        self.repoint(colony, target)
    }

    fn repoint(&self, colony: &mut Dispatcher, target: Version) -> Result<Event, RegistryError> {
        let (current, resolver) = self.check_target(colony, target)?;
        colony.set_resolver(self.network.address(), resolver)?;
        info!(
            colony = %colony.address(),
            from = %current,
            to = %target,
            "Colony upgraded"
        );
        Ok(Event::ColonyUpgraded {
            colony: colony.address(),
            old_version: current,
            new_version: target,
        })
    }
}
