use colony_dispatch::{Dispatcher, Ledger};
use colony_storage::{authority, layout::network};
use colony_types::{Address, Version};
use tracing::warn;

use crate::error::RegistryError;

/// Proof that the caller speaks for the network.
///
/// Held by whoever has Root in the meta colony's root domain, or by the
/// network owner while bootstrapping the first colony version. Registry
/// operations that change the catalogue take one of these instead of
/// re-checking roles themselves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MetaAuthority {
    holder: Address,
}

impl MetaAuthority {
    pub fn verify(network: &Dispatcher, ledger: &Ledger, caller: Address) -> Result<Self, RegistryError> {
        let meta = network.storage().get(network::META_COLONY);
        let is_meta_root = !meta.is_zero()
            && ledger
                .contract(&meta)
                .map(|colony| authority::is_root(colony.storage(), &caller))
                .unwrap_or(false);
        if is_meta_root {
            Ok(Self { holder: caller })
        } else {
            warn!(caller = %caller, "Meta authority denied");
            Err(RegistryError::Unauthorized {
                caller,
                needed: "root in the meta colony",
            })
        }
    }

    /// The network owner, before any colony version exists.
    pub fn bootstrap(network: &Dispatcher, caller: Address) -> Result<Self, RegistryError> {
        if caller != network.owner() {
            return Err(RegistryError::Unauthorized {
                caller,
                needed: "network ownership",
            });
        }
        if network.storage().get(network::CURRENT_COLONY_VERSION) != Version::NONE {
            return Err(RegistryError::AlreadyInitialised);
        }
        Ok(Self { holder: caller })
    }

    pub fn holder(&self) -> Address {
        self.holder
    }
}
