//! Shared fixtures for registry tests.

use std::sync::Arc;

use colony_dispatch::{Dispatcher, FunctionSpec, Host, Interface, Invocation, Ledger, Module, ModuleError};
use colony_storage::{
    authority,
    layout::{colony, network},
};
use colony_types::{Address, ColonyRole, DomainId, Token, Version};

use crate::authority::MetaAuthority;
use crate::lifecycle::ExtensionCore;
use crate::version::VersionRegistry;

/// A colony implementation that only knows its version.
pub struct ColonyStub(pub Version);

impl Module for ColonyStub {
    fn name(&self) -> &str {
        "ColonyStub"
    }

    fn functions(&self) -> Vec<FunctionSpec> {
        vec![FunctionSpec::view("version()", "Colony")]
    }

    fn invoke(&self, _call: &mut Invocation<'_>) -> Result<Vec<Token>, ModuleError> {
        Ok(vec![Token::from(self.0 .0)])
    }
}

pub fn colony_resolver(host: &mut Host, version: u64) -> Address {
    let stub = ColonyStub(Version(version));
    let iface = Interface::from_modules("IColony", &[&stub]);
    let module = host.deploy_module(Arc::new(stub));
    host.build_resolver(&iface, &[("ColonyStub", module)])
        .expect("colony resolver")
}

pub fn extension_resolver(host: &mut Host, name: &str, version: u64) -> Address {
    let core = ExtensionCore::new(name, Version(version));
    let iface = Interface::from_modules(format!("I{name}"), &[&core]);
    let module = host.deploy_module(Arc::new(core));
    host.build_resolver(&iface, &[(name, module)])
        .expect("extension resolver")
}

pub struct Fixture {
    pub host: Host,
    pub network: Dispatcher,
    pub ledger: Ledger,
    /// Network owner and meta colony root.
    pub admin: Address,
    pub colony: Address,
    /// Colony root.
    pub root: Address,
    /// Holds Administration, not Root, in the colony.
    pub administrator: Address,
}

impl Fixture {
    pub fn new() -> Self {
        let mut host = Host::new();
        let admin = Address::from_label("admin");
        let mut network = Dispatcher::new(Address::from_label("network"), &network::LAYOUT, admin, Address::ZERO);
        let v1 = colony_resolver(&mut host, 1);
        {
            let meta = MetaAuthority::bootstrap(&network, admin).expect("bootstrap");
            VersionRegistry::new(&mut network, &host)
                .register_version(&meta, v1)
                .expect("v1");
        }

        let mut ledger = Ledger::new();
        let mut meta = Dispatcher::new(Address::from_label("meta"), &colony::LAYOUT, network.address(), v1);
        authority::grant(meta.storage_mut(), &admin, DomainId::ROOT, ColonyRole::Root.into());
        meta.storage_mut().set(colony::DOMAIN_COUNT, 1);
        network.storage_mut().set(network::META_COLONY, ledger.deploy(meta));

        let root = Address::from_label("colony-root");
        let administrator = Address::from_label("colony-admin");
        let mut c = Dispatcher::new(Address::from_label("colony"), &colony::LAYOUT, network.address(), v1);
        authority::grant(c.storage_mut(), &root, DomainId::ROOT, ColonyRole::Root.into());
        authority::grant(
            c.storage_mut(),
            &administrator,
            DomainId::ROOT,
            ColonyRole::Administration.into(),
        );
        c.storage_mut().set(colony::DOMAIN_COUNT, 3);
        let colony = ledger.deploy(c);

        Self {
            host,
            network,
            ledger,
            admin,
            colony,
            root,
            administrator,
        }
    }

    pub fn meta(&self) -> MetaAuthority {
        MetaAuthority::verify(&self.network, &self.ledger, self.admin).expect("meta authority")
    }
}
