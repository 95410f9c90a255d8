//! Built-in implementation modules for colonies and the network itself.

use colony_dispatch::{FunctionSpec, Invocation, Module, ModuleError};
use colony_storage::{
    authority,
    layout::{colony, header, network},
};
use colony_types::{ColonyRole, DomainId, ErrorCode, Event, ExtensionId, RoleSet, Selector, Token, Version, Word};

pub mod colony_sig {
    pub const VERSION: &str = "version()";
    pub const GET_NETWORK: &str = "getNetwork()";
    pub const GET_TOKEN: &str = "getToken()";
    pub const GET_DOMAIN_COUNT: &str = "getDomainCount()";
    pub const ADD_DOMAIN: &str = "addDomain()";
    pub const SET_USER_ROLES: &str = "setUserRoles(address,uint256,uint256)";
    pub const GET_USER_ROLES: &str = "getUserRoles(address,uint256)";
    pub const HAS_USER_ROLE: &str = "hasUserRole(address,uint256,uint8)";
}

const COLONY_ORIGIN: &str = "Colony";

/// Colony core: version, identity, domains, and role administration.
///
/// Every colony version carries its own `ColonyCore`, which is where the
/// version number a resolver declares comes from.
#[derive(Clone, Copy, Debug)]
pub struct ColonyCore {
    version: Version,
}

impl ColonyCore {
    pub fn new(version: Version) -> Self {
        Self { version }
    }
}

impl Module for ColonyCore {
    fn name(&self) -> &str {
        "ColonyCore"
    }

    fn functions(&self) -> Vec<FunctionSpec> {
        use colony_sig::*;
        vec![
            FunctionSpec::view(VERSION, COLONY_ORIGIN),
            FunctionSpec::view(GET_NETWORK, COLONY_ORIGIN),
            FunctionSpec::view(GET_TOKEN, COLONY_ORIGIN),
            FunctionSpec::view(GET_DOMAIN_COUNT, COLONY_ORIGIN),
            FunctionSpec::mutating(ADD_DOMAIN, COLONY_ORIGIN),
            FunctionSpec::mutating(SET_USER_ROLES, COLONY_ORIGIN),
            FunctionSpec::view(GET_USER_ROLES, COLONY_ORIGIN),
            FunctionSpec::view(HAS_USER_ROLE, COLONY_ORIGIN),
        ]
    }

    fn invoke(&self, call: &mut Invocation<'_>) -> Result<Vec<Token>, ModuleError> {
        use colony_sig::*;
        let selector = call.selector;
        let is = |sig: &str| selector == Selector::from_signature(sig);

        if is(VERSION) {
            Ok(vec![Token::from(self.version.0)])
        } else if is(GET_NETWORK) {
            Ok(vec![Token::from(call.storage.get(colony::NETWORK))])
        } else if is(GET_TOKEN) {
            Ok(vec![Token::from(call.storage.get(colony::TOKEN))])
        } else if is(GET_DOMAIN_COUNT) {
            Ok(vec![Token::from(call.storage.get(colony::DOMAIN_COUNT))])
        } else if is(ADD_DOMAIN) {
            require_architect(call)?;
            let count = call.storage.get(colony::DOMAIN_COUNT) + 1;
            call.storage.set(colony::DOMAIN_COUNT, count);
            call.emit(Event::Custom {
                topic: "DomainAdded".to_string(),
                data: vec![Token::from(count)],
            });
            Ok(vec![Token::from(count)])
        } else if is(SET_USER_ROLES) {
            let user = call.address_arg(0)?;
            let domain = DomainId(call.u64_arg(1)?);
            let roles = u8::try_from(call.uint_arg(2)?)
                .ok()
                .and_then(RoleSet::from_mask)
                .ok_or_else(|| ModuleError::bad_argument(2, "a mask of defined role bits"))?;
            require_domain(call, domain)?;
            if domain.is_root() || roles.contains(ColonyRole::Root) {
                call.require_role(DomainId::ROOT, ColonyRole::Root)?;
            } else {
                require_architect(call)?;
            }
            call.storage.set_entry(header::ROLES, &(user, domain), roles);
            call.emit(Event::ColonyRoleSet { user, domain, roles });
            Ok(vec![])
        } else if is(GET_USER_ROLES) {
            let user = call.address_arg(0)?;
            let domain = DomainId(call.u64_arg(1)?);
            let roles = authority::roles_of(&*call.storage, &user, domain);
            Ok(vec![Token::from(u64::from(roles.0))])
        } else if is(HAS_USER_ROLE) {
            let user = call.address_arg(0)?;
            let domain = DomainId(call.u64_arg(1)?);
            let index = u8::try_from(call.uint_arg(2)?).ok().and_then(ColonyRole::from_index);
            let role = index.ok_or_else(|| ModuleError::bad_argument(2, "a role index"))?;
            Ok(vec![Token::from(authority::has_role(&*call.storage, &user, domain, role))])
        } else {
            Err(ModuleError::revert(format!("ColonyCore has no function {selector}")))
        }
    }
}

fn require_architect(call: &Invocation<'_>) -> Result<(), ModuleError> {
    let allowed = RoleSet::from_roles(&[ColonyRole::Root, ColonyRole::Architecture]);
    if authority::has_any_root_domain_role(&*call.storage, &call.caller, allowed) {
        Ok(())
    } else {
        Err(ModuleError::unauthorized(call.caller, "Root or Architecture"))
    }
}

fn require_domain(call: &Invocation<'_>, domain: DomainId) -> Result<(), ModuleError> {
    let count = call.storage.get(colony::DOMAIN_COUNT);
    if domain.0 == 0 || domain.0 > count {
        Err(ModuleError::new(
            ErrorCode::DomainNotFound,
            format!("domain {domain} does not exist"),
        ))
    } else {
        Ok(())
    }
}

pub mod network_sig {
    pub const CURRENT_COLONY_VERSION: &str = "getCurrentColonyVersion()";
    pub const COLONY_VERSION_RESOLVER: &str = "getColonyVersionResolver(uint256)";
    pub const COLONY_COUNT: &str = "getColonyCount()";
    pub const GET_COLONY: &str = "getColony(uint256)";
    pub const META_COLONY: &str = "getMetaColony()";
    pub const EXTENSION_INSTALLATION: &str = "getExtensionInstallation(bytes32,address)";
    pub const EXTENSION_RESOLVER: &str = "getExtensionResolver(bytes32,uint256)";
}

const NETWORK_ORIGIN: &str = "ColonyNetwork";

/// Read-only network surface. Registry writes go through the typed facade.
#[derive(Clone, Copy, Debug, Default)]
pub struct NetworkViews;

impl Module for NetworkViews {
    fn name(&self) -> &str {
        "NetworkViews"
    }

    fn functions(&self) -> Vec<FunctionSpec> {
        use network_sig::*;
        [
            CURRENT_COLONY_VERSION,
            COLONY_VERSION_RESOLVER,
            COLONY_COUNT,
            GET_COLONY,
            META_COLONY,
            EXTENSION_INSTALLATION,
            EXTENSION_RESOLVER,
        ]
        .into_iter()
        .map(|sig| FunctionSpec::view(sig, NETWORK_ORIGIN))
        .collect()
    }

    fn invoke(&self, call: &mut Invocation<'_>) -> Result<Vec<Token>, ModuleError> {
        use network_sig::*;
        let selector = call.selector;
        let is = |sig: &str| selector == Selector::from_signature(sig);
        let s = &*call.storage;

        let out = if is(CURRENT_COLONY_VERSION) {
            Token::from(s.get(network::CURRENT_COLONY_VERSION).0)
        } else if is(COLONY_VERSION_RESOLVER) {
            let version = Version(call.u64_arg(0)?);
            Token::from(s.get_entry(network::COLONY_VERSION_RESOLVERS, &version))
        } else if is(COLONY_COUNT) {
            Token::from(s.get(network::COLONY_COUNT))
        } else if is(GET_COLONY) {
            Token::from(s.get_entry(network::COLONIES, &call.u64_arg(0)?))
        } else if is(META_COLONY) {
            Token::from(s.get(network::META_COLONY))
        } else if is(EXTENSION_INSTALLATION) {
            let id = ExtensionId(call.word_arg(0)?.0);
            let colony = call.address_arg(1)?;
            Token::from(s.get_entry(network::INSTALLATIONS, &(id, colony)))
        } else if is(EXTENSION_RESOLVER) {
            let id = ExtensionId(call.word_arg(0)?.0);
            let version = Version(call.u64_arg(1)?);
            Token::from(s.get_entry(network::EXTENSION_RESOLVERS, &(id, version)))
        } else {
            return Err(ModuleError::revert(format!("NetworkViews has no function {selector}")));
        };
        Ok(vec![out])
    }
}

/// Encode an extension identifier as a call argument.
pub fn extension_token(id: ExtensionId) -> Token {
    Token::Word(Word(id.0))
}
