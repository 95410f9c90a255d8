use colony_dispatch::{FunctionSpec, Invocation, Module, ModuleError};
use colony_storage::layout::extension;
use colony_types::{ExtensionId, Selector, Token, Version, Word};

const ORIGIN: &str = "ColonyExtension";

pub const IDENTIFIER: &str = "identifier()";
pub const VERSION: &str = "version()";
pub const INSTALL: &str = "install(address)";
pub const FINISH_UPGRADE: &str = "finishUpgrade()";
pub const DEPRECATE: &str = "deprecate(bool)";
pub const UNINSTALL: &str = "uninstall()";
pub const GET_COLONY: &str = "getColony()";
pub const GET_DEPRECATED: &str = "getDeprecated()";

/// The lifecycle surface every extension version carries.
///
/// Lifecycle entry points are owner-only. The owner of every instance is the
/// network, so colonies and end users can only reach them through the
/// extension registry.
#[derive(Clone, Debug)]
pub struct ExtensionCore {
    name: String,
    id: ExtensionId,
    version: Version,
}

impl ExtensionCore {
    pub fn new(name: impl Into<String>, version: Version) -> Self {
        let name = name.into();
        Self {
            id: ExtensionId::from_name(&name),
            name,
            version,
        }
    }

    pub fn id(&self) -> ExtensionId {
        self.id
    }

    pub fn version(&self) -> Version {
        self.version
    }
}

impl Module for ExtensionCore {
    fn name(&self) -> &str {
        &self.name
    }

    fn functions(&self) -> Vec<FunctionSpec> {
        vec![
            FunctionSpec::view(IDENTIFIER, ORIGIN),
            FunctionSpec::view(VERSION, ORIGIN),
            FunctionSpec::mutating(INSTALL, ORIGIN),
            FunctionSpec::mutating(FINISH_UPGRADE, ORIGIN),
            FunctionSpec::mutating(DEPRECATE, ORIGIN),
            FunctionSpec::mutating(UNINSTALL, ORIGIN),
            FunctionSpec::view(GET_COLONY, ORIGIN),
            FunctionSpec::view(GET_DEPRECATED, ORIGIN),
        ]
    }

    fn invoke(&self, call: &mut Invocation<'_>) -> Result<Vec<Token>, ModuleError> {
        let selector = call.selector;
        let is = |sig: &str| selector == Selector::from_signature(sig);

        if is(IDENTIFIER) {
            Ok(vec![Token::Word(Word(self.id.0))])
        } else if is(VERSION) {
            Ok(vec![Token::from(self.version.0)])
        } else if is(GET_COLONY) {
            Ok(vec![Token::from(call.storage.get(extension::COLONY))])
        } else if is(GET_DEPRECATED) {
            Ok(vec![Token::from(call.storage.get(extension::DEPRECATED))])
        } else if is(INSTALL) {
            call.require_owner()?;
            let colony = call.address_arg(0)?;
            if !call.storage.get(extension::COLONY).is_zero() {
                return Err(ModuleError::revert("extension already installed"));
            }
            call.storage.set(extension::COLONY, colony);
            Ok(vec![])
        } else if is(FINISH_UPGRADE) || is(UNINSTALL) {
            call.require_owner()?;
            Ok(vec![])
        } else if is(DEPRECATE) {
            call.require_owner()?;
            let flag = call.bool_arg(0)?;
            call.storage.set(extension::DEPRECATED, flag);
            Ok(vec![])
        } else {
            Err(ModuleError::revert(format!("{} has no function {selector}", self.name)))
        }
    }
}
