use colony_dispatch::DispatchError;
use colony_storage::Family;
use colony_types::{Address, DomainId, ErrorCode, ExtensionId, Version};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("caller {caller} lacks {needed}")]
    Unauthorized { caller: Address, needed: &'static str },

    #[error("network is already initialised")]
    AlreadyInitialised,

    #[error("resolver {0} is missing, undeployed, or does not describe the expected contract")]
    BadResolver(Address),

    #[error("next version must be {expected}, resolver declares {declared}")]
    BadVersionOrder { expected: Version, declared: Version },

    #[error("colony version {0} is not registered")]
    VersionNotFound(Version),

    #[error("target {target} is not newer than current {current}")]
    MustBeNewer { current: Version, target: Version },

    #[error("colony version {0} is not registered")]
    MustBeRegistered(Version),

    #[error("{0} is in recovery mode")]
    InRecoveryMode(Address),

    #[error("{0} is not in recovery mode")]
    NotInRecoveryMode(Address),

    #[error("roles may only be declared on version 1, not {0}")]
    NonEmptyRolesOnUpgrade(Version),

    #[error("only root may install {requested}; latest is {latest}")]
    RootOrLatestOnly { requested: Version, latest: Version },

    #[error("{extension} is already installed in {colony}")]
    AlreadyInstalled { extension: ExtensionId, colony: Address },

    #[error("{extension} is not installed in {colony}")]
    NotInstalled { extension: ExtensionId, colony: Address },

    #[error("{0} is deprecated")]
    ExtensionDeprecated(ExtensionId),

    #[error("domain {0} does not exist")]
    DomainNotFound(DomainId),

    #[error("root-scoped roles may only be enabled in the root domain, not domain {0}")]
    DomainNotAllowedForRole(DomainId),

    #[error("upgrade must advance exactly one version from {installed}, got {target}")]
    BadIncrement { installed: Version, target: Version },

    #[error("extension version {0} is not registered")]
    BadVersion(Version),

    #[error("{0} is not a {1} contract")]
    WrongFamily(Address, Family),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl RegistryError {
    pub fn code(&self) -> ErrorCode {
        match self {
            RegistryError::Unauthorized { .. } => ErrorCode::Authorization,
            RegistryError::AlreadyInitialised => ErrorCode::AlreadyInitialised,
            RegistryError::BadResolver(_) => ErrorCode::BadResolver,
            RegistryError::BadVersionOrder { .. } => ErrorCode::BadVersionOrder,
            RegistryError::VersionNotFound(_) => ErrorCode::VersionNotFound,
            RegistryError::MustBeNewer { .. } => ErrorCode::MustBeNewer,
            RegistryError::MustBeRegistered(_) => ErrorCode::MustBeRegistered,
            RegistryError::InRecoveryMode(_) => ErrorCode::InRecoveryMode,
            RegistryError::NotInRecoveryMode(_) => ErrorCode::NotInRecoveryMode,
            RegistryError::NonEmptyRolesOnUpgrade(_) => ErrorCode::NonEmptyRolesOnUpgrade,
            RegistryError::RootOrLatestOnly { .. } => ErrorCode::RootOrLatestOnly,
            RegistryError::AlreadyInstalled { .. } => ErrorCode::AlreadyInstalled,
            RegistryError::NotInstalled { .. } => ErrorCode::NotInstalled,
            RegistryError::ExtensionDeprecated(_) => ErrorCode::ExtensionDeprecated,
            RegistryError::DomainNotFound(_) => ErrorCode::DomainNotFound,
            RegistryError::DomainNotAllowedForRole(_) => ErrorCode::DomainNotAllowedForRole,
            RegistryError::BadIncrement { .. } => ErrorCode::BadIncrement,
            RegistryError::BadVersion(_) => ErrorCode::BadVersion,
            RegistryError::WrongFamily(..) => ErrorCode::UnknownContract,
            RegistryError::Dispatch(e) => e.code(),
        }
    }
}
