use colony_dispatch::DispatchError;
use colony_recovery::RecoveryError;
use colony_registry::RegistryError;
use colony_types::{Address, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("network {0} is in recovery mode")]
    InRecoveryMode(Address),

    #[error("network has no colony version yet")]
    NotInitialised,

    #[error("meta colony already exists at {0}")]
    MetaColonyExists(Address),

    #[error("caller {caller} lacks {needed}")]
    Unauthorized { caller: Address, needed: &'static str },

    #[error("{0} is not a colony")]
    NotAColony(Address),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Recovery(#[from] RecoveryError),
}

impl NetworkError {
    pub fn code(&self) -> ErrorCode {
        match self {
            NetworkError::InRecoveryMode(_) => ErrorCode::InRecoveryMode,
            NetworkError::NotInitialised => ErrorCode::VersionNotFound,
            NetworkError::MetaColonyExists(_) => ErrorCode::AlreadyInitialised,
            NetworkError::Unauthorized { .. } => ErrorCode::Authorization,
            NetworkError::NotAColony(_) => ErrorCode::UnknownContract,
            NetworkError::Config(_) | NetworkError::Io(_) => ErrorCode::BadArgument,
            NetworkError::Dispatch(e) => e.code(),
            NetworkError::Registry(e) => e.code(),
            NetworkError::Recovery(e) => e.code(),
        }
    }
}

pub type NetworkResult<T> = Result<T, NetworkError>;
