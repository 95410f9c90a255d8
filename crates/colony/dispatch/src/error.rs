use colony_types::{Address, ErrorCode, Selector};
use thiserror::Error;

/// A failure raised inside an implementation module.
///
/// Modules report a stable [`ErrorCode`] plus a human-readable reason; the
/// dispatcher rolls back the call's writes before surfacing it.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{code}: {reason}")]
pub struct ModuleError {
    pub code: ErrorCode,
    pub reason: String,
}

impl ModuleError {
    pub fn new(code: ErrorCode, reason: impl Into<String>) -> Self {
        Self {
            code,
            reason: reason.into(),
        }
    }

    pub fn unauthorized(caller: Address, needed: &str) -> Self {
        Self::new(
            ErrorCode::Authorization,
            format!("caller {caller} lacks {needed}"),
        )
    }

    pub fn bad_argument(index: usize, expected: &str) -> Self {
        Self::new(
            ErrorCode::BadArgument,
            format!("argument {index} must be {expected}"),
        )
    }

    pub fn revert(reason: impl Into<String>) -> Self {
        Self::new(ErrorCode::Reverted, reason)
    }
}

/// Errors from routing, resolver construction, and dispatcher administration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("caller {caller} is not the owner of {contract}")]
    NotOwner { caller: Address, contract: Address },

    #[error("no module is bound to selector {0}")]
    Unroutable(Selector),

    #[error("resolver {0} is not deployed")]
    UnknownResolver(Address),

    #[error("module {0} is not deployed")]
    UnknownModule(Address),

    #[error("selector {selector} ({signature}) is implemented by both {first} and {second}")]
    AmbiguousBinding {
        selector: Selector,
        signature: String,
        first: String,
        second: String,
    },

    #[error("interface {interface} requires {signature} but no supplied module implements it")]
    IncompleteInterface { interface: String, signature: String },

    #[error("{0} is in recovery mode")]
    InRecoveryMode(Address),

    #[error("no contract is deployed at {0}")]
    UnknownContract(Address),

    #[error(transparent)]
    Module(#[from] ModuleError),
}

impl DispatchError {
    pub fn code(&self) -> ErrorCode {
        match self {
            DispatchError::NotOwner { .. } => ErrorCode::Authorization,
            DispatchError::Unroutable(_) => ErrorCode::UnroutableCall,
            DispatchError::UnknownResolver(_) | DispatchError::UnknownModule(_) => {
                ErrorCode::BadResolver
            }
            DispatchError::AmbiguousBinding { .. } => ErrorCode::AmbiguousBinding,
            DispatchError::IncompleteInterface { .. } => ErrorCode::UnroutableCall,
            DispatchError::InRecoveryMode(_) => ErrorCode::InRecoveryMode,
            DispatchError::UnknownContract(_) => ErrorCode::UnknownContract,
            DispatchError::Module(e) => e.code,
        }
    }
}
