use colony_dispatch::ModuleError;
use colony_storage::Family;
use colony_types::{Address, ErrorCode, Slot};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecoveryError {
    #[error("caller {caller} lacks {needed}")]
    Unauthorized { caller: Address, needed: &'static str },

    #[error("contract is in recovery mode")]
    InRecoveryMode,

    #[error("contract is not in recovery mode")]
    NotInRecoveryMode,

    #[error("{0} is protected and cannot be edited")]
    ProtectedVariable(Slot),

    #[error("{0} already approved exit in this round")]
    AlreadyApproved(Address),

    #[error("exit needs {need} approvals, have {have}")]
    InsufficientApprovals { have: u64, need: u64 },

    #[error("{0} contracts hold no reputation log replacements")]
    WrongFamily(Family),
}

impl RecoveryError {
    pub fn code(&self) -> ErrorCode {
        match self {
            RecoveryError::Unauthorized { .. } => ErrorCode::Authorization,
            RecoveryError::InRecoveryMode => ErrorCode::InRecoveryMode,
            RecoveryError::NotInRecoveryMode => ErrorCode::NotInRecoveryMode,
            RecoveryError::ProtectedVariable(_) => ErrorCode::ProtectedVariable,
            RecoveryError::AlreadyApproved(_) => ErrorCode::AlreadyApproved,
            RecoveryError::InsufficientApprovals { .. } => ErrorCode::InsufficientApprovals,
            RecoveryError::WrongFamily(_) => ErrorCode::UnknownContract,
        }
    }
}

impl From<RecoveryError> for ModuleError {
    fn from(err: RecoveryError) -> Self {
        ModuleError::new(err.code(), err.to_string())
    }
}
