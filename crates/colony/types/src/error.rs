use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Stable, machine-matchable reason codes.
///
/// Every error raised by any Colony crate maps to exactly one code, so
/// callers can match on failures without parsing messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    Authorization,
    InRecoveryMode,
    NotInRecoveryMode,
    ProtectedVariable,
    InsufficientApprovals,
    AlreadyApproved,
    MustBeNewer,
    MustBeRegistered,
    BadVersionOrder,
    BadIncrement,
    BadVersion,
    BadResolver,
    VersionNotFound,
    NonEmptyRolesOnUpgrade,
    RootOrLatestOnly,
    AmbiguousBinding,
    UnroutableCall,
    AlreadyInstalled,
    NotInstalled,
    ExtensionDeprecated,
    DomainNotAllowedForRole,
    DomainNotFound,
    UnknownContract,
    AlreadyInitialised,
    BadArgument,
    Reverted,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Authorization => "AUTHORIZATION",
            ErrorCode::InRecoveryMode => "IN_RECOVERY_MODE",
            ErrorCode::NotInRecoveryMode => "NOT_IN_RECOVERY_MODE",
            ErrorCode::ProtectedVariable => "PROTECTED_VARIABLE",
            ErrorCode::InsufficientApprovals => "INSUFFICIENT_APPROVALS",
            ErrorCode::AlreadyApproved => "ALREADY_APPROVED",
            ErrorCode::MustBeNewer => "MUST_BE_NEWER",
            ErrorCode::MustBeRegistered => "MUST_BE_REGISTERED",
            ErrorCode::BadVersionOrder => "BAD_VERSION_ORDER",
            ErrorCode::BadIncrement => "BAD_INCREMENT",
            ErrorCode::BadVersion => "BAD_VERSION",
            ErrorCode::BadResolver => "BAD_RESOLVER",
            ErrorCode::VersionNotFound => "VERSION_NOT_FOUND",
            ErrorCode::NonEmptyRolesOnUpgrade => "NON_EMPTY_ROLES_ON_UPGRADE",
            ErrorCode::RootOrLatestOnly => "ROOT_OR_LATEST_ONLY",
            ErrorCode::AmbiguousBinding => "AMBIGUOUS_BINDING",
            ErrorCode::UnroutableCall => "UNROUTABLE_CALL",
            ErrorCode::AlreadyInstalled => "ALREADY_INSTALLED",
            ErrorCode::NotInstalled => "NOT_INSTALLED",
            ErrorCode::ExtensionDeprecated => "EXTENSION_DEPRECATED",
            ErrorCode::DomainNotAllowedForRole => "DOMAIN_NOT_ALLOWED_FOR_ROLE",
            ErrorCode::DomainNotFound => "DOMAIN_NOT_FOUND",
            ErrorCode::UnknownContract => "UNKNOWN_CONTRACT",
            ErrorCode::AlreadyInitialised => "ALREADY_INITIALISED",
            ErrorCode::BadArgument => "BAD_ARGUMENT",
            ErrorCode::Reverted => "REVERTED",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from parsing hex-encoded values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HexError {
    #[error("invalid hex length: {actual} (expected {expected})")]
    InvalidLength { expected: usize, actual: usize },
    #[error("invalid hex character")]
    InvalidCharacter,
}

impl HexError {
    /// Decode `text` (with or without a `0x` prefix) into exactly `N` bytes.
    pub(crate) fn decode<const N: usize>(text: &str) -> Result<[u8; N], HexError> {
        let digits = text.strip_prefix("0x").unwrap_or(text);
        let mut out = [0u8; N];
        hex::decode_to_slice(digits, &mut out).map_err(|e| match e {
            hex::FromHexError::InvalidHexCharacter { .. } => HexError::InvalidCharacter,
            _ => HexError::InvalidLength {
                expected: N * 2,
                actual: digits.len(),
            },
        })?;
        Ok(out)
    }
}
