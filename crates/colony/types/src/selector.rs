use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::HexError;

/// A 4-byte function identifier.
///
/// Derived from the canonical signature text (`"setRecoveryRole(address)"`):
/// whitespace is removed and the first four bytes of the BLAKE3 digest are kept.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Selector(pub [u8; 4]);

impl Selector {
    pub fn from_signature(signature: &str) -> Self {
        let canonical = canonical_signature(signature);
        let digest = blake3::hash(canonical.as_bytes());
        let mut out = [0u8; 4];
        out.copy_from_slice(&digest.as_bytes()[..4]);
        Self(out)
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.0))
    }
}

/// Strip all whitespace from a signature.
pub fn canonical_signature(signature: &str) -> String {
    signature.chars().filter(|c| !c.is_whitespace()).collect()
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Selector({})", self.to_hex())
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Selector {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Selector {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        HexError::decode::<4>(&text)
            .map(Selector)
            .map_err(serde::de::Error::custom)
    }
}
