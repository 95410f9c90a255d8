use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::HexError;

/// A 20-byte account identifier.
///
/// Every deployed thing (dispatchers, modules, resolvers) and every caller is
/// named by an `Address`. The zero address is the "not found" sentinel.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; 20]);

impl Address {
    pub const ZERO: Address = Address([0u8; 20]);

    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Deterministically derive an address from a namespace and a nonce.
    ///
    /// Used by the host to allocate addresses for new deployments.
    pub fn derive(namespace: &str, nonce: u64) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"colony.address.v1");
        hasher.update(namespace.as_bytes());
        hasher.update(&nonce.to_be_bytes());
        let digest = hasher.finalize();
        let mut out = [0u8; 20];
        out.copy_from_slice(&digest.as_bytes()[..20]);
        Self(out)
    }

    /// Stable address for a human-readable label (`"alice"`, `"deployer"`).
    pub fn from_label(label: &str) -> Self {
        Self::derive("label", 0).mix(label)
    }

    fn mix(self, label: &str) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.0);
        hasher.update(label.as_bytes());
        let mut out = [0u8; 20];
        out.copy_from_slice(&hasher.finalize().as_bytes()[..20]);
        Self(out)
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    pub fn from_hex(text: &str) -> Result<Self, HexError> {
        HexError::decode::<20>(text).map(Self)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", &self.to_hex()[..10])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Address {
    type Err = HexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Address {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Address::from_hex(&text).map_err(serde::de::Error::custom)
    }
}

/// A 32-byte storage word. Integers are stored big-endian, right-aligned.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Word(pub [u8; 32]);

impl Word {
    pub const ZERO: Word = Word([0u8; 32]);

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    pub fn from_u64(value: u64) -> Self {
        Self::from_u128(value as u128)
    }

    pub fn from_u128(value: u128) -> Self {
        let mut out = [0u8; 32];
        out[16..].copy_from_slice(&value.to_be_bytes());
        Self(out)
    }

    /// Two's complement, sign-extended across the full word.
    pub fn from_i128(value: i128) -> Self {
        let fill = if value < 0 { 0xff } else { 0x00 };
        let mut out = [fill; 32];
        out[16..].copy_from_slice(&value.to_be_bytes());
        Self(out)
    }

    pub fn from_address(address: &Address) -> Self {
        let mut out = [0u8; 32];
        out[12..].copy_from_slice(&address.0);
        Self(out)
    }

    pub fn from_bool(value: bool) -> Self {
        Self::from_u64(value as u64)
    }

    /// Low 8 bytes as an integer. Higher bytes are ignored.
    pub fn low_u64(&self) -> u64 {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&self.0[24..]);
        u64::from_be_bytes(buf)
    }

    pub fn low_u128(&self) -> u128 {
        let mut buf = [0u8; 16];
        buf.copy_from_slice(&self.0[16..]);
        u128::from_be_bytes(buf)
    }

    pub fn low_i128(&self) -> i128 {
        self.low_u128() as i128
    }

    pub fn to_address(&self) -> Address {
        let mut out = [0u8; 20];
        out.copy_from_slice(&self.0[12..]);
        Address(out)
    }

    /// Hash of the concatenation of several words, used for composite keys.
    pub fn combine(parts: &[Word]) -> Self {
        let mut hasher = blake3::Hasher::new();
        for part in parts {
            hasher.update(&part.0);
        }
        Self(*hasher.finalize().as_bytes())
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parse a full 32-byte hex word, or a shorter hex quantity such as
    /// `0xdeadbeef`, which is right-aligned.
    pub fn from_hex(text: &str) -> Result<Self, HexError> {
        let digits = text.strip_prefix("0x").unwrap_or(text);
        if digits.len() > 64 {
            return Err(HexError::InvalidLength {
                expected: 64,
                actual: digits.len(),
            });
        }
        let padded = format!("{:0>64}", digits);
        HexError::decode::<32>(&padded).map(Self)
    }
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word({})", self.to_hex())
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Word {
    type Err = HexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Word {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Word {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Word::from_hex(&text).map_err(serde::de::Error::custom)
    }
}
