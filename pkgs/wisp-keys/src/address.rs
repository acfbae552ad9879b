//! EVM-style addresses with EIP-55 checksum encoding
//!
//! The codec (produce the canonical mixed-case form) and the acceptance
//! rules (parse legacy all-lowercase / all-uppercase renderings) are kept
//! separate so both are independently testable.

use std::fmt;

use keccak_hash::keccak;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::KeyError;

/// Length of an address in bytes.
pub const ADDRESS_LEN: usize = 20;

/// A 20-byte account address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    pub fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Hash an uncompressed secp256k1 public key (65 bytes, `0x04` prefix)
    /// down to its address: the last 20 bytes of keccak256 over the X/Y
    /// coordinates.
    pub fn from_public_key(uncompressed: &[u8; 65]) -> Self {
        let hash = keccak(&uncompressed[1..]);
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes.copy_from_slice(&hash.0[12..32]);
        Self(bytes)
    }

    /// Parse address text leniently: an optional `0x` prefix followed by
    /// 40 hex characters in any casing. Checksummed, all-lowercase and
    /// all-uppercase legacy renderings of the same address all decode to
    /// the same value; only non-hex text or a wrong length is rejected.
    pub fn parse(text: &str) -> Result<Self, KeyError> {
        let invalid = || KeyError::InvalidAddress {
            text: text.to_string(),
        };

        let stripped = text
            .strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"))
            .unwrap_or(text);
        if stripped.len() != ADDRESS_LEN * 2 {
            return Err(invalid());
        }

        let decoded = hex::decode(stripped).map_err(|_| invalid())?;
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes.copy_from_slice(&decoded);
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Canonical EIP-55 mixed-case rendering, `0x`-prefixed.
    pub fn to_checksum_string(&self) -> String {
        checksum_encode(&self.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum_string())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_checksum_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Address::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// Encode 20 address bytes as `0x` + 40 hex characters with the EIP-55
/// checksum: a hex letter is uppercased when the corresponding nibble of
/// keccak256 over the lowercase hex form is >= 8.
pub fn checksum_encode(bytes: &[u8; ADDRESS_LEN]) -> String {
    let lower = hex::encode(bytes);
    let hash = keccak(lower.as_bytes());

    let mut out = String::with_capacity(2 + ADDRESS_LEN * 2);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = if i % 2 == 0 {
            hash.0[i / 2] >> 4
        } else {
            hash.0[i / 2] & 0x0f
        };
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Whether `text` carries a valid EIP-55 checksum. All-lowercase and
/// all-uppercase legacy renderings predate the checksum and report false
/// here, yet still parse and match during lookup.
pub fn verify_checksum(text: &str) -> bool {
    let stripped = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    match Address::parse(text) {
        Ok(address) => address.to_checksum_string()[2..] == *stripped,
        Err(_) => false,
    }
}
