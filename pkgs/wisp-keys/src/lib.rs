//! Key material primitives for Wisp
//!
//! This crate provides the deterministic cryptography underneath account
//! management:
//! - BIP-39 seed phrase generation, validation and seed stretching
//! - Hierarchical (BIP-32) derivation of extended keys
//! - EVM-style checksum addresses and identities

pub mod address;
pub mod derivation;
pub mod error;
pub mod mnemonic;

pub use address::{checksum_encode, verify_checksum, Address};
pub use derivation::{ExtendedKey, DEFAULT_ACCOUNT_PATH};
pub use error::KeyError;
pub use mnemonic::PhraseStrength;

use serde::{Deserialize, Serialize};

/// A derived identity: the address together with the public key it is
/// hashed from. The public key is the `0x`-prefixed hex encoding of the
/// uncompressed secp256k1 point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub address: Address,
    pub public_key: String,
}

// The address is a hash of exactly one public key, so it alone decides
// identity equality.
impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
    }
}

impl Eq for Identity {}
