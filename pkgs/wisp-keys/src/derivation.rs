//! Hierarchical key derivation and identity extraction
//!
//! Wraps BIP-32 extended private keys with the retry contract for
//! out-of-range child indices and the public-key-to-address pipeline.

use bip32::{ChildNumber, DerivationPath, Prefix, XPrv};

use secp256k1::{PublicKey, Secp256k1, SecretKey};

use crate::address::Address;
use crate::error::KeyError;
use crate::Identity;

/// Default account derivation path (EVM convention, coin type 60).
pub const DEFAULT_ACCOUNT_PATH: &str = "m/44'/60'/0'/0/0";

/// How many successive indices to try when one yields an out-of-range
/// intermediate key. The per-index probability is below 2^-127; exhausting
/// the bound means something is badly wrong and is reported, never skipped.
pub const MAX_CHILD_RETRIES: u32 = 4;

/// An extended private key: private scalar, chain code, depth and child
/// number. Held in memory only for the duration of an operation; the
/// underlying key zeroizes itself on drop.
pub struct ExtendedKey {
    xprv: XPrv,
}

impl ExtendedKey {
    /// Root key at depth 0, from a BIP-39 master seed.
    pub fn master(seed: &[u8]) -> Result<Self, KeyError> {
        let xprv = XPrv::new(seed).map_err(KeyError::Derivation)?;
        Ok(Self { xprv })
    }

    /// Derive directly from a seed along a path such as
    /// [`DEFAULT_ACCOUNT_PATH`].
    pub fn from_seed_with_path(seed: &[u8], path: &str) -> Result<Self, KeyError> {
        let path: DerivationPath = path.parse().map_err(KeyError::Derivation)?;
        let xprv = XPrv::derive_from_path(seed, &path).map_err(KeyError::Derivation)?;
        Ok(Self { xprv })
    }

    /// Derive a child key at `index`. On the astronomically rare
    /// out-of-range intermediate the next index is tried, up to
    /// [`MAX_CHILD_RETRIES`] further attempts; check
    /// [`ExtendedKey::child_index`] on the result for the index actually
    /// used.
    pub fn derive_child(&self, index: u32, hardened: bool) -> Result<Self, KeyError> {
        let mut attempt = index;
        for _ in 0..=MAX_CHILD_RETRIES {
            let child_number =
                ChildNumber::new(attempt, hardened).map_err(KeyError::Derivation)?;
            match self.xprv.derive_child(child_number) {
                Ok(xprv) => return Ok(Self { xprv }),
                Err(_) => {
                    attempt = attempt.checked_add(1).ok_or(KeyError::InvalidChildKey)?;
                }
            }
        }
        Err(KeyError::InvalidChildKey)
    }

    pub fn depth(&self) -> u8 {
        self.xprv.attrs().depth
    }

    /// Index of this key under its parent, without the hardened flag.
    pub fn child_index(&self) -> u32 {
        self.xprv.attrs().child_number.index()
    }

    pub fn is_hardened(&self) -> bool {
        self.xprv.attrs().child_number.is_hardened()
    }

    /// Compute the identity for this key: secp256k1 public key from the
    /// private scalar, address from the keccak hash of the uncompressed
    /// point. Pure and deterministic.
    pub fn to_identity(&self) -> Result<Identity, KeyError> {
        let scalar: [u8; 32] = self.xprv.private_key().to_bytes().into();
        // A scalar coming out of a valid extended key is always in range.
        let secret = SecretKey::from_byte_array(scalar).map_err(|_| KeyError::InvalidChildKey)?;

        let secp = Secp256k1::new();
        let public_key = PublicKey::from_secret_key(&secp, &secret);
        let uncompressed = public_key.serialize_uncompressed();

        Ok(Identity {
            address: Address::from_public_key(&uncompressed),
            public_key: format!("0x{}", hex::encode(uncompressed)),
        })
    }

    /// Serialize to the Base58 `xprv...` form for encrypted persistence.
    pub fn encode(&self) -> String {
        let encoded = self.xprv.to_string(Prefix::XPRV);
        encoded.as_str().to_owned()
    }

    /// Parse a key previously produced by [`ExtendedKey::encode`].
    pub fn decode(encoded: &str) -> Result<Self, KeyError> {
        let xprv: XPrv = encoded.parse().map_err(KeyError::Derivation)?;
        Ok(Self { xprv })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mnemonic;

    /// A valid 12-word BIP-39 mnemonic for testing.
    const TEST_MNEMONIC: &str =
        "abandon amount liar amount expire adjust cage candy arch gather drum buyer";

    const REFERENCE_MNEMONIC: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    fn test_seed() -> [u8; 64] {
        mnemonic::derive_seed(TEST_MNEMONIC, "").unwrap()
    }

    #[test]
    fn test_master_key_is_depth_zero() {
        let master = ExtendedKey::master(&test_seed()).unwrap();
        assert_eq!(master.depth(), 0);
        assert_eq!(master.child_index(), 0);
    }

    #[test]
    fn test_master_key_is_deterministic() {
        let a = ExtendedKey::master(&test_seed()).unwrap();
        let b = ExtendedKey::master(&test_seed()).unwrap();
        assert_eq!(a.encode(), b.encode());
    }

    #[test]
    fn test_default_path_derivation() {
        let seed = test_seed();
        let account = ExtendedKey::from_seed_with_path(&seed, DEFAULT_ACCOUNT_PATH).unwrap();
        assert_eq!(account.depth(), 5);
        assert!(!account.is_hardened());

        let identity = account.to_identity().unwrap();
        let rendered = identity.address.to_checksum_string();
        assert!(rendered.starts_with("0x"));
        assert_eq!(rendered.len(), 42);
        assert!(identity.public_key.starts_with("0x04"));
    }

    #[test]
    fn test_reference_vector_address() {
        // m/44'/60'/0'/0/0 of the all-`abandon` mnemonic is a widely
        // published vector.
        let seed = mnemonic::derive_seed(REFERENCE_MNEMONIC, "").unwrap();
        let account = ExtendedKey::from_seed_with_path(&seed, DEFAULT_ACCOUNT_PATH).unwrap();
        let identity = account.to_identity().unwrap();
        assert_eq!(
            identity.address.to_checksum_string(),
            "0x9858EfFD232B4033E47d90003D41EC34EcaEda94"
        );
    }

    #[test]
    fn test_child_derivation_is_deterministic() {
        let seed = test_seed();
        let account = ExtendedKey::from_seed_with_path(&seed, DEFAULT_ACCOUNT_PATH).unwrap();

        let child1 = account.derive_child(0, false).unwrap();
        let child2 = account.derive_child(0, false).unwrap();
        assert_eq!(child1.encode(), child2.encode());
        assert_eq!(child1.to_identity().unwrap(), child2.to_identity().unwrap());
    }

    #[test]
    fn test_sibling_children_differ() {
        let seed = test_seed();
        let account = ExtendedKey::from_seed_with_path(&seed, DEFAULT_ACCOUNT_PATH).unwrap();

        let child0 = account.derive_child(0, false).unwrap();
        let child1 = account.derive_child(1, false).unwrap();
        assert_ne!(
            child0.to_identity().unwrap().address,
            child1.to_identity().unwrap().address
        );
        assert_eq!(child0.child_index(), 0);
        assert_eq!(child1.child_index(), 1);
        assert_eq!(child0.depth(), account.depth() + 1);
    }

    #[test]
    fn test_hardened_and_normal_children_differ() {
        let master = ExtendedKey::master(&test_seed()).unwrap();
        let normal = master.derive_child(7, false).unwrap();
        let hardened = master.derive_child(7, true).unwrap();

        assert!(!normal.is_hardened());
        assert!(hardened.is_hardened());
        assert_ne!(
            normal.to_identity().unwrap().address,
            hardened.to_identity().unwrap().address
        );
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let account =
            ExtendedKey::from_seed_with_path(&test_seed(), DEFAULT_ACCOUNT_PATH).unwrap();
        let decoded = ExtendedKey::decode(&account.encode()).unwrap();
        assert_eq!(decoded.encode(), account.encode());
        assert_eq!(decoded.depth(), account.depth());
        assert_eq!(
            decoded.to_identity().unwrap(),
            account.to_identity().unwrap()
        );
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            ExtendedKey::decode("not-an-xprv"),
            Err(KeyError::Derivation(_))
        ));
    }
}
