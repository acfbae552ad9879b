//! On-disk key file format

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use wisp_keys::{Address, ExtendedKey, Identity, KeyError};

use crate::cipher::SealedBlob;

pub const KEY_FILE_VERSION: u32 = 1;

/// Decrypted key material for one account: the extended private key in its
/// Base58 form plus the next child index for deterministic sub-account
/// derivation. The index is persisted here, next to the key, so child
/// addresses never collide across process restarts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyMaterial {
    pub address: Address,
    pub public_key: String,
    pub xprv: String,
    pub next_child_index: u32,
}

impl KeyMaterial {
    pub fn new(identity: &Identity, key: &ExtendedKey) -> Self {
        Self {
            address: identity.address,
            public_key: identity.public_key.clone(),
            xprv: key.encode(),
            next_child_index: 0,
        }
    }

    pub fn identity(&self) -> Identity {
        Identity {
            address: self.address,
            public_key: self.public_key.clone(),
        }
    }

    pub fn extended_key(&self) -> Result<ExtendedKey, KeyError> {
        ExtendedKey::decode(&self.xprv)
    }
}

/// The JSON document written to disk: the address in the clear for lookup,
/// everything sensitive sealed under the password.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyFile {
    pub address: Address,
    pub crypto: SealedBlob,
    pub version: u32,
}

/// Opaque handle to one persisted, encrypted key file. Owned by the vault;
/// accounts merely reference it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyFileRef {
    pub address: Address,
    pub path: PathBuf,
}

/// Listing metadata for one key file.
#[derive(Debug, Clone)]
pub struct KeyFileMeta {
    pub path: PathBuf,
    pub version: u32,
}
