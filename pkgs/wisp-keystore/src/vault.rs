//! The key vault capability and its file-backed implementation

use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};
use wisp_keys::Address;

use crate::cipher;
use crate::error::KeystoreError;
use crate::keyfile::{KeyFile, KeyFileMeta, KeyFileRef, KeyMaterial, KEY_FILE_VERSION};

/// Narrow capability for encrypted key persistence, injected into account
/// management so tests can substitute a deterministic stand-in.
///
/// `location` is a directory-like handle; entries are addressed by their
/// account address, matched checksum-insensitively.
pub trait KeyVault: Send + Sync {
    /// Persist key material sealed under `password`, overwriting any
    /// existing entry for the same address (used to bump the persisted
    /// child index).
    fn store(
        &self,
        location: &Path,
        password: &str,
        material: &KeyMaterial,
    ) -> Result<KeyFileRef, KeystoreError>;

    /// Locate the entry for `address`. Legacy pre-checksum files (stored
    /// all-lowercase or all-uppercase) match the checksummed form of the
    /// same address.
    fn find_by_address(
        &self,
        location: &Path,
        address: &Address,
    ) -> Result<KeyFileRef, KeystoreError>;

    /// Unseal the material behind `key_file`. A password mismatch is
    /// reported without any filesystem detail.
    fn decrypt(&self, key_file: &KeyFileRef, password: &str)
        -> Result<KeyMaterial, KeystoreError>;

    /// Enumerate all entries under `location`. Finite and restartable.
    fn list(&self, location: &Path) -> Result<Vec<(Address, KeyFileMeta)>, KeystoreError>;
}

/// Production vault: one JSON key file per address under a directory.
#[derive(Debug, Default)]
pub struct FsKeystore;

impl FsKeystore {
    pub fn new() -> Self {
        Self
    }
}

fn file_name(address: &Address) -> String {
    format!("{}.json", hex::encode(address.as_bytes()))
}

fn read_key_file(path: &Path) -> Result<KeyFile, KeystoreError> {
    let data = fs::read_to_string(path).map_err(|source| KeystoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&data).map_err(|source| KeystoreError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

impl KeyVault for FsKeystore {
    fn store(
        &self,
        location: &Path,
        password: &str,
        material: &KeyMaterial,
    ) -> Result<KeyFileRef, KeystoreError> {
        fs::create_dir_all(location).map_err(|source| KeystoreError::Io {
            path: location.to_path_buf(),
            source,
        })?;

        let path = location.join(file_name(&material.address));
        let plaintext = serde_json::to_vec(material).map_err(|source| KeystoreError::Corrupt {
            path: path.clone(),
            source,
        })?;
        let crypto = cipher::seal(password, &plaintext)?;

        let key_file = KeyFile {
            address: material.address,
            crypto,
            version: KEY_FILE_VERSION,
        };
        let json =
            serde_json::to_string_pretty(&key_file).map_err(|source| KeystoreError::Corrupt {
                path: path.clone(),
                source,
            })?;
        fs::write(&path, json).map_err(|source| KeystoreError::Io {
            path: path.clone(),
            source,
        })?;

        info!("stored key file for {}", material.address);
        Ok(KeyFileRef {
            address: material.address,
            path,
        })
    }

    fn find_by_address(
        &self,
        location: &Path,
        address: &Address,
    ) -> Result<KeyFileRef, KeystoreError> {
        for (stored, meta) in self.list(location)? {
            if stored == *address {
                debug!("found key file for {} at {}", address, meta.path.display());
                return Ok(KeyFileRef {
                    address: *address,
                    path: meta.path,
                });
            }
        }
        Err(KeystoreError::AccountNotFound {
            address: address.to_checksum_string(),
        })
    }

    fn decrypt(
        &self,
        key_file: &KeyFileRef,
        password: &str,
    ) -> Result<KeyMaterial, KeystoreError> {
        let parsed = read_key_file(&key_file.path)?;
        let plaintext = cipher::open(&parsed.crypto, password).map_err(|err| {
            if matches!(err, KeystoreError::WrongPassword) {
                warn!("failed to decrypt key file for {}", key_file.address);
            }
            err
        })?;

        serde_json::from_slice(&plaintext).map_err(|source| KeystoreError::Corrupt {
            path: key_file.path.clone(),
            source,
        })
    }

    fn list(&self, location: &Path) -> Result<Vec<(Address, KeyFileMeta)>, KeystoreError> {
        let entries = fs::read_dir(location).map_err(|source| KeystoreError::Traversal {
            path: location.to_path_buf(),
            source,
        })?;

        let mut out = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| KeystoreError::Traversal {
                path: location.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            match read_key_file(&path) {
                Ok(key_file) => out.push((
                    key_file.address,
                    KeyFileMeta {
                        path,
                        version: key_file.version,
                    },
                )),
                // Foreign files in the vault directory are skipped, not fatal.
                Err(KeystoreError::Corrupt { .. }) => {
                    warn!("skipping malformed key file {}", path.display());
                }
                Err(other) => return Err(other),
            }
        }
        Ok(out)
    }
}
