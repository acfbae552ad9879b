//! Error taxonomy for the key vault

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Vault failures. `AccountNotFound` and `WrongPassword` are sentinel
/// domain categories; the rest are infrastructure failures carrying the
/// operation context.
#[derive(Debug, Error)]
pub enum KeystoreError {
    /// No key file matches the requested address. Carries the
    /// checksum-encoded form of the address that was looked up.
    #[error("cannot locate account for address: {address}")]
    AccountNotFound { address: String },

    /// Authentication failed while opening the sealed key material.
    /// Deliberately carries no path or file details.
    #[error("could not decrypt key with given password")]
    WrongPassword,

    /// The vault location could not be traversed at all (missing
    /// directory, permission error, ...).
    #[error("cannot traverse key store folder {}", .path.display())]
    Traversal {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("key store i/o failure at {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed key file at {}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported key derivation function: {kdf}")]
    UnsupportedKdf { kdf: String },

    #[error("sealed key material is malformed")]
    MalformedBlob,

    #[error("failed to seal key material")]
    Encryption,

    #[error("failed to derive the sealing key")]
    KeyDerivation,
}
