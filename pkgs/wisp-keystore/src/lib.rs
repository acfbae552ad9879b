//! Encrypted on-disk key vault for Wisp
//!
//! One JSON key file per account address, with the key material sealed
//! under a password via ChaCha20-Poly1305. The [`KeyVault`] trait is the
//! narrow capability consumed by account management; [`FsKeystore`] is the
//! production implementation, and tests substitute their own.

pub mod cipher;
pub mod error;
pub mod keyfile;
pub mod vault;

pub use cipher::SealedBlob;
pub use error::KeystoreError;
pub use keyfile::{KeyFile, KeyFileMeta, KeyFileRef, KeyMaterial, KEY_FILE_VERSION};
pub use vault::{FsKeystore, KeyVault};
