//! Error taxonomy for account management
//!
//! Domain failures (`NoAccountSelected`, plus the sentinel variants
//! forwarded transparently from the key and vault layers: wrong password,
//! account not found, invalid checksum/wordlist/address/child key) are
//! matchable categories that are never retried here. Infrastructure
//! failures carry context but no stable identity.

use thiserror::Error;
use wisp_keys::KeyError;
use wisp_keystore::KeystoreError;

#[derive(Debug, Error)]
pub enum AccountError {
    /// A child account was requested with no explicit address and no
    /// wallet identity selected.
    #[error("no account selected")]
    NoAccountSelected,

    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Keystore(#[from] KeystoreError),

    /// Opaque directory service failure, propagated as reported.
    #[error("directory service failure")]
    Directory(#[source] anyhow::Error),
}
