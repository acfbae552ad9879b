//! Error taxonomy for key material handling

use thiserror::Error;

/// Errors raised while generating, validating or deriving key material.
///
/// The first four variants are sentinel categories that callers branch on;
/// the remaining ones wrap lower-level failures.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("mnemonic phrase has an invalid checksum")]
    InvalidChecksum,

    #[error("mnemonic phrase contains words outside the wordlist")]
    InvalidWordlist,

    #[error("could not derive a valid child key")]
    InvalidChildKey,

    #[error("invalid account address: {text}")]
    InvalidAddress { text: String },

    #[error("system entropy source is unavailable")]
    EntropyUnavailable(#[source] rand::Error),

    #[error("mnemonic handling failed")]
    Mnemonic(#[source] bip39::Error),

    #[error("key derivation failed")]
    Derivation(#[source] bip32::Error),
}
