//! Account types

use wisp_keys::{Address, Identity};
use wisp_keystore::KeyFileRef;

/// Role an identity plays while selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountRole {
    Wallet,
    Chat,
}

/// An identity tagged with its role, plus a reference (not ownership) to
/// where its encrypted key material lives in the vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub identity: Identity,
    pub role: AccountRole,
    pub key_file: KeyFileRef,
}

/// The result of account creation. The seed phrase is returned exactly
/// once, here; it is never persisted and its custody is entirely the
/// caller's.
#[derive(Debug, Clone)]
pub struct CreatedAccount {
    pub address: Address,
    pub public_key: String,
    pub seed_phrase: String,
}
