//! Account orchestration: creation, recovery, verification, selection and
//! child derivation

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use wisp_keys::{
    mnemonic, Address, ExtendedKey, Identity, PhraseStrength, DEFAULT_ACCOUNT_PATH,
};
use wisp_keystore::{KeyFileRef, KeyMaterial, KeyVault, KeystoreError};

use crate::account::{Account, AccountRole, CreatedAccount};
use crate::directory::DirectoryService;
use crate::error::AccountError;
use crate::session::{ActiveSession, Selection};

/// The identity and key-management core. One instance is shared across
/// concurrent callers; the vault and directory are injected capabilities.
pub struct AccountManager {
    vault: Arc<dyn KeyVault>,
    directory: Arc<dyn DirectoryService>,
    keystore_dir: PathBuf,
    session: ActiveSession,
}

impl AccountManager {
    pub fn new(
        vault: Arc<dyn KeyVault>,
        directory: Arc<dyn DirectoryService>,
        keystore_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            vault,
            directory,
            keystore_dir: keystore_dir.into(),
            session: ActiveSession::new(),
        }
    }

    /// Create a new account protected by `password`.
    ///
    /// Generates a 12-word seed phrase, derives the default account key at
    /// `m/44'/60'/0'/0/0` and stores it encrypted. The phrase is returned
    /// exactly once and never persisted; losing it is unrecoverable by
    /// design. The chat role is bound to the same key as the wallet role.
    pub fn create_account(&self, password: &str) -> Result<CreatedAccount, AccountError> {
        let seed_phrase = mnemonic::generate_phrase(PhraseStrength::Words12)?;
        let (identity, material) = derive_account(&seed_phrase)?;
        self.vault
            .store(&self.keystore_dir, password, &material)?;

        info!("account created for {}", identity.address);
        Ok(CreatedAccount {
            address: identity.address,
            public_key: identity.public_key,
            seed_phrase,
        })
    }

    /// Recover the account encoded by `phrase` and store it encrypted with
    /// `password`. Re-derivation is deterministic: the same phrase always
    /// yields the same address, which is how recovery is verified.
    pub fn recover_account(&self, password: &str, phrase: &str) -> Result<Identity, AccountError> {
        mnemonic::validate_phrase(phrase)?;
        let (identity, material) = derive_account(phrase)?;
        self.vault
            .store(&self.keystore_dir, password, &material)?;

        info!("account recovered for {}", identity.address);
        Ok(identity)
    }

    /// Verify `password` against the key stored for `address_text` under
    /// `location`, returning the decrypted key material on success.
    ///
    /// The failure modes are distinct and never conflated: an untraversable
    /// location reports the failing path, an unknown address reports the
    /// checksummed form it looked for, and a password mismatch reports no
    /// filesystem detail at all.
    pub fn verify_account_password(
        &self,
        location: &Path,
        address_text: &str,
        password: &str,
    ) -> Result<KeyMaterial, AccountError> {
        debug!("verifying account password for {}", address_text);
        let (material, _) = self.lookup_and_decrypt(location, address_text, password)?;
        Ok(material)
    }

    /// Select the account for both the wallet and chat roles.
    ///
    /// Runs the same lookup+decrypt protocol as
    /// [`AccountManager::verify_account_password`]; only after it fully
    /// succeeds is the session lock taken and both slots swapped in one
    /// step. On any failure the session is left exactly as it was.
    pub fn select_account(&self, address_text: &str, password: &str) -> Result<(), AccountError> {
        let (material, key_file) =
            self.lookup_and_decrypt(&self.keystore_dir, address_text, password)?;
        let identity = material.identity();

        // Chat is bound to the same key as wallet; a separate chat
        // derivation path is a pending design decision.
        let selection = Selection {
            wallet: Account {
                identity: identity.clone(),
                role: AccountRole::Wallet,
                key_file: key_file.clone(),
            },
            chat: Account {
                identity: identity.clone(),
                role: AccountRole::Chat,
                key_file,
            },
        };
        self.session.select(selection);

        info!("account selected for {}", identity.address);
        Ok(())
    }

    /// Currently selected wallet account, if any. Emptiness is a value,
    /// not an error.
    pub fn selected_wallet_account(&self) -> Option<Account> {
        self.session.selected_wallet()
    }

    /// Currently selected chat account, if any.
    pub fn selected_chat_account(&self) -> Option<Account> {
        self.session.selected_chat()
    }

    /// Derive and persist the next child account under the target identity.
    ///
    /// With an empty `address_text` the selected wallet account is the
    /// parent; if nothing is selected this fails with
    /// [`AccountError::NoAccountSelected`]. The child index is read from
    /// and written back to the parent's key file, so it survives restarts
    /// and child addresses never collide across sessions.
    pub fn create_child_account(
        &self,
        address_text: &str,
        password: &str,
    ) -> Result<Identity, AccountError> {
        let target = if address_text.is_empty() {
            self.session
                .selected_wallet()
                .ok_or(AccountError::NoAccountSelected)?
                .identity
                .address
        } else {
            Address::parse(address_text)?
        };

        let (mut parent, _) = self.decrypt_by_address(&self.keystore_dir, target, password)?;
        let parent_key = parent.extended_key()?;
        let child = parent_key.derive_child(parent.next_child_index, false)?;
        let child_identity = child.to_identity()?;

        let child_material = KeyMaterial::new(&child_identity, &child);
        self.vault
            .store(&self.keystore_dir, password, &child_material)?;

        // Indices skipped by derivation retries stay burned.
        parent.next_child_index = child.child_index() + 1;
        self.vault.store(&self.keystore_dir, password, &parent)?;

        info!(
            "child account {} derived at index {}",
            child_identity.address,
            child.child_index()
        );
        Ok(child_identity)
    }

    /// Clear the active session. Idempotent, never fails.
    pub fn logout(&self) {
        self.session.clear();
        info!("session cleared");
    }

    /// All locally known identities, straight from the directory service
    /// and unmodified by selection state.
    pub fn accounts(&self) -> Result<Vec<Identity>, AccountError> {
        self.directory
            .list_accounts()
            .map_err(AccountError::Directory)
    }

    /// One-off lookup+decrypt for `address_text` without touching the
    /// session. This is the protocol selection and child derivation are
    /// built on.
    pub fn address_to_decrypted_account(
        &self,
        address_text: &str,
        password: &str,
    ) -> Result<(KeyMaterial, KeyFileRef), AccountError> {
        self.lookup_and_decrypt(&self.keystore_dir, address_text, password)
    }

    fn lookup_and_decrypt(
        &self,
        location: &Path,
        address_text: &str,
        password: &str,
    ) -> Result<(KeyMaterial, KeyFileRef), AccountError> {
        let address = Address::parse(address_text)?;
        self.decrypt_by_address(location, address, password)
    }

    fn decrypt_by_address(
        &self,
        location: &Path,
        address: Address,
        password: &str,
    ) -> Result<(KeyMaterial, KeyFileRef), AccountError> {
        let key_file = self.vault.find_by_address(location, &address)?;
        let material = self.vault.decrypt(&key_file, password)?;

        // Never hand back a partially-correct identity: the decrypted key
        // must be for exactly the requested address.
        if material.address != address {
            warn!(
                "key file for {} decrypted to mismatching address {}",
                address, material.address
            );
            return Err(AccountError::Keystore(KeystoreError::AccountNotFound {
                address: address.to_checksum_string(),
            }));
        }
        Ok((material, key_file))
    }
}

fn derive_account(phrase: &str) -> Result<(Identity, KeyMaterial), AccountError> {
    let seed = mnemonic::derive_seed(phrase, "")?;
    let key = ExtendedKey::from_seed_with_path(&seed, DEFAULT_ACCOUNT_PATH)?;
    let identity = key.to_identity()?;
    let material = KeyMaterial::new(&identity, &key);
    Ok((identity, material))
}
