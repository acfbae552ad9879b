//! In-process record of the currently selected identities

use parking_lot::Mutex;

use crate::account::Account;

/// Both role slots of one selection. They are always published and
/// cleared together, so a reader can never observe the wallet slot from
/// one selection and the chat slot from another.
#[derive(Debug, Clone)]
pub(crate) struct Selection {
    pub wallet: Account,
    pub chat: Account,
}

/// At most one selected wallet account and one chat account, or none.
///
/// All access is serialized through a single mutex. Selection publishes an
/// already-computed result ("compute, then swap"); slow password-based
/// decryption never runs under this lock.
#[derive(Debug, Default)]
pub struct ActiveSession {
    inner: Mutex<Option<Selection>>,
}

impl ActiveSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn select(&self, selection: Selection) {
        *self.inner.lock() = Some(selection);
    }

    /// Clear both slots. Idempotent.
    pub fn clear(&self) {
        *self.inner.lock() = None;
    }

    pub fn selected_wallet(&self) -> Option<Account> {
        self.inner.lock().as_ref().map(|s| s.wallet.clone())
    }

    pub fn selected_chat(&self) -> Option<Account> {
        self.inner.lock().as_ref().map(|s| s.chat.clone())
    }
}
