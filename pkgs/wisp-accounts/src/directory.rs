//! Directory of locally known identities

use wisp_keys::Identity;

/// Lists every locally known identity, independent of what is currently
/// selected. Injected into the manager so production supplies the real
/// registry and tests a deterministic stand-in.
pub trait DirectoryService: Send + Sync {
    fn list_accounts(&self) -> anyhow::Result<Vec<Identity>>;
}
