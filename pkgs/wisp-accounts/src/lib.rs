//! Account management for Wisp
//!
//! This crate orchestrates the identity core of the client:
//! - Account creation and recovery from seed phrases
//! - Password verification against the encrypted key vault
//! - Selection of the active wallet/chat identity and logout
//! - Deterministic derivation of child accounts
//!
//! One [`AccountManager`] instance is shared across concurrent callers.
//! The active session is the only mutable state; everything expensive
//! (seed stretching, decryption, derivation) runs before its lock is
//! taken, and every operation either fully succeeds or leaves the session
//! untouched.

pub mod account;
pub mod directory;
pub mod error;
pub mod manager;
pub mod session;

pub use account::{Account, AccountRole, CreatedAccount};
pub use directory::DirectoryService;
pub use error::AccountError;
pub use manager::AccountManager;
pub use session::ActiveSession;
