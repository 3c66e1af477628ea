//! Identity and user-directory storage.
//!
//! This module provides the storage seams used by the server:
//! - **IdentityStore**: identities, credentials, roles and memberships
//! - **UserRepository**: plain user directory keyed by username
//!
//! The in-memory implementations back the standalone server and the tests.
//! Applications with a persistent store implement the traits themselves.

#![allow(missing_docs)]

pub mod memory;
pub mod traits;

// Re-exports
pub use memory::{InMemoryIdentityStore, InMemoryUserRepository, PasswordPolicy};
pub use traits::{Identity, IdentityStore, NewIdentity, UserRecord, UserRepository};
