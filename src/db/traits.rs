//! Identity and user-directory store abstractions
//!
//! The core never owns identities, roles or memberships. It reaches them only
//! through the [`IdentityStore`] and [`UserRepository`] traits, which an
//! application injects as `Arc<dyn ...>`.
//!
//! Every operation is async and fallible. Failures carry the store's own
//! reason as [`AppError::Store`](crate::types::AppError::Store) and are never
//! retried by the caller.
//!
//! # Example
//!
//! ```rust,ignore
//! use safevault::db::{IdentityStore, InMemoryIdentityStore, NewIdentity};
//!
//! let store = InMemoryIdentityStore::new();
//! let identity = store
//!     .create_user(NewIdentity::new("john_doe", "john@example.com"), "secret1")
//!     .await?;
//! store.create_role("admin").await?;
//! store.add_to_role(&identity, "admin").await?;
//! ```

use crate::types::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// An identity known to the identity store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Stable subject identifier
    pub id: String,
    pub username: String,
    pub email: String,
}

/// Data required to create a new identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIdentity {
    pub username: String,
    pub email: String,
}

impl NewIdentity {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
        }
    }
}

/// Row in the plain user directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i32,
    pub username: String,
    pub email: String,
}

/// Identity and role store consumed by authentication and administration.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    // ============== Identity Operations ==============

    /// Find an identity by username
    async fn find_by_name(&self, username: &str) -> Result<Option<Identity>>;

    /// Find an identity by email address
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>>;

    /// Create an identity with the given password
    async fn create_user(&self, identity: NewIdentity, password: &str) -> Result<Identity>;

    /// Check a password against the stored credential
    async fn check_password(&self, identity: &Identity, password: &str) -> Result<bool>;

    /// Delete an identity together with its role memberships
    async fn delete_user(&self, identity: &Identity) -> Result<()>;

    /// List all identities
    async fn list_users(&self) -> Result<Vec<Identity>>;

    // ============== Role Operations ==============

    /// Check whether a named role exists
    async fn role_exists(&self, role: &str) -> Result<bool>;

    /// Create a named role
    async fn create_role(&self, role: &str) -> Result<()>;

    /// Link an identity to an existing role
    async fn add_to_role(&self, identity: &Identity, role: &str) -> Result<()>;

    /// Unlink an identity from a role
    async fn remove_from_role(&self, identity: &Identity, role: &str) -> Result<()>;

    /// Get the roles held by an identity, in assignment order.
    /// Fails when the identity does not exist.
    async fn get_roles(&self, identity: &Identity) -> Result<Vec<String>>;
}

/// Plain user directory (username and email, no credentials).
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user row
    async fn save_user(&self, username: &str, email: &str) -> Result<()>;

    /// Get a user row by username
    async fn get_user(&self, username: &str) -> Result<Option<UserRecord>>;
}
