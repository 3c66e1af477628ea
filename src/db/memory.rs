//! In-memory identity store and user directory
//!
//! Process-local implementations of [`IdentityStore`] and [`UserRepository`].
//! Each operation takes a single lock, so a mutation is either fully applied
//! or not applied at all.
//!
//! Passwords are hashed with Argon2id and checked against the identity
//! password policy before an identity is created.

use super::traits::{Identity, IdentityStore, NewIdentity, UserRecord, UserRepository};
use crate::types::{AppError, Result};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;
use uuid::Uuid;

// ============= Password Policy =============

/// Password rules enforced when an identity is created.
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub require_digit: bool,
    pub require_lowercase: bool,
    pub require_uppercase: bool,
    pub require_non_alphanumeric: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 6,
            require_digit: true,
            require_lowercase: true,
            require_uppercase: false,
            require_non_alphanumeric: false,
        }
    }
}

impl PasswordPolicy {
    /// Returns every rule the password violates (empty when it passes).
    pub fn violations(&self, password: &str) -> Vec<String> {
        let mut errors = Vec::new();

        if password.chars().count() < self.min_length {
            errors.push(format!(
                "Passwords must be at least {} characters.",
                self.min_length
            ));
        }
        if self.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            errors.push("Passwords must have at least one digit ('0'-'9').".to_string());
        }
        if self.require_lowercase && !password.chars().any(|c| c.is_ascii_lowercase()) {
            errors.push("Passwords must have at least one lowercase ('a'-'z').".to_string());
        }
        if self.require_uppercase && !password.chars().any(|c| c.is_ascii_uppercase()) {
            errors.push("Passwords must have at least one uppercase ('A'-'Z').".to_string());
        }
        if self.require_non_alphanumeric && password.chars().all(|c| c.is_ascii_alphanumeric()) {
            errors.push("Passwords must have at least one non alphanumeric character.".to_string());
        }

        errors
    }
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

// ============= Identity Store =============

struct StoredIdentity {
    identity: Identity,
    password_hash: String,
    roles: Vec<String>,
}

#[derive(Default)]
struct IdentityTables {
    identities: HashMap<String, StoredIdentity>,
    roles: BTreeSet<String>,
}

impl IdentityTables {
    fn find(&self, predicate: impl Fn(&Identity) -> bool) -> Option<Identity> {
        self.identities
            .values()
            .map(|stored| &stored.identity)
            .find(|&identity| predicate(identity))
            .cloned()
    }

    fn stored_mut(&mut self, identity: &Identity) -> Result<&mut StoredIdentity> {
        self.identities
            .get_mut(&identity.id)
            .ok_or_else(|| AppError::Store(format!("User '{}' does not exist.", identity.username)))
    }
}

/// Identity store held entirely in process memory.
///
/// Username and email lookups are case-insensitive; role names are exact.
pub struct InMemoryIdentityStore {
    tables: RwLock<IdentityTables>,
    policy: PasswordPolicy,
}

impl Default for InMemoryIdentityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::with_policy(PasswordPolicy::default())
    }

    pub fn with_policy(policy: PasswordPolicy) -> Self {
        Self {
            tables: RwLock::new(IdentityTables::default()),
            policy,
        }
    }
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn find_by_name(&self, username: &str) -> Result<Option<Identity>> {
        Ok(self
            .tables
            .read()
            .find(|identity| identity.username.eq_ignore_ascii_case(username)))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>> {
        Ok(self
            .tables
            .read()
            .find(|identity| identity.email.eq_ignore_ascii_case(email)))
    }

    async fn create_user(&self, new: NewIdentity, password: &str) -> Result<Identity> {
        let violations = self.policy.violations(password);
        if !violations.is_empty() {
            return Err(AppError::Store(violations.join(", ")));
        }

        // Hash outside the lock; Argon2 is deliberately slow.
        let password_hash = hash_password(password)?;

        let mut tables = self.tables.write();

        let mut conflicts = Vec::new();
        if tables
            .find(|identity| identity.username.eq_ignore_ascii_case(&new.username))
            .is_some()
        {
            conflicts.push(format!("Username '{}' is already taken.", new.username));
        }
        if tables
            .find(|identity| identity.email.eq_ignore_ascii_case(&new.email))
            .is_some()
        {
            conflicts.push(format!("Email '{}' is already taken.", new.email));
        }
        if !conflicts.is_empty() {
            return Err(AppError::Store(conflicts.join(", ")));
        }

        let identity = Identity {
            id: Uuid::new_v4().to_string(),
            username: new.username,
            email: new.email,
        };

        tables.identities.insert(
            identity.id.clone(),
            StoredIdentity {
                identity: identity.clone(),
                password_hash,
                roles: Vec::new(),
            },
        );

        debug!(user_id = %identity.id, "identity created");
        Ok(identity)
    }

    async fn check_password(&self, identity: &Identity, password: &str) -> Result<bool> {
        let hash = match self.tables.read().identities.get(&identity.id) {
            Some(stored) => stored.password_hash.clone(),
            None => return Ok(false),
        };

        verify_password(password, &hash)
    }

    async fn delete_user(&self, identity: &Identity) -> Result<()> {
        let mut tables = self.tables.write();
        match tables.identities.remove(&identity.id) {
            Some(_) => {
                debug!(user_id = %identity.id, "identity deleted");
                Ok(())
            }
            None => Err(AppError::Store(format!(
                "User '{}' does not exist.",
                identity.username
            ))),
        }
    }

    async fn list_users(&self) -> Result<Vec<Identity>> {
        let mut users: Vec<Identity> = self
            .tables
            .read()
            .identities
            .values()
            .map(|stored| stored.identity.clone())
            .collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    async fn role_exists(&self, role: &str) -> Result<bool> {
        Ok(self.tables.read().roles.contains(role))
    }

    async fn create_role(&self, role: &str) -> Result<()> {
        if role.trim().is_empty() {
            return Err(AppError::Store("Role name must not be empty.".to_string()));
        }

        let mut tables = self.tables.write();
        if !tables.roles.insert(role.to_string()) {
            return Err(AppError::Store(format!("Role name '{}' is already taken.", role)));
        }
        Ok(())
    }

    async fn add_to_role(&self, identity: &Identity, role: &str) -> Result<()> {
        let mut tables = self.tables.write();
        if !tables.roles.contains(role) {
            return Err(AppError::Store(format!("Role '{}' does not exist.", role)));
        }

        let stored = tables.stored_mut(identity)?;
        if stored.roles.iter().any(|r| r == role) {
            return Err(AppError::Store(format!(
                "User already in role '{}'.",
                role
            )));
        }
        stored.roles.push(role.to_string());
        Ok(())
    }

    async fn remove_from_role(&self, identity: &Identity, role: &str) -> Result<()> {
        let mut tables = self.tables.write();
        let stored = tables.stored_mut(identity)?;

        let before = stored.roles.len();
        stored.roles.retain(|r| r != role);
        if stored.roles.len() == before {
            return Err(AppError::Store(format!("User is not in role '{}'.", role)));
        }
        Ok(())
    }

    async fn get_roles(&self, identity: &Identity) -> Result<Vec<String>> {
        self.tables
            .read()
            .identities
            .get(&identity.id)
            .map(|stored| stored.roles.clone())
            .ok_or_else(|| AppError::Store(format!("User '{}' does not exist.", identity.username)))
    }
}

// ============= User Directory =============

#[derive(Default)]
struct UserRows {
    next_id: i32,
    rows: Vec<UserRecord>,
}

/// User directory held in process memory, with sequential ids.
#[derive(Default)]
pub struct InMemoryUserRepository {
    rows: RwLock<UserRows>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn save_user(&self, username: &str, email: &str) -> Result<()> {
        let mut table = self.rows.write();
        if table.rows.iter().any(|row| row.username == username) {
            return Err(AppError::Store(format!(
                "Username '{}' is already taken.",
                username
            )));
        }

        table.next_id += 1;
        let id = table.next_id;
        table.rows.push(UserRecord {
            id,
            username: username.to_string(),
            email: email.to_string(),
        });
        Ok(())
    }

    async fn get_user(&self, username: &str) -> Result<Option<UserRecord>> {
        Ok(self
            .rows
            .read()
            .rows
            .iter()
            .find(|row| row.username == username)
            .cloned())
    }
}
