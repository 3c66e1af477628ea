//! Administrative role and identity mutations.
//!
//! Every store failure surfaces once as [`AppError::Store`] with the store's
//! reason; nothing here retries or reports a failed mutation as success.

use crate::db::{Identity, IdentityStore};
use crate::types::{AppError, Result};
use tracing::info;

/// Look up an identity by username, failing with `NotFound`.
pub async fn find_identity(store: &dyn IdentityStore, username: &str) -> Result<Identity> {
    store
        .find_by_name(username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User '{}' not found", username)))
}

/// Assign `role`, creating it first when it does not exist yet.
///
/// Assigning a role the identity already holds succeeds without adding a
/// second membership. A failed create or add is re-checked against the
/// store, so a concurrent assignment of the same role still reports success.
pub async fn assign_role(store: &dyn IdentityStore, identity: &Identity, role: &str) -> Result<()> {
    check_role_name(role)?;

    if !store.role_exists(role).await? {
        match store.create_role(role).await {
            Ok(()) => info!(role, "role created"),
            Err(e) => {
                if !store.role_exists(role).await? {
                    return Err(e);
                }
            }
        }
    }

    if holds_role(store, identity, role).await? {
        return Ok(());
    }

    if let Err(e) = store.add_to_role(identity, role).await {
        if holds_role(store, identity, role).await? {
            return Ok(());
        }
        return Err(e);
    }

    info!(user_id = %identity.id, role, "role assigned");
    Ok(())
}

/// Remove `role`. Removing a role the identity does not hold is a no-op.
pub async fn remove_role(store: &dyn IdentityStore, identity: &Identity, role: &str) -> Result<()> {
    check_role_name(role)?;

    if !holds_role(store, identity, role).await? {
        return Ok(());
    }

    if let Err(e) = store.remove_from_role(identity, role).await {
        if !holds_role(store, identity, role).await? {
            return Ok(());
        }
        return Err(e);
    }

    info!(user_id = %identity.id, role, "role removed");
    Ok(())
}

/// Delete an identity and its role memberships.
pub async fn delete_identity(store: &dyn IdentityStore, identity: &Identity) -> Result<()> {
    store.delete_user(identity).await?;
    info!(user_id = %identity.id, "identity deleted");
    Ok(())
}

async fn holds_role(store: &dyn IdentityStore, identity: &Identity, role: &str) -> Result<bool> {
    Ok(store.get_roles(identity).await?.iter().any(|r| r == role))
}

fn check_role_name(role: &str) -> Result<()> {
    if role.trim().is_empty() {
        return Err(AppError::InvalidInput("Role name must not be empty".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{InMemoryIdentityStore, NewIdentity};
    use async_trait::async_trait;

    /// In-memory store that yields to the scheduler before every call, so
    /// concurrent role operations interleave between their store calls.
    struct YieldingStore(InMemoryIdentityStore);

    #[async_trait]
    impl IdentityStore for YieldingStore {
        async fn find_by_name(&self, username: &str) -> Result<Option<Identity>> {
            tokio::task::yield_now().await;
            self.0.find_by_name(username).await
        }
        async fn find_by_email(&self, email: &str) -> Result<Option<Identity>> {
            tokio::task::yield_now().await;
            self.0.find_by_email(email).await
        }
        async fn create_user(&self, identity: NewIdentity, password: &str) -> Result<Identity> {
            tokio::task::yield_now().await;
            self.0.create_user(identity, password).await
        }
        async fn check_password(&self, identity: &Identity, password: &str) -> Result<bool> {
            tokio::task::yield_now().await;
            self.0.check_password(identity, password).await
        }
        async fn delete_user(&self, identity: &Identity) -> Result<()> {
            tokio::task::yield_now().await;
            self.0.delete_user(identity).await
        }
        async fn list_users(&self) -> Result<Vec<Identity>> {
            tokio::task::yield_now().await;
            self.0.list_users().await
        }
        async fn role_exists(&self, role: &str) -> Result<bool> {
            tokio::task::yield_now().await;
            self.0.role_exists(role).await
        }
        async fn create_role(&self, role: &str) -> Result<()> {
            tokio::task::yield_now().await;
            self.0.create_role(role).await
        }
        async fn add_to_role(&self, identity: &Identity, role: &str) -> Result<()> {
            tokio::task::yield_now().await;
            self.0.add_to_role(identity, role).await
        }
        async fn remove_from_role(&self, identity: &Identity, role: &str) -> Result<()> {
            tokio::task::yield_now().await;
            self.0.remove_from_role(identity, role).await
        }
        async fn get_roles(&self, identity: &Identity) -> Result<Vec<String>> {
            tokio::task::yield_now().await;
            self.0.get_roles(identity).await
        }
    }

    async fn yielding_setup() -> (YieldingStore, Identity) {
        let (store, identity) = setup().await;
        (YieldingStore(store), identity)
    }

    async fn setup() -> (InMemoryIdentityStore, Identity) {
        let store = InMemoryIdentityStore::new();
        let identity = store
            .create_user(NewIdentity::new("john_doe", "john@example.com"), "secret1")
            .await
            .expect("should create user");
        (store, identity)
    }

    #[tokio::test]
    async fn test_assign_creates_missing_role() {
        let (store, identity) = setup().await;
        assert!(!store.role_exists("auditor").await.expect("exists"));

        assign_role(&store, &identity, "auditor").await.expect("assign");

        assert!(store.role_exists("auditor").await.expect("exists"));
        assert_eq!(
            store.get_roles(&identity).await.expect("roles"),
            vec!["auditor".to_string()]
        );
    }

    #[tokio::test]
    async fn test_assign_is_idempotent() {
        let (store, identity) = setup().await;

        assign_role(&store, &identity, "admin").await.expect("first assign");
        assign_role(&store, &identity, "admin").await.expect("second assign");

        assert_eq!(
            store.get_roles(&identity).await.expect("roles"),
            vec!["admin".to_string()]
        );
    }

    #[tokio::test]
    async fn test_remove_role() {
        let (store, identity) = setup().await;
        assign_role(&store, &identity, "admin").await.expect("assign");

        remove_role(&store, &identity, "admin").await.expect("remove");
        assert!(store.get_roles(&identity).await.expect("roles").is_empty());
    }

    #[tokio::test]
    async fn test_remove_unassigned_role_is_noop() {
        let (store, identity) = setup().await;

        remove_role(&store, &identity, "admin").await.expect("no-op remove");
        remove_role(&store, &identity, "never-created").await.expect("no-op remove");
    }

    #[tokio::test]
    async fn test_empty_role_name_rejected() {
        let (store, identity) = setup().await;
        assert!(matches!(
            assign_role(&store, &identity, " ").await,
            Err(AppError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_find_and_delete_identity() {
        let (store, identity) = setup().await;

        let found = find_identity(&store, "john_doe").await.expect("find");
        assert_eq!(found, identity);

        delete_identity(&store, &identity).await.expect("delete");
        assert!(matches!(
            find_identity(&store, "john_doe").await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            delete_identity(&store, &identity).await,
            Err(AppError::Store(_))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_assign_of_new_role_both_succeed() {
        let (store, identity) = yielding_setup().await;

        let (first, second) = tokio::join!(
            assign_role(&store, &identity, "auditor"),
            assign_role(&store, &identity, "auditor"),
        );

        first.expect("first assign");
        second.expect("second assign");
        assert_eq!(
            store.get_roles(&identity).await.expect("roles"),
            vec!["auditor".to_string()]
        );
    }

    #[tokio::test]
    async fn test_concurrent_assign_of_existing_role_both_succeed() {
        let (store, identity) = yielding_setup().await;
        store.create_role("admin").await.expect("create role");

        let (first, second) = tokio::join!(
            assign_role(&store, &identity, "admin"),
            assign_role(&store, &identity, "admin"),
        );

        first.expect("first assign");
        second.expect("second assign");
        assert_eq!(
            store.get_roles(&identity).await.expect("roles"),
            vec!["admin".to_string()]
        );
    }

    #[tokio::test]
    async fn test_concurrent_remove_both_succeed() {
        let (store, identity) = yielding_setup().await;
        assign_role(&store, &identity, "admin").await.expect("assign");

        let (first, second) = tokio::join!(
            remove_role(&store, &identity, "admin"),
            remove_role(&store, &identity, "admin"),
        );

        first.expect("first remove");
        second.expect("second remove");
        assert!(store.get_roles(&identity).await.expect("roles").is_empty());
    }

    #[tokio::test]
    async fn test_role_changes_on_deleted_identity_fail() {
        let (store, identity) = setup().await;
        assign_role(&store, &identity, "admin").await.expect("assign");
        delete_identity(&store, &identity).await.expect("delete");

        assert!(matches!(
            remove_role(&store, &identity, "admin").await,
            Err(AppError::Store(_))
        ));
        assert!(matches!(
            assign_role(&store, &identity, "admin").await,
            Err(AppError::Store(_))
        ));
    }
}
