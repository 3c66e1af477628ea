//! Startup seeding of roles and the initial identities.

use crate::auth::authorize::{ADMIN_ROLE, USER_ROLE};
use crate::auth::roles::assign_role;
use crate::db::{IdentityStore, NewIdentity};
use crate::types::Result;
use crate::utils::toml_config::SeedUsers;
use tracing::info;

/// Ensure the `admin` and `user` roles exist, then create the seed admin and
/// seed user when no identity with their email exists yet.
pub async fn seed_identities(store: &dyn IdentityStore, seed: &SeedUsers) -> Result<()> {
    for role in [ADMIN_ROLE, USER_ROLE] {
        if !store.role_exists(role).await? {
            store.create_role(role).await?;
            info!(role, "seeded role");
        }
    }

    let accounts = [
        ("admin", &seed.admin_email, &seed.admin_password, ADMIN_ROLE),
        ("user", &seed.user_email, &seed.user_password, USER_ROLE),
    ];

    for (username, email, password, role) in accounts {
        if store.find_by_email(email).await?.is_some() {
            continue;
        }

        let identity = store
            .create_user(NewIdentity::new(username, email.as_str()), password)
            .await?;
        assign_role(store, &identity, role).await?;
        info!(username, role, "seeded identity");
    }

    Ok(())
}
