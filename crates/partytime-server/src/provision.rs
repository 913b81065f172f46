//! Startup provisioning of the admin identity.

use tracing::info;

use crate::auth::{CredentialError, CredentialStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provisioned {
    Created,
    /// An admin with that username exists and was left untouched.
    AlreadyExists,
}

/// Create the admin `username` unless it already exists. An existing
/// identity keeps its current password.
pub async fn provision_admin(
    credentials: &CredentialStore,
    username: &str,
    password: &str,
) -> Result<Provisioned, CredentialError> {
    if credentials.exists(username).await? {
        info!(username = %username, "Admin already provisioned");
        return Ok(Provisioned::AlreadyExists);
    }

    match credentials.create(username, password).await {
        Ok(admin) => {
            info!(username = %admin.username, id = %admin.id, "Admin provisioned");
            Ok(Provisioned::Created)
        }
        // Lost a race with another process creating the same admin.
        Err(CredentialError::Store(e)) if e.is_constraint_violation() => {
            Ok(Provisioned::AlreadyExists)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::sync::Mutex;

    use super::*;
    use partytime_store::Database;

    fn credentials() -> CredentialStore {
        let db = Database::open_in_memory().unwrap();
        CredentialStore::new(Arc::new(Mutex::new(db)))
    }

    #[tokio::test]
    async fn creates_then_leaves_existing_alone() {
        let creds = credentials();

        assert_eq!(
            provision_admin(&creds, "admin", "first-password").await.unwrap(),
            Provisioned::Created
        );
        assert_eq!(
            provision_admin(&creds, "admin", "second-password").await.unwrap(),
            Provisioned::AlreadyExists
        );

        creds.verify("admin", "first-password").await.unwrap();
        assert!(creds.verify("admin", "second-password").await.is_err());
    }
}
