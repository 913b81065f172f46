//! Admin credential lookup and verification.
//!
//! Hashing is CPU-bound, so it always runs on the blocking pool and the
//! database lock is released before it starts.

use std::sync::{Arc, OnceLock};

use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use partytime_store::{Admin, Database, StoreError};

use super::password::{hash_password, verify_password};

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("admin not found")]
    NotFound,

    #[error("password does not match")]
    Mismatch,

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Verifies and updates admin credentials held in the catalog database.
#[derive(Clone)]
pub struct CredentialStore {
    db: Arc<Mutex<Database>>,
}

impl CredentialStore {
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }

    /// Check a username/password pair. Unknown usernames still pay for one
    /// hash verification so both failures take about as long.
    pub async fn verify(&self, username: &str, password: &str) -> Result<Admin, CredentialError> {
        let found = {
            let db = self.db.lock().await;
            match db.get_admin_by_username(username) {
                Ok(admin) => Some(admin),
                Err(StoreError::NotFound) => None,
                Err(e) => return Err(e.into()),
            }
        };

        match found {
            Some(admin) => {
                check(password, admin.password_hash.clone()).await?;
                Ok(admin)
            }
            None => {
                if let Some(dummy) = dummy_hash() {
                    let _ = check(password, dummy.to_string()).await;
                }
                Err(CredentialError::NotFound)
            }
        }
    }

    /// Check the password of an admin identified by id.
    pub async fn verify_id(&self, id: Uuid, password: &str) -> Result<Admin, CredentialError> {
        let admin = {
            let db = self.db.lock().await;
            db.get_admin(id).map_err(|e| match e {
                StoreError::NotFound => CredentialError::NotFound,
                other => other.into(),
            })?
        };

        check(password, admin.password_hash.clone()).await?;
        Ok(admin)
    }

    /// `true` if an admin with this exact username exists.
    pub async fn exists(&self, username: &str) -> Result<bool, CredentialError> {
        let db = self.db.lock().await;
        match db.get_admin_by_username(username) {
            Ok(_) => Ok(true),
            Err(StoreError::NotFound) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Hash `new_password` and store it for the given admin.
    pub async fn update_password(
        &self,
        id: Uuid,
        new_password: &str,
    ) -> Result<(), CredentialError> {
        let hash = hash(new_password).await?;

        let db = self.db.lock().await;
        if db.update_admin_password_hash(id, &hash)? {
            Ok(())
        } else {
            Err(CredentialError::NotFound)
        }
    }

    /// Create a new admin with a freshly hashed password.
    pub async fn create(&self, username: &str, password: &str) -> Result<Admin, CredentialError> {
        let admin = Admin {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: hash(password).await?,
            created_at: Utc::now(),
        };

        let db = self.db.lock().await;
        db.create_admin(&admin)?;
        Ok(admin)
    }
}

fn join_error(e: tokio::task::JoinError) -> CredentialError {
    CredentialError::Hash(e.to_string())
}

async fn hash(password: &str) -> Result<String, CredentialError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(join_error)?
}

async fn check(password: &str, stored_hash: String) -> Result<(), CredentialError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .map_err(join_error)?
}

fn dummy_hash() -> Option<&'static str> {
    static DUMMY: OnceLock<Option<String>> = OnceLock::new();
    DUMMY
        .get_or_init(|| hash_password("partytime-timing-equalizer").ok())
        .as_deref()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> CredentialStore {
        let db = Database::open_in_memory().unwrap();
        CredentialStore::new(Arc::new(Mutex::new(db)))
    }

    #[tokio::test]
    async fn create_then_verify() {
        let creds = store();
        let admin = creds.create("admin", "s3cret-pass").await.unwrap();
        assert_ne!(admin.password_hash, "s3cret-pass");

        let verified = creds.verify("admin", "s3cret-pass").await.unwrap();
        assert_eq!(verified.id, admin.id);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user() {
        let creds = store();
        creds.create("admin", "s3cret-pass").await.unwrap();

        assert!(matches!(
            creds.verify("admin", "nope").await,
            Err(CredentialError::Mismatch)
        ));
        assert!(matches!(
            creds.verify("ghost", "s3cret-pass").await,
            Err(CredentialError::NotFound)
        ));
        // Usernames are case-sensitive.
        assert!(matches!(
            creds.verify("Admin", "s3cret-pass").await,
            Err(CredentialError::NotFound)
        ));
    }

    #[tokio::test]
    async fn password_change_replaces_hash() {
        let creds = store();
        let admin = creds.create("admin", "old-password").await.unwrap();

        creds.verify_id(admin.id, "old-password").await.unwrap();
        creds.update_password(admin.id, "new-password").await.unwrap();

        assert!(matches!(
            creds.verify("admin", "old-password").await,
            Err(CredentialError::Mismatch)
        ));
        creds.verify("admin", "new-password").await.unwrap();
    }

    #[tokio::test]
    async fn update_for_missing_admin() {
        let creds = store();
        assert!(matches!(
            creds.update_password(Uuid::new_v4(), "whatever").await,
            Err(CredentialError::NotFound)
        ));
        assert!(matches!(
            creds.verify_id(Uuid::new_v4(), "whatever").await,
            Err(CredentialError::NotFound)
        ));
    }
}
