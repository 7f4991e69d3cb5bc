use std::sync::LazyLock;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use thiserror::Error;
use uuid::Uuid;

use careerbot_db::models::UserRow;
use careerbot_db::{Database, StoreError};

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0}")]
    Hash(String),
}

/// A user record as read back from the store. The hash never leaves
/// this module.
#[derive(Debug, Clone)]
pub struct StoredUser {
    pub id: Uuid,
    pub email: String,
    password_hash: String,
}

/// Verified against when the email is unknown, so both login failure
/// paths cost one Argon2 verification.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("careerbot-timing-equalizer").ok());

/// User persistence plus password hashing. All methods block; call them
/// from `spawn_blocking`.
#[derive(Clone)]
pub struct CredentialStore {
    db: Database,
}

impl CredentialStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Hash `raw_password` with Argon2id and persist a new user.
    pub fn create_user(&self, email: &str, raw_password: &str) -> Result<Uuid, CredentialError> {
        // Don't spend a hash on a store that can't take the write.
        self.db.ensure_connected()?;

        let password_hash = hash_password(raw_password)?;
        let id = Uuid::new_v4();
        self.db.create_user(&id.to_string(), email, &password_hash)?;
        Ok(id)
    }

    pub fn find_by_email(&self, email: &str) -> Result<Option<StoredUser>, CredentialError> {
        self.db
            .get_user_by_email(email)?
            .map(stored_user)
            .transpose()
    }

    pub fn find_by_id(&self, id: Uuid) -> Result<Option<StoredUser>, CredentialError> {
        self.db
            .get_user_by_id(&id.to_string())?
            .map(stored_user)
            .transpose()
    }

    /// Argon2 compares the derived hash in constant time.
    pub fn verify_password(&self, user: &StoredUser, raw_password: &str) -> bool {
        verify_hash(&user.password_hash, raw_password)
    }

    /// Look up `email` and check the password. `None` covers both an
    /// unknown email and a wrong password.
    pub fn authenticate(
        &self,
        email: &str,
        raw_password: &str,
    ) -> Result<Option<StoredUser>, CredentialError> {
        match self.find_by_email(email)? {
            Some(user) if self.verify_password(&user, raw_password) => Ok(Some(user)),
            Some(_) => Ok(None),
            None => {
                if let Some(dummy) = DUMMY_HASH.as_deref() {
                    verify_hash(dummy, raw_password);
                }
                Ok(None)
            }
        }
    }
}

fn stored_user(row: UserRow) -> Result<StoredUser, CredentialError> {
    let id = row
        .id
        .parse::<Uuid>()
        .map_err(|e| StoreError::Corrupt(format!("user id '{}': {}", row.id, e)))?;
    Ok(StoredUser {
        id,
        email: row.email,
        password_hash: row.password,
    })
}

fn hash_password(raw_password: &str) -> Result<String, CredentialError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(raw_password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CredentialError::Hash(e.to_string()))
}

fn verify_hash(password_hash: &str, raw_password: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(password_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(raw_password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> CredentialStore {
        CredentialStore::new(Database::open_in_memory().unwrap())
    }

    #[test]
    fn password_is_never_stored_in_plaintext() {
        let store = store();
        let id = store.create_user("a@x.com", "secret1").unwrap();

        let row = store.db.get_user_by_id(&id.to_string()).unwrap().unwrap();
        assert_ne!(row.password, "secret1");
        assert!(row.password.starts_with("$argon2id$"));
    }

    #[test]
    fn distinct_signups_get_distinct_ids() {
        let store = store();
        let a = store.create_user("a@x.com", "secret1").unwrap();
        let b = store.create_user("b@x.com", "secret1").unwrap();
        assert_ne!(a, b);

        // Same password, different salt.
        let ha = store.find_by_email("a@x.com").unwrap().unwrap().password_hash;
        let hb = store.find_by_email("b@x.com").unwrap().unwrap().password_hash;
        assert_ne!(ha, hb);
    }

    #[test]
    fn duplicate_email_keeps_original_password() {
        let store = store();
        let id = store.create_user("a@x.com", "secret1").unwrap();

        let err = store.create_user("a@x.com", "other").unwrap_err();
        assert!(matches!(err, CredentialError::Store(StoreError::DuplicateEmail)));

        let user = store.authenticate("a@x.com", "secret1").unwrap().unwrap();
        assert_eq!(user.id, id);
        assert!(store.authenticate("a@x.com", "other").unwrap().is_none());
    }

    #[test]
    fn authenticate_hides_which_part_was_wrong() {
        let store = store();
        store.create_user("a@x.com", "secret1").unwrap();

        assert!(store.authenticate("a@x.com", "wrong").unwrap().is_none());
        assert!(store.authenticate("nobody@x.com", "secret1").unwrap().is_none());
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify_hash("not-a-phc-string", "anything"));
    }

    #[test]
    fn unavailable_store_fails_before_hashing() {
        let store = CredentialStore::new(Database::new(None));
        let err = store.create_user("a@x.com", "secret1").unwrap_err();
        assert!(matches!(err, CredentialError::Store(StoreError::Unavailable(_))));
    }
}
