//! Durable username to password mapping.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::data::loader::{load_json, save_json_atomic};
use crate::error::{QuizError, Result};

/// The distinguished administrator account.
pub const ADMIN_USERNAME: &str = "admin";
const ADMIN_BOOTSTRAP_PASSWORD: &str = "admin";

/// Credentials persisted as a JSON object. Passwords are stored as given.
#[derive(Debug)]
pub struct CredentialStore {
    path: PathBuf,
    users: BTreeMap<String, String>,
}

impl CredentialStore {
    /// Open the store at `path`, creating it with the admin account if absent.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let users = match load_json::<BTreeMap<String, String>, _>(&path)? {
            Some(users) => users,
            None => {
                let mut users = BTreeMap::new();
                users.insert(
                    ADMIN_USERNAME.to_string(),
                    ADMIN_BOOTSTRAP_PASSWORD.to_string(),
                );
                save_json_atomic(&path, &users)?;
                info!(path = %path.display(), "created credential store");
                users
            }
        };

        Ok(Self { path, users })
    }

    pub fn register(&mut self, username: &str, password: &str) -> Result<()> {
        if username.is_empty() || password.is_empty() {
            return Err(QuizError::InvalidInput(
                "enter username and password".into(),
            ));
        }
        if username.chars().any(|c| c.is_control() || c == '|') {
            return Err(QuizError::InvalidInput(
                "username must not contain '|' or control characters".into(),
            ));
        }
        if self.users.contains_key(username) {
            return Err(QuizError::DuplicateUser(username.to_string()));
        }

        let mut next = self.users.clone();
        next.insert(username.to_string(), password.to_string());
        save_json_atomic(&self.path, &next)?;
        self.users = next;

        info!(username, "user registered");
        Ok(())
    }

    pub fn verify(&self, username: &str, password: &str) -> bool {
        self.users
            .get(username)
            .is_some_and(|stored| stored == password)
    }

    pub fn contains(&self, username: &str) -> bool {
        self.users.contains_key(username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_admin() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::open(dir.path().join("users.json")).unwrap();
        assert!(store.verify("admin", "admin"));
        assert!(!store.verify("admin", "root"));
    }

    #[test]
    fn test_register_and_verify() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        let mut store = CredentialStore::open(&path).unwrap();

        store.register("bob", "x").unwrap();
        assert!(store.verify("bob", "x"));
        assert!(!store.verify("bob", "y"));
        assert!(!store.verify("carol", "x"));
        assert!(matches!(
            store.register("bob", "z"),
            Err(QuizError::DuplicateUser(_))
        ));
        assert!(matches!(
            store.register("admin", "z"),
            Err(QuizError::DuplicateUser(_))
        ));

        let reopened = CredentialStore::open(&path).unwrap();
        assert!(reopened.verify("bob", "x"));
    }

    #[test]
    fn test_register_rejects_empty_fields() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CredentialStore::open(dir.path().join("users.json")).unwrap();
        assert!(matches!(
            store.register("", "x"),
            Err(QuizError::InvalidInput(_))
        ));
        assert!(matches!(
            store.register("eve", ""),
            Err(QuizError::InvalidInput(_))
        ));
        assert!(!store.contains("eve"));
        assert!(matches!(
            store.register("eve | admin", "x"),
            Err(QuizError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_failed_write_keeps_users() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CredentialStore::open(dir.path().join("users.json")).unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        store.path = blocker.join("users.json");

        let err = store.register("bob", "x").unwrap_err();
        assert!(matches!(err, QuizError::Io { .. }));
        assert!(!store.contains("bob"));
        assert!(!store.verify("bob", "x"));
        assert!(store.verify("admin", "admin"));
    }
}
