// src/users/store.rs
//
// The credential store: a username -> record map, loaded whole and written
// whole. Backends only implement load/save; add/remove are provided on the
// trait so every backend gets the same wholesale-rewrite semantics and the
// same rule checks. Concurrent writers race and the last writer wins; an
// accepted limitation of the flat file.

use crate::auth::password::PasswordHasher;
use crate::errors::ServerError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// The one account that can never be removed.
pub const ADMIN_USERNAME: &str = "admin";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::User => "User",
        }
    }

    /// Parses the role select of the admin form; anything unknown is a
    /// plain user.
    pub fn parse(value: &str) -> Role {
        if value.eq_ignore_ascii_case("admin") {
            Role::Admin
        } else {
            Role::User
        }
    }
}

/// Stored per user. The digest is hex-encoded SHA-256 of the plaintext
/// password, unsalted, for parity with the legacy user file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub name: String,
    pub password_hash: String,
    pub role: Role,
}

/// A registration request. Carries the plaintext so the empty-password rule
/// can run before hashing; the plaintext never gets stored.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub name: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Error)]
pub enum RegisterError {
    #[error("Username already exists!")]
    DuplicateUsername,
    #[error("Username and password are required!")]
    MissingCredentials,
    #[error(transparent)]
    Store(#[from] ServerError),
}

#[derive(Debug, Error)]
pub enum RemoveError {
    #[error("User does not exist!")]
    UnknownUser,
    #[error("Cannot delete the admin user!")]
    AdminAccount,
    #[error("Cannot delete your own account while logged in!")]
    OwnAccount,
    #[error(transparent)]
    Store(#[from] ServerError),
}

/// The full user map. Serializes to the flat JSON object the legacy
/// dashboard wrote: `{"alice": {"name": ..., "password_hash": ..., "role":
/// ...}}`. BTreeMap keeps listings deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserDb(pub BTreeMap<String, UserRecord>);

impl UserDb {
    pub fn get(&self, username: &str) -> Option<&UserRecord> {
        self.0.get(username)
    }

    pub fn contains(&self, username: &str) -> bool {
        self.0.contains_key(username)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &UserRecord)> {
        self.0.iter()
    }

    /// Inserts a new account. Duplicate usernames are checked before the
    /// empty-credential rule, matching the legacy order of messages.
    pub fn register(&mut self, user: NewUser, hasher: &dyn PasswordHasher) -> Result<(), RegisterError> {
        if self.contains(&user.username) {
            return Err(RegisterError::DuplicateUsername);
        }
        if user.username.is_empty() || user.password.is_empty() {
            return Err(RegisterError::MissingCredentials);
        }
        self.0.insert(
            user.username,
            UserRecord {
                name: user.name,
                password_hash: hasher.hash(&user.password),
                role: user.role,
            },
        );
        Ok(())
    }

    /// Removes an account, refusing the fixed admin and the account that is
    /// currently signed in.
    pub fn remove(&mut self, username: &str, current_user: &str) -> Result<(), RemoveError> {
        if !self.contains(username) {
            return Err(RemoveError::UnknownUser);
        }
        if username == ADMIN_USERNAME {
            return Err(RemoveError::AdminAccount);
        }
        if username == current_user {
            return Err(RemoveError::OwnAccount);
        }
        self.0.remove(username);
        Ok(())
    }

    /// Usernames the given account is allowed to remove.
    pub fn removable_by(&self, current_user: &str) -> Vec<String> {
        self.0
            .keys()
            .filter(|u| u.as_str() != ADMIN_USERNAME && u.as_str() != current_user)
            .cloned()
            .collect()
    }
}

/// Swappable credential repository. `load` returns the whole map, `save`
/// rewrites it wholesale; `add` and `remove` ride on those two.
pub trait UserStore: Send {
    fn load(&self) -> Result<UserDb, ServerError>;
    fn save(&mut self, users: &UserDb) -> Result<(), ServerError>;

    fn add(&mut self, user: NewUser, hasher: &dyn PasswordHasher) -> Result<(), RegisterError> {
        let mut users = self.load()?;
        users.register(user, hasher)?;
        self.save(&users)?;
        Ok(())
    }

    fn remove(&mut self, username: &str, current_user: &str) -> Result<(), RemoveError> {
        let mut users = self.load()?;
        users.remove(username, current_user)?;
        self.save(&users)?;
        Ok(())
    }
}
