// src/users/file.rs

use crate::errors::ServerError;
use crate::users::store::{Role, UserDb, UserRecord, UserStore, ADMIN_USERNAME};
use std::fs;
use std::path::PathBuf;

/// Digest seeded for the default admin account (sha256 of the well-known
/// default password). Fixed so a fresh install always produces the same
/// file the legacy dashboard did.
pub const DEFAULT_ADMIN_PASSWORD_HASH: &str =
    "240be518fabd2724ddb6f04eeb1da5967448d7e831c08c8fa822809f74c720a9";

/// JSON flat-file backend. The whole map is read on every load and the
/// whole file rewritten on every save; nothing is patched in place. A
/// missing file loads as the seeded default admin and is only created on
/// the first save, like the legacy dashboard.
pub struct FileUserStore {
    path: PathBuf,
}

impl FileUserStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The map a missing file stands for.
    pub fn seeded() -> UserDb {
        let mut db = UserDb::default();
        db.0.insert(
            ADMIN_USERNAME.to_string(),
            UserRecord {
                name: "Administrator".to_string(),
                password_hash: DEFAULT_ADMIN_PASSWORD_HASH.to_string(),
                role: Role::Admin,
            },
        );
        db
    }
}

impl UserStore for FileUserStore {
    fn load(&self) -> Result<UserDb, ServerError> {
        if !self.path.exists() {
            log::info!("user store {} not found, seeding default admin", self.path.display());
            return Ok(Self::seeded());
        }
        let contents = fs::read_to_string(&self.path)
            .map_err(|e| ServerError::StoreError(format!("Failed to read user file: {e}")))?;
        serde_json::from_str(&contents)
            .map_err(|e| ServerError::StoreError(format!("Failed to parse user file: {e}")))
    }

    fn save(&mut self, users: &UserDb) -> Result<(), ServerError> {
        let json = serde_json::to_string_pretty(users)
            .map_err(|e| ServerError::StoreError(format!("Failed to serialize users: {e}")))?;
        fs::write(&self.path, json)
            .map_err(|e| ServerError::StoreError(format!("Failed to write user file: {e}")))
    }
}
