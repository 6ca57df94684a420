// src/users/memory.rs

use crate::errors::ServerError;
use crate::users::file::FileUserStore;
use crate::users::store::{UserDb, UserStore};

/// In-memory backend, used by tests so the rule checks never touch disk.
/// Starts from the same seeded map a missing file would.
pub struct MemoryUserStore {
    users: UserDb,
}

impl MemoryUserStore {
    pub fn seeded() -> Self {
        Self {
            users: FileUserStore::seeded(),
        }
    }
}

impl UserStore for MemoryUserStore {
    fn load(&self) -> Result<UserDb, ServerError> {
        Ok(self.users.clone())
    }

    fn save(&mut self, users: &UserDb) -> Result<(), ServerError> {
        self.users = users.clone();
        Ok(())
    }
}
