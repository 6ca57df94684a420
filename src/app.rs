// src/app.rs

use crate::auth::password::{PasswordHasher, Sha256PasswordHasher};
use crate::auth::session::Sessions;
use crate::errors::ServerError;
use crate::users::UserStore;
use std::sync::{Arc, Mutex};

/// Shared server state; one clone per worker closure. The user store sits
/// behind a mutex so register/remove rewrite the file one at a time.
#[derive(Clone)]
pub struct AppState {
    users: Arc<Mutex<Box<dyn UserStore>>>,
    pub sessions: Arc<Sessions>,
    pub hasher: Arc<dyn PasswordHasher>,
}

impl AppState {
    pub fn new(store: impl UserStore + 'static) -> Self {
        AppState {
            users: Arc::new(Mutex::new(Box::new(store))),
            sessions: Arc::new(Sessions::new()),
            hasher: Arc::new(Sha256PasswordHasher),
        }
    }

    /// Run a closure against the locked user store. The error type is
    /// generic so store calls returning RegisterError/RemoveError pass
    /// through unchanged.
    pub fn with_users<F, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn UserStore) -> Result<T, E>,
        E: From<ServerError>,
    {
        let mut store = self
            .users
            .lock()
            .map_err(|_| E::from(ServerError::InternalError))?;
        f(store.as_mut())
    }
}
