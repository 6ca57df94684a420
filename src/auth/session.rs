// src/auth/session.rs
use crate::auth::state::AuthState;
use crate::domain::Dataset;
use crate::errors::ServerError;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const SESSION_COOKIE: &str = "session";
pub const SESSION_ID_BYTES: usize = 32;
/// Sessions expire this many days after creation.
const SESSION_TTL_DAYS: i64 = 7;

/// Everything the server remembers about one browser session: the auth
/// state, the most recently uploaded workbook, and when the session stops
/// being valid. Held in memory only, so sessions (and their lockout
/// counters) vanish on restart.
#[derive(Clone)]
struct SessionData {
    auth: AuthState,
    dataset: Option<Arc<Dataset>>,
    expires_at: DateTime<Utc>,
}

impl SessionData {
    fn fresh(expires_at: DateTime<Utc>) -> Self {
        SessionData {
            auth: AuthState::anonymous(),
            dataset: None,
            expires_at,
        }
    }

    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// In-memory session table keyed by the cookie value. Entries expire a
/// fixed time after creation: an expired entry counts as missing on every
/// lookup and is dropped from the table on the next [`Sessions::create`].
pub struct Sessions {
    inner: Mutex<HashMap<String, SessionData>>,
}

impl Sessions {
    pub fn new() -> Self {
        Sessions {
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Register a new anonymous session and hand back its id. Expired
    /// entries are swept here, so the table only ever holds ids seen
    /// within the TTL window.
    pub fn create(&self) -> Result<String, ServerError> {
        let id = new_session_id();
        let now = Utc::now();
        self.with_map(|map| {
            map.retain(|_, session| !session.is_expired(now));
            map.insert(
                id.clone(),
                SessionData::fresh(now + Duration::days(SESSION_TTL_DAYS)),
            );
            Ok(())
        })?;
        Ok(id)
    }

    /// Whether the id names a session that has not expired yet.
    pub fn exists(&self, id: &str) -> Result<bool, ServerError> {
        let now = Utc::now();
        self.with_map(|map| Ok(Self::live(map, id, now).is_some()))
    }

    pub fn auth(&self, id: &str) -> Result<Option<AuthState>, ServerError> {
        let now = Utc::now();
        self.with_map(|map| Ok(Self::live(map, id, now).map(|s| s.auth.clone())))
    }

    pub fn set_auth(&self, id: &str, auth: AuthState) -> Result<(), ServerError> {
        let now = Utc::now();
        self.with_map(|map| {
            if let Some(session) = Self::live_mut(map, id, now) {
                session.auth = auth;
            }
            Ok(())
        })
    }

    pub fn dataset(&self, id: &str) -> Result<Option<Arc<Dataset>>, ServerError> {
        let now = Utc::now();
        self.with_map(|map| Ok(Self::live(map, id, now).and_then(|s| s.dataset.clone())))
    }

    pub fn set_dataset(&self, id: &str, dataset: Arc<Dataset>) -> Result<(), ServerError> {
        let now = Utc::now();
        self.with_map(|map| {
            if let Some(session) = Self::live_mut(map, id, now) {
                session.dataset = Some(dataset);
            }
            Ok(())
        })
    }

    /// Wipe a session back to its initial state (logout path). Drops the
    /// uploaded dataset along with the signed-in user; the expiry window
    /// stays where it was.
    pub fn reset(&self, id: &str) -> Result<(), ServerError> {
        let now = Utc::now();
        self.with_map(|map| {
            if let Some(session) = Self::live_mut(map, id, now) {
                *session = SessionData::fresh(session.expires_at);
            }
            Ok(())
        })
    }

    // An entry past its expiry is treated as missing everywhere.
    fn live<'m>(
        map: &'m HashMap<String, SessionData>,
        id: &str,
        now: DateTime<Utc>,
    ) -> Option<&'m SessionData> {
        map.get(id).filter(|session| !session.is_expired(now))
    }

    fn live_mut<'m>(
        map: &'m mut HashMap<String, SessionData>,
        id: &str,
        now: DateTime<Utc>,
    ) -> Option<&'m mut SessionData> {
        map.get_mut(id).filter(|session| !session.is_expired(now))
    }

    fn with_map<F, T>(&self, f: F) -> Result<T, ServerError>
    where
        F: FnOnce(&mut HashMap<String, SessionData>) -> Result<T, ServerError>,
    {
        let mut map = self.inner.lock().map_err(|_| ServerError::InternalError)?;
        f(&mut map)
    }
}

impl Default for Sessions {
    fn default() -> Self {
        Sessions::new()
    }
}

/// Generate a session id with the OS RNG.
/// - URL-safe Base64, no padding: 32 bytes -> ~43 char id.
pub fn new_session_id() -> String {
    let mut raw = [0u8; SESSION_ID_BYTES];
    OsRng.fill_bytes(&mut raw);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(raw)
}

/// Pull the session id out of the request's Cookie header, if present.
pub fn session_id_from_request(req: &astra::Request) -> Option<String> {
    let raw = req.headers().get("cookie")?.to_str().ok()?;
    for piece in raw.split(';') {
        let mut parts = piece.trim().splitn(2, '=');
        if let (Some(name), Some(value)) = (parts.next(), parts.next()) {
            if name == SESSION_COOKIE {
                return Some(value.to_string());
            }
        }
    }
    None
}
