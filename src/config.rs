// src/config.rs
use crate::errors::ServerError;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_USER_DB: &str = "user_db.json";

/// Process configuration, read once at startup from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the server binds to.
    pub bind_addr: SocketAddr,
    /// Path of the flat-file credential store.
    pub user_db_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ServerError> {
        let addr = std::env::var("PERMIT_DASHBOARD_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
        let bind_addr: SocketAddr = addr
            .parse()
            .map_err(|e| ServerError::BadRequest(format!("Invalid PERMIT_DASHBOARD_ADDR '{addr}': {e}")))?;

        let user_db_path = std::env::var("PERMIT_DASHBOARD_USER_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_USER_DB));

        Ok(Self {
            bind_addr,
            user_db_path,
        })
    }
}
