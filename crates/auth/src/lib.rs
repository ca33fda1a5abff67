//! PulsObywateli auth client
//!
//! Session lifecycle for the PulsObywateli API: restoring a persisted
//! token at start-up, login, registration, logout and local profile
//! updates. The [`SessionManager`] is the only writer of the session, the
//! token store and the bearer header of the shared
//! [`ApiClient`](puls_obywateli_http::ApiClient).

mod account;
mod manager;
mod notify;
mod session;
mod storage;
mod types;

pub use account::AccountApi;
pub use manager::{SessionManager, SessionOptions, LANDING_PATH};
pub use notify::{LogNotifier, Navigator, NoopNavigator, Notifier};
pub use session::{Session, SessionStatus};
pub use storage::{
    FileStorage, MemoryStorage, StorageError, TokenStorage, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY,
};
pub use types::*;

use puls_obywateli_http::{ErrorKind, HttpError};
use serde_json::Value;
use thiserror::Error;

/// Error returned by session and account operations
#[derive(Error, Debug)]
pub enum AuthError {
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Missing session")]
    MissingSession,
}

impl AuthError {
    /// The message the server sent with its rejection
    pub fn server_message(&self) -> Option<&str> {
        match self {
            AuthError::Http(err) => err.server_message(),
            _ => None,
        }
    }

    /// The raw rejection payload, e.g. `{"email": ["..."]}`
    pub fn validation_errors(&self) -> Option<&Value> {
        match self {
            AuthError::Http(err) => err.body(),
            _ => None,
        }
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            AuthError::Http(err) => Some(err.kind()),
            _ => None,
        }
    }
}
