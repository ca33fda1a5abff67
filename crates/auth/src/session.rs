//! Session data

use crate::types::{TokenPair, User};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    /// The persisted token has not been checked yet
    Initializing,
    Authenticated,
    Anonymous,
}

/// Snapshot of the client-side session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub status: SessionStatus,
    pub user: Option<User>,
    pub tokens: Option<TokenPair>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            status: SessionStatus::Initializing,
            user: None,
            tokens: None,
        }
    }
}

impl Session {
    pub(crate) fn authenticated(user: User, tokens: TokenPair) -> Self {
        Self {
            status: SessionStatus::Authenticated,
            user: Some(user),
            tokens: Some(tokens),
        }
    }

    pub(crate) fn anonymous() -> Self {
        Self {
            status: SessionStatus::Anonymous,
            user: None,
            tokens: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::Authenticated
    }
}

#[derive(Deserialize)]
struct Claims {
    exp: Option<i64>,
}

impl TokenPair {
    /// Expiry time claimed by the access token
    ///
    /// The signature is not checked; the backend stays the authority on
    /// whether a token is valid. Returns `None` for tokens that are not
    /// JWTs or carry no `exp` claim.
    pub fn access_expires_at(&self) -> Option<DateTime<Utc>> {
        let payload = self.access.split('.').nth(1)?;
        let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
        let claims: Claims = serde_json::from_slice(&bytes).ok()?;
        Utc.timestamp_opt(claims.exp?, 0).single()
    }

    /// Check if the access token has expired
    pub fn is_access_expired(&self) -> bool {
        match self.access_expires_at() {
            Some(expires_at) => Utc::now() >= expires_at,
            None => false,
        }
    }
}
