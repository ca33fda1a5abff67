//! Account endpoints that act on the signed-in user

use crate::manager::SessionManager;
use crate::types::{PasswordChange, User, UserPatch, UserStats};
use crate::AuthError;
use serde_json::Value;
use std::sync::Arc;

const PROFILE_UPDATE_PATH: &str = "/auth/profile/update/";
const CHANGE_PASSWORD_PATH: &str = "/auth/change-password/";
const STATS_PATH: &str = "/auth/stats/";

/// Profile editing, password change and account statistics
#[derive(Clone)]
pub struct AccountApi {
    session: Arc<SessionManager>,
}

impl AccountApi {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self { session }
    }

    fn require_session(&self) -> Result<(), AuthError> {
        if self.session.is_authenticated() {
            Ok(())
        } else {
            Err(AuthError::MissingSession)
        }
    }

    /// Save profile fields and merge the server's answer into the session
    pub async fn update_profile(&self, patch: &UserPatch) -> Result<User, AuthError> {
        self.require_session()?;
        let saved: UserPatch = self
            .session
            .api()
            .patch(PROFILE_UPDATE_PATH, patch)
            .await?;
        self.session.update_user(saved);
        self.session.user().ok_or(AuthError::MissingSession)
    }

    /// Change the password; returns the server's confirmation text
    pub async fn change_password(&self, change: &PasswordChange) -> Result<Option<String>, AuthError> {
        self.require_session()?;
        let response: Value = self
            .session
            .api()
            .post(CHANGE_PASSWORD_PATH, change)
            .await?;
        Ok(response
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    /// Vote and comment counters of the signed-in user
    pub async fn stats(&self) -> Result<UserStats, AuthError> {
        self.require_session()?;
        Ok(self.session.api().get(STATS_PATH).await?)
    }
}
