//! Types for authentication and user management

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// User data as returned by the profile, login and register endpoints
///
/// The backend may omit fields (a freshly registered account has no bio,
/// a trimmed payload may carry only `id` and `nickname`), so everything
/// but the identity defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    /// Public pseudonym shown next to votes and comments
    pub nickname: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub is_verified: bool,
    pub created_at: Option<String>,
    pub votes_count: u64,
    pub comments_count: u64,

    /// Fields this client does not model (e.g. `profile` settings)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// Name to show in the header: full name, falling back to the nickname
    pub fn display_name(&self) -> &str {
        let full_name = self.full_name.trim();
        if full_name.is_empty() {
            &self.nickname
        } else {
            full_name
        }
    }
}

/// Partial user update, merged locally or sent to the profile endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub votes_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments_count: Option<u64>,
}

impl UserPatch {
    /// Apply every present field to `user`
    pub fn apply_to(self, user: &mut User) {
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(username) = self.username {
            user.username = username;
        }
        if let Some(nickname) = self.nickname {
            user.nickname = nickname;
        }
        if let Some(first_name) = self.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            user.last_name = last_name;
        }
        if let Some(full_name) = self.full_name {
            user.full_name = full_name;
        }
        if self.avatar.is_some() {
            user.avatar = self.avatar;
        }
        if self.bio.is_some() {
            user.bio = self.bio;
        }
        if let Some(is_verified) = self.is_verified {
            user.is_verified = is_verified;
        }
        if let Some(votes_count) = self.votes_count {
            user.votes_count = votes_count;
        }
        if let Some(comments_count) = self.comments_count {
            user.comments_count = comments_count;
        }
    }
}

/// Access/refresh bearer pair issued on login and registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Body of a successful login or registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub tokens: TokenPair,
    #[serde(default)]
    pub message: Option<String>,
}

/// Login credentials
#[derive(Debug, Clone, Serialize)]
pub struct SignInCredentials {
    pub email: String,
    pub password: String,
}

/// Fields accepted by the registration endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterData {
    pub email: String,
    pub username: String,
    pub nickname: String,
    pub password: String,
    pub password_confirm: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

/// Password change request
#[derive(Debug, Clone, Serialize)]
pub struct PasswordChange {
    pub old_password: String,
    pub new_password: String,
    pub new_password_confirm: String,
}

/// Activity counters from the account statistics endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserStats {
    pub votes_count: u64,
    pub comments_count: u64,
    pub member_since: Option<String>,
    pub last_activity: Option<String>,
}
