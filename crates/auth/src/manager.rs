//! The session manager: sole writer of the client-side session

use crate::notify::{LogNotifier, Navigator, Notifier, NoopNavigator};
use crate::session::{Session, SessionStatus};
use crate::storage::{StorageError, TokenStorage, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
use crate::types::{AuthResponse, RegisterData, SignInCredentials, TokenPair, User, UserPatch};
use crate::AuthError;
use log::{debug, info, warn};
use puls_obywateli_http::{ApiClient, ErrorKind, HttpError};
use serde::Serialize;
use serde_json::Value;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::{watch, Mutex};

pub(crate) const LOGIN_PATH: &str = "/auth/login/";
pub(crate) const REGISTER_PATH: &str = "/auth/register/";
pub(crate) const LOGOUT_PATH: &str = "/auth/logout/";
pub(crate) const PROFILE_PATH: &str = "/auth/profile/";

const LOGIN_SUCCESS: &str = "Zalogowano pomyślnie";
const LOGIN_FAILURE: &str = "Błąd podczas logowania";
const REGISTER_SUCCESS: &str = "Konto zostało utworzone pomyślnie";
const REGISTER_FAILURE: &str = "Błąd podczas rejestracji";
const LOGOUT_SUCCESS: &str = "Wylogowano pomyślnie";

/// Route the view returns to after logout
pub const LANDING_PATH: &str = "/";

/// Session manager options
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Post the refresh token to the logout endpoint before forgetting it
    pub revoke_on_logout: bool,
}

/// Holds the current session and mediates every change to it
///
/// Keeps three places in agreement: the in-memory [`Session`], the
/// tokens in [`TokenStorage`] and the bearer header of the [`ApiClient`].
/// Nothing else in the client writes to any of them.
pub struct SessionManager {
    api: ApiClient,
    storage: Arc<dyn TokenStorage>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    options: SessionOptions,
    session: RwLock<Session>,
    status_tx: watch::Sender<SessionStatus>,
    /// Held by bootstrap, login, register and logout for their whole run
    commands: Mutex<()>,
}

impl SessionManager {
    /// New manager in the `Initializing` state
    pub fn new(api: ApiClient, storage: Arc<dyn TokenStorage>) -> Self {
        let (status_tx, _) = watch::channel(SessionStatus::Initializing);
        Self {
            api,
            storage,
            notifier: Arc::new(LogNotifier),
            navigator: Arc::new(NoopNavigator),
            options: SessionOptions::default(),
            session: RwLock::new(Session::default()),
            status_tx,
            commands: Mutex::new(()),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    pub fn with_options(mut self, options: SessionOptions) -> Self {
        self.options = options;
        self
    }

    /// The HTTP client whose bearer header this manager controls
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.session.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.session.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_session(&self, session: Session) {
        let status = session.status;
        *self.write() = session;
        self.status_tx.send_replace(status);
        debug!("session is now {:?}", status);
    }

    /// Current lifecycle state
    pub fn status(&self) -> SessionStatus {
        self.read().status
    }

    /// Snapshot of the whole session
    pub fn session(&self) -> Session {
        self.read().clone()
    }

    /// The signed-in user, if any
    pub fn user(&self) -> Option<User> {
        self.read().user.clone()
    }

    /// The token pair of the active session, if any
    pub fn tokens(&self) -> Option<TokenPair> {
        self.read().tokens.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.status() == SessionStatus::Authenticated
    }

    /// True until [`bootstrap`](Self::bootstrap) has settled the state
    pub fn is_loading(&self) -> bool {
        self.status() == SessionStatus::Initializing
    }

    /// Watch status changes (e.g. to re-render a header)
    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status_tx.subscribe()
    }

    /// Restore the session from the persisted access token
    ///
    /// Only the first call does any work; later calls report the current
    /// status. Never fails: a rejected or unreachable profile check means
    /// the stored token is unusable and the session starts anonymous.
    ///
    /// Session commands run one at a time; a login started while the
    /// profile check is pending waits for it and then wins.
    pub async fn bootstrap(&self) -> SessionStatus {
        let _guard = self.commands.lock().await;
        let current = self.status();
        if current != SessionStatus::Initializing {
            return current;
        }

        let Some(access) = self.storage.get(ACCESS_TOKEN_KEY) else {
            debug!("no persisted token");
            self.set_session(Session::anonymous());
            return SessionStatus::Anonymous;
        };
        let tokens = TokenPair {
            access,
            refresh: self.storage.get(REFRESH_TOKEN_KEY).unwrap_or_default(),
        };
        if tokens.is_access_expired() {
            debug!("persisted access token is past its exp claim");
        }

        let profile = match self.api.configure_auth(Some(&tokens.access)) {
            Ok(()) => self.api.get::<User>(PROFILE_PATH).await,
            Err(err) => Err(err),
        };
        match profile {
            Ok(user) => {
                info!("restored session for user {}", user.id);
                self.set_session(Session::authenticated(user, tokens));
                SessionStatus::Authenticated
            }
            Err(err) => {
                debug!("persisted token rejected: {}", err);
                self.clear_credentials();
                self.set_session(Session::anonymous());
                SessionStatus::Anonymous
            }
        }
    }

    /// Sign in with email and password
    ///
    /// On failure the user is notified and the error is returned so the
    /// form can stop its loading indicator; the session is left as it was.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let credentials = SignInCredentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.authenticate(LOGIN_PATH, &credentials, LOGIN_SUCCESS, LOGIN_FAILURE)
            .await
    }

    /// Create an account and sign in with it
    ///
    /// Field-level validation errors stay available through
    /// [`AuthError::validation_errors`].
    pub async fn register(&self, data: &RegisterData) -> Result<User, AuthError> {
        self.authenticate(REGISTER_PATH, data, REGISTER_SUCCESS, REGISTER_FAILURE)
            .await
    }

    async fn authenticate<B>(
        &self,
        path: &str,
        body: &B,
        success: &str,
        failure: &str,
    ) -> Result<User, AuthError>
    where
        B: Serialize + ?Sized,
    {
        let _guard = self.commands.lock().await;
        let response = match self.api.post::<AuthResponse, B>(path, body).await {
            Ok(response) => response,
            Err(err) => {
                warn!("{} failed: {}", path, err);
                self.notifier.error(user_message(&err, failure));
                return Err(err.into());
            }
        };

        if let Err(err) = self.persist_tokens(&response.tokens) {
            warn!("could not persist tokens: {}", err);
            self.restore_persisted();
            self.notifier.error(failure);
            return Err(err.into());
        }

        if let Err(err) = self.api.configure_auth(Some(&response.tokens.access)) {
            warn!("{} returned an unusable access token", path);
            self.restore_persisted();
            self.notifier.error(failure);
            return Err(err.into());
        }
        info!("signed in as user {}", response.user.id);
        self.set_session(Session::authenticated(
            response.user.clone(),
            response.tokens,
        ));
        self.notifier.success(success);
        Ok(response.user)
    }

    /// Forget the session and return to the landing page
    pub async fn logout(&self) {
        let _guard = self.commands.lock().await;
        if self.options.revoke_on_logout {
            if let Some(tokens) = self.tokens() {
                let body = serde_json::json!({ "refresh": tokens.refresh });
                if let Err(err) = self.api.post::<Value, _>(LOGOUT_PATH, &body).await {
                    warn!("server-side logout failed: {}", err);
                }
            }
        }

        self.clear_credentials();
        self.set_session(Session::anonymous());
        info!("signed out");
        self.notifier.success(LOGOUT_SUCCESS);
        self.navigator.navigate(LANDING_PATH);
    }

    /// Merge fields into the signed-in user without any request
    ///
    /// Does nothing when no one is signed in.
    pub fn update_user(&self, patch: UserPatch) {
        let mut session = self.write();
        if session.status != SessionStatus::Authenticated {
            return;
        }
        if let Some(user) = session.user.as_mut() {
            patch.apply_to(user);
        }
    }

    fn persist_tokens(&self, tokens: &TokenPair) -> Result<(), StorageError> {
        self.storage.set(ACCESS_TOKEN_KEY, &tokens.access)?;
        self.storage.set(REFRESH_TOKEN_KEY, &tokens.refresh)
    }

    /// Put storage back in line with the in-memory session after a
    /// partial write.
    fn restore_persisted(&self) {
        match self.tokens() {
            Some(tokens) => {
                if let Err(err) = self.persist_tokens(&tokens) {
                    warn!("could not restore persisted tokens: {}", err);
                }
            }
            None => self.remove_persisted(),
        }
    }

    fn remove_persisted(&self) {
        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY] {
            if let Err(err) = self.storage.remove(key) {
                warn!("could not remove {}: {}", key, err);
            }
        }
    }

    fn clear_credentials(&self) {
        self.remove_persisted();
        // Clearing never fails
        let _ = self.api.configure_auth(None);
    }
}

/// Only 4xx rejections carry their server text to the user; server
/// and transport failures get the generic message.
fn user_message<'a>(err: &'a HttpError, fallback: &'a str) -> &'a str {
    match err.kind() {
        ErrorKind::Validation | ErrorKind::Unauthorized => {
            err.server_message().unwrap_or(fallback)
        }
        _ => fallback,
    }
}
