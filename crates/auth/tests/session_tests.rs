use puls_obywateli_auth::{
    AccountApi, AuthError, MemoryStorage, Navigator, Notifier, RegisterData, SessionManager,
    SessionOptions, SessionStatus, TokenStorage, UserPatch, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY,
};
use puls_obywateli_http::{ApiClient, ErrorKind};
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct RecordingNotifier {
    successes: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.successes.lock().unwrap().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}

#[derive(Default)]
struct RecordingNavigator {
    visited: Mutex<Vec<String>>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.visited.lock().unwrap().push(path.to_string());
    }
}

struct Harness {
    manager: SessionManager,
    api: ApiClient,
    storage: Arc<MemoryStorage>,
    notifier: Arc<RecordingNotifier>,
    navigator: Arc<RecordingNavigator>,
}

fn setup(server: &MockServer) -> Harness {
    setup_with_options(server, SessionOptions::default())
}

fn setup_with_options(server: &MockServer, options: SessionOptions) -> Harness {
    let api = ApiClient::new(&format!("{}/api", server.uri()), reqwest::Client::new()).unwrap();
    let storage = Arc::new(MemoryStorage::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let navigator = Arc::new(RecordingNavigator::default());
    let manager = SessionManager::new(api.clone(), storage.clone())
        .with_notifier(notifier.clone())
        .with_navigator(navigator.clone())
        .with_options(options);

    Harness {
        manager,
        api,
        storage,
        notifier,
        navigator,
    }
}

/// Header, storage and session must describe the same state.
fn assert_consistent(h: &Harness) {
    match h.manager.status() {
        SessionStatus::Authenticated => {
            let tokens = h.manager.tokens().expect("authenticated session has tokens");
            assert_eq!(h.api.bearer_token(), Some(tokens.access.clone()));
            assert_eq!(h.storage.get(ACCESS_TOKEN_KEY), Some(tokens.access));
            assert!(h.manager.user().is_some());
        }
        SessionStatus::Anonymous => {
            assert_eq!(h.api.bearer_token(), None);
            assert_eq!(h.storage.get(ACCESS_TOKEN_KEY), None);
            assert_eq!(h.storage.get(REFRESH_TOKEN_KEY), None);
            assert!(h.manager.user().is_none());
        }
        SessionStatus::Initializing => panic!("session never settled"),
    }
}

async fn mount_login_success(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login/"))
        .and(body_json(json!({"email": "a@b.pl", "password": "secret123"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": {"id": 1, "nickname": "Jan K."},
            "tokens": {"access": "A", "refresh": "R"},
            "message": "Zalogowano pomyślnie"
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_bootstrap_without_token_is_anonymous_and_offline() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/profile/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let h = setup(&server);
    assert!(h.manager.is_loading());

    assert_eq!(h.manager.bootstrap().await, SessionStatus::Anonymous);
    assert_eq!(h.manager.bootstrap().await, SessionStatus::Anonymous);
    assert!(!h.manager.is_loading());
    assert_consistent(&h);
}

#[tokio::test]
async fn test_bootstrap_restores_session_from_storage() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/profile/"))
        .and(header("Authorization", "Bearer A"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "email": "a@b.pl",
            "nickname": "Jan K.",
            "is_verified": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let h = setup(&server);
    h.storage.set(ACCESS_TOKEN_KEY, "A").unwrap();
    h.storage.set(REFRESH_TOKEN_KEY, "R").unwrap();

    assert_eq!(h.manager.bootstrap().await, SessionStatus::Authenticated);
    let user = h.manager.user().unwrap();
    assert_eq!(user.nickname, "Jan K.");
    assert!(user.is_verified);
    assert_eq!(h.manager.tokens().unwrap().refresh, "R");
    assert_consistent(&h);

    // Second call does not hit the profile endpoint again.
    assert_eq!(h.manager.bootstrap().await, SessionStatus::Authenticated);
}

#[tokio::test]
async fn test_bootstrap_with_expired_token_clears_everything() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/profile/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Given token not valid for any token type"
        })))
        .mount(&server)
        .await;

    let h = setup(&server);
    h.storage.set(ACCESS_TOKEN_KEY, "expired").unwrap();
    h.storage.set(REFRESH_TOKEN_KEY, "R").unwrap();

    assert_eq!(h.manager.bootstrap().await, SessionStatus::Anonymous);
    assert_eq!(h.storage.get(ACCESS_TOKEN_KEY), None);
    assert_eq!(h.storage.get(REFRESH_TOKEN_KEY), None);
    assert_eq!(h.api.bearer_token(), None);
    // An expired session is not an error worth showing.
    assert!(h.notifier.errors.lock().unwrap().is_empty());
    assert_consistent(&h);
}

#[tokio::test]
async fn test_bootstrap_survives_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/profile/"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let h = setup(&server);
    h.storage.set(ACCESS_TOKEN_KEY, "A").unwrap();

    assert_eq!(h.manager.bootstrap().await, SessionStatus::Anonymous);
    assert_consistent(&h);
}

#[tokio::test]
async fn test_login_success_updates_storage_header_and_user() {
    let server = MockServer::start().await;
    mount_login_success(&server).await;

    let h = setup(&server);
    h.manager.bootstrap().await;
    let mut status_rx = h.manager.subscribe();

    let user = h.manager.login("a@b.pl", "secret123").await.unwrap();

    assert_eq!(user.id, 1);
    assert_eq!(user.nickname, "Jan K.");
    assert_eq!(h.manager.user(), Some(user));
    assert_eq!(h.manager.status(), SessionStatus::Authenticated);
    assert_eq!(h.storage.get(ACCESS_TOKEN_KEY).as_deref(), Some("A"));
    assert_eq!(h.storage.get(REFRESH_TOKEN_KEY).as_deref(), Some("R"));
    assert_eq!(h.api.bearer_token().as_deref(), Some("A"));
    assert_eq!(
        *h.notifier.successes.lock().unwrap(),
        vec!["Zalogowano pomyślnie".to_string()]
    );
    assert!(status_rx.has_changed().unwrap());
    assert_eq!(*status_rx.borrow_and_update(), SessionStatus::Authenticated);
    assert_consistent(&h);
}

#[tokio::test]
async fn test_login_failure_leaves_session_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login/"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "Nieprawidłowe dane"})),
        )
        .mount(&server)
        .await;

    let h = setup(&server);
    h.manager.bootstrap().await;

    let err = h.manager.login("a@b.pl", "wrong").await.unwrap_err();

    assert_eq!(err.server_message(), Some("Nieprawidłowe dane"));
    assert_eq!(err.to_string(), "Nieprawidłowe dane");
    assert_eq!(err.kind(), Some(ErrorKind::Validation));
    assert_eq!(h.manager.status(), SessionStatus::Anonymous);
    assert_eq!(h.storage.get(ACCESS_TOKEN_KEY), None);
    assert_eq!(
        *h.notifier.errors.lock().unwrap(),
        vec!["Nieprawidłowe dane".to_string()]
    );
    assert_consistent(&h);
}

#[tokio::test]
async fn test_login_failure_without_message_uses_generic_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let h = setup(&server);
    h.manager.bootstrap().await;

    let err = h.manager.login("a@b.pl", "secret123").await.unwrap_err();

    assert_eq!(err.kind(), Some(ErrorKind::Server));
    assert_eq!(
        *h.notifier.errors.lock().unwrap(),
        vec!["Błąd podczas logowania".to_string()]
    );
    assert_consistent(&h);
}

#[tokio::test]
async fn test_login_server_error_hides_server_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login/"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "detail": "IntegrityError: duplicate key value violates unique constraint"
        })))
        .mount(&server)
        .await;

    let h = setup(&server);
    h.manager.bootstrap().await;

    let err = h.manager.login("a@b.pl", "secret123").await.unwrap_err();

    assert_eq!(err.kind(), Some(ErrorKind::Server));
    assert!(err.server_message().is_some());
    assert_eq!(
        *h.notifier.errors.lock().unwrap(),
        vec!["Błąd podczas logowania".to_string()]
    );
    assert_consistent(&h);
}

#[tokio::test]
async fn test_login_with_unsendable_token_is_refused() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": {"id": 1, "nickname": "Jan K."},
            "tokens": {"access": "A\nX-Injected: 1", "refresh": "R"}
        })))
        .mount(&server)
        .await;

    let h = setup(&server);
    h.manager.bootstrap().await;

    let err = h.manager.login("a@b.pl", "secret123").await.unwrap_err();

    assert_eq!(err.kind(), Some(ErrorKind::Unauthorized));
    assert_eq!(h.manager.status(), SessionStatus::Anonymous);
    assert_eq!(
        *h.notifier.errors.lock().unwrap(),
        vec!["Błąd podczas logowania".to_string()]
    );
    assert_consistent(&h);
}

async fn mount_slow_profile(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path("/api/auth/profile/"))
        .and(header("Authorization", "Bearer OLD"))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_json(json!({"id": 7, "nickname": "Stary"}))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_login_during_bootstrap_wins() {
    let server = MockServer::start().await;
    mount_slow_profile(&server, 200).await;
    mount_login_success(&server).await;

    let h = setup(&server);
    h.storage.set(ACCESS_TOKEN_KEY, "OLD").unwrap();
    h.storage.set(REFRESH_TOKEN_KEY, "OLD_R").unwrap();

    let (status, login) = tokio::join!(
        h.manager.bootstrap(),
        h.manager.login("a@b.pl", "secret123")
    );

    assert_eq!(status, SessionStatus::Authenticated);
    assert_eq!(login.unwrap().id, 1);
    assert_eq!(h.manager.tokens().unwrap().access, "A");
    assert_eq!(h.api.bearer_token().as_deref(), Some("A"));
    assert_eq!(h.storage.get(REFRESH_TOKEN_KEY).as_deref(), Some("R"));
    assert_consistent(&h);
}

#[tokio::test]
async fn test_rejected_stored_token_does_not_undo_concurrent_login() {
    let server = MockServer::start().await;
    mount_slow_profile(&server, 401).await;
    mount_login_success(&server).await;

    let h = setup(&server);
    h.storage.set(ACCESS_TOKEN_KEY, "OLD").unwrap();

    let (status, login) = tokio::join!(
        h.manager.bootstrap(),
        h.manager.login("a@b.pl", "secret123")
    );

    assert_eq!(status, SessionStatus::Anonymous);
    assert!(login.is_ok());
    assert_eq!(h.manager.status(), SessionStatus::Authenticated);
    assert_eq!(h.storage.get(ACCESS_TOKEN_KEY).as_deref(), Some("A"));
    assert_consistent(&h);
}

#[tokio::test]
async fn test_logout_during_bootstrap_ends_anonymous() {
    let server = MockServer::start().await;
    mount_slow_profile(&server, 200).await;

    let h = setup(&server);
    h.storage.set(ACCESS_TOKEN_KEY, "OLD").unwrap();

    tokio::join!(h.manager.bootstrap(), h.manager.logout());

    assert_eq!(h.manager.status(), SessionStatus::Anonymous);
    assert_consistent(&h);
}

#[tokio::test]
async fn test_register_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register/"))
        .and(body_json(json!({
            "email": "ola@example.pl",
            "username": "ola",
            "nickname": "Ola",
            "password": "Haslo123!",
            "password_confirm": "Haslo123!",
            "first_name": "Aleksandra"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "user": {"id": 9, "email": "ola@example.pl", "nickname": "Ola"},
            "tokens": {"access": "A9", "refresh": "R9"}
        })))
        .mount(&server)
        .await;

    let h = setup(&server);
    h.manager.bootstrap().await;

    let data = RegisterData {
        email: "ola@example.pl".to_string(),
        username: "ola".to_string(),
        nickname: "Ola".to_string(),
        password: "Haslo123!".to_string(),
        password_confirm: "Haslo123!".to_string(),
        first_name: Some("Aleksandra".to_string()),
        last_name: None,
    };
    let user = h.manager.register(&data).await.unwrap();

    assert_eq!(user.id, 9);
    assert_eq!(h.api.bearer_token().as_deref(), Some("A9"));
    assert_eq!(
        *h.notifier.successes.lock().unwrap(),
        vec!["Konto zostało utworzone pomyślnie".to_string()]
    );
    assert_consistent(&h);
}

#[tokio::test]
async fn test_register_validation_errors_reach_caller() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "nickname": ["user with this nickname already exists."]
        })))
        .mount(&server)
        .await;

    let h = setup(&server);
    h.manager.bootstrap().await;

    let err = h
        .manager
        .register(&RegisterData::default())
        .await
        .unwrap_err();

    let errors = err.validation_errors().unwrap();
    assert_eq!(
        errors["nickname"][0],
        "user with this nickname already exists."
    );
    assert_eq!(
        *h.notifier.errors.lock().unwrap(),
        vec!["Błąd podczas rejestracji".to_string()]
    );
    assert_consistent(&h);
}

#[tokio::test]
async fn test_logout_clears_everything_and_navigates_home() {
    let server = MockServer::start().await;
    mount_login_success(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let h = setup(&server);
    h.manager.bootstrap().await;
    h.manager.login("a@b.pl", "secret123").await.unwrap();

    h.manager.logout().await;

    assert_eq!(h.storage.get(ACCESS_TOKEN_KEY), None);
    assert_eq!(h.storage.get(REFRESH_TOKEN_KEY), None);
    assert_eq!(h.api.bearer_token(), None);
    assert_eq!(h.manager.user(), None);
    assert_eq!(h.manager.status(), SessionStatus::Anonymous);
    assert_eq!(*h.navigator.visited.lock().unwrap(), vec!["/".to_string()]);
    assert!(h
        .notifier
        .successes
        .lock()
        .unwrap()
        .contains(&"Wylogowano pomyślnie".to_string()));
    assert_consistent(&h);
}

#[tokio::test]
async fn test_logout_revokes_refresh_token_when_enabled() {
    let server = MockServer::start().await;
    mount_login_success(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout/"))
        .and(header("Authorization", "Bearer A"))
        .and(body_json(json!({"refresh": "R"})))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "Błąd podczas wylogowania"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let h = setup_with_options(
        &server,
        SessionOptions {
            revoke_on_logout: true,
        },
    );
    h.manager.bootstrap().await;
    h.manager.login("a@b.pl", "secret123").await.unwrap();

    // A failed revocation does not keep the user signed in.
    h.manager.logout().await;

    assert_eq!(h.manager.status(), SessionStatus::Anonymous);
    assert_consistent(&h);
}

#[tokio::test]
async fn test_update_user_merges_only_when_signed_in() {
    let server = MockServer::start().await;
    mount_login_success(&server).await;

    let h = setup(&server);
    h.manager.bootstrap().await;

    h.manager.update_user(UserPatch {
        nickname: Some("ignored".to_string()),
        ..Default::default()
    });
    assert_eq!(h.manager.user(), None);

    h.manager.login("a@b.pl", "secret123").await.unwrap();
    h.manager.update_user(UserPatch {
        bio: Some("Obywatel".to_string()),
        ..Default::default()
    });

    let user = h.manager.user().unwrap();
    assert_eq!(user.bio.as_deref(), Some("Obywatel"));
    assert_eq!(user.nickname, "Jan K.");
}

#[tokio::test]
async fn test_account_update_profile_merges_server_answer() {
    let server = MockServer::start().await;
    mount_login_success(&server).await;
    Mock::given(method("PATCH"))
        .and(path("/api/auth/profile/update/"))
        .and(header("Authorization", "Bearer A"))
        .and(body_json(json!({"nickname": "Jan Kowalski"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "first_name": "Jan",
            "last_name": "Kowalski",
            "nickname": "Jan Kowalski",
            "avatar": null,
            "bio": ""
        })))
        .mount(&server)
        .await;

    let h = setup(&server);
    h.manager.bootstrap().await;
    h.manager.login("a@b.pl", "secret123").await.unwrap();
    let manager = Arc::new(h.manager);
    let account = AccountApi::new(manager.clone());

    let user = account
        .update_profile(&UserPatch {
            nickname: Some("Jan Kowalski".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(user.nickname, "Jan Kowalski");
    assert_eq!(user.last_name, "Kowalski");
    assert_eq!(manager.user(), Some(user));
}

#[tokio::test]
async fn test_account_requires_session() {
    let server = MockServer::start().await;
    let h = setup(&server);
    h.manager.bootstrap().await;
    let account = AccountApi::new(Arc::new(h.manager));

    let err = account.stats().await.unwrap_err();

    assert!(matches!(err, AuthError::MissingSession));
}
