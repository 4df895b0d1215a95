//! Login, signup, logout, and session-check flows.

use std::sync::{Arc, Mutex};

use serde_json::json;
use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::models::{AuthResponse, MeResponse, SignupData, User};
use crate::state::ClientState;
use crate::storage::{Storage, AUTH_TOKEN_KEY};

const LOGIN_ENDPOINT: &str = "/auth/login";
const SIGNUP_ENDPOINT: &str = "/auth/signup";
const LOGOUT_ENDPOINT: &str = "/auth/logout";
const ME_ENDPOINT: &str = "/auth/me";

/// Result of a login or signup attempt.
///
/// Both flows share this shape: network and HTTP failures are converted to
/// `Failure` carrying the error's message, and a 2xx response without a
/// token is a `Failure` with a generic message.
#[derive(Debug, Clone)]
pub enum AuthOutcome {
    Success { user: Option<User> },
    Failure { message: String },
}

impl AuthOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AuthOutcome::Success { .. })
    }

    pub fn failure_message(&self) -> Option<&str> {
        match self {
            AuthOutcome::Success { .. } => None,
            AuthOutcome::Failure { message } => Some(message),
        }
    }
}

/// Coordinates the HTTP client, the client state, and the token storage.
/// Explicitly constructed by the composition root and shared via `Arc`.
pub struct AuthController {
    api: ApiClient,
    state: Arc<Mutex<ClientState>>,
    storage: Arc<dyn Storage>,
}

impl AuthController {
    pub fn new(api: ApiClient, state: Arc<Mutex<ClientState>>, storage: Arc<dyn Storage>) -> Self {
        Self { api, state, storage }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// POST credentials to the login endpoint.
    ///
    /// A response carrying a token persists it and updates the state; a
    /// response without one leaves everything untouched.
    pub async fn login(&self, email: &str, password: &str) -> AuthOutcome {
        let body = json!({ "email": email, "password": password });
        match self.api.post(LOGIN_ENDPOINT, &body).await {
            Ok(value) => self.apply_auth_response(value, "Invalid credentials"),
            Err(e) => AuthOutcome::Failure {
                message: e.to_string(),
            },
        }
    }

    /// POST signup data to the signup endpoint. Same contract as `login`.
    pub async fn signup(&self, data: &SignupData) -> AuthOutcome {
        match self.api.post(SIGNUP_ENDPOINT, data).await {
            Ok(value) => self.apply_auth_response(value, "Signup failed"),
            Err(e) => AuthOutcome::Failure {
                message: e.to_string(),
            },
        }
    }

    fn apply_auth_response(&self, value: serde_json::Value, failure_message: &str) -> AuthOutcome {
        let response: AuthResponse = match serde_json::from_value(value) {
            Ok(r) => r,
            Err(e) => {
                return AuthOutcome::Failure {
                    message: e.to_string(),
                }
            }
        };

        match response.token {
            Some(token) => {
                if let Err(e) = self.storage.set(AUTH_TOKEN_KEY, &token) {
                    warn!(error = %e, "Failed to persist auth token");
                }
                self.set_user(response.user.clone());
                info!(user = ?response.user.as_ref().map(|u| &u.username), "Authenticated");
                AuthOutcome::Success {
                    user: response.user,
                }
            }
            None => AuthOutcome::Failure {
                message: failure_message.to_string(),
            },
        }
    }

    /// Best-effort POST to the logout endpoint, then unconditional local
    /// cleanup: stored token, state user, and the HTTP cache all go, even
    /// when the network call failed.
    pub async fn logout(&self) {
        if let Err(e) = self.api.post(LOGOUT_ENDPOINT, &json!({})).await {
            warn!(error = %e, "Logout request failed");
        }

        if let Err(e) = self.storage.remove(AUTH_TOKEN_KEY) {
            warn!(error = %e, "Failed to remove stored token");
        }
        self.set_user(None);
        self.api.clear_cache();
        info!("Logged out");
    }

    /// Verify a stored token against the current-user endpoint.
    ///
    /// No token means no network call. A rejected token is removed from
    /// storage. A 2xx response without a user payload returns false but
    /// keeps the token.
    pub async fn check_auth(&self) -> bool {
        if self.storage.get(AUTH_TOKEN_KEY).is_none() {
            return false;
        }

        match self.api.get(ME_ENDPOINT, false).await {
            Ok(value) => {
                let response: MeResponse = match serde_json::from_value(value) {
                    Ok(r) => r,
                    Err(_) => MeResponse { user: None },
                };
                match response.user {
                    Some(user) => {
                        self.set_user(Some(user));
                        true
                    }
                    None => false,
                }
            }
            Err(e) => {
                debug!(error = %e, "Session check failed, clearing token");
                if let Err(e) = self.storage.remove(AUTH_TOKEN_KEY) {
                    warn!(error = %e, "Failed to remove stored token");
                }
                false
            }
        }
    }

    fn set_user(&self, user: Option<User>) {
        self.state.lock().expect("state lock poisoned").set_user(user);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn controller_for(server: &MockServer) -> (AuthController, Arc<Mutex<ClientState>>, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let state = Arc::new(Mutex::new(ClientState::new()));
        let api = ApiClient::new(server.uri(), storage.clone() as Arc<dyn Storage>).unwrap();
        let controller = AuthController::new(api, state.clone(), storage.clone() as Arc<dyn Storage>);
        (controller, state, storage)
    }

    #[tokio::test]
    async fn test_login_success_persists_token_and_user() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"token": "t", "user": {"username": "a"}}),
            ))
            .mount(&server)
            .await;

        let (auth, state, storage) = controller_for(&server);
        let outcome = auth.login("a@b.com", "pw").await;

        assert!(outcome.is_success());
        assert_eq!(storage.get(AUTH_TOKEN_KEY).as_deref(), Some("t"));
        let state = state.lock().unwrap();
        assert_eq!(state.user().map(|u| u.username.as_str()), Some("a"));
        assert!(state.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_without_token_fails_without_mutation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"detail": "nope"})))
            .mount(&server)
            .await;

        let (auth, state, storage) = controller_for(&server);
        let outcome = auth.login("a@b.com", "bad").await;

        assert_eq!(outcome.failure_message(), Some("Invalid credentials"));
        assert_eq!(storage.get(AUTH_TOKEN_KEY), None);
        assert!(!state.lock().unwrap().is_authenticated());
    }

    #[tokio::test]
    async fn test_login_http_error_carries_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let (auth, _, _) = controller_for(&server);
        let outcome = auth.login("a@b.com", "bad").await;
        assert_eq!(outcome.failure_message(), Some("HTTP 401: Unauthorized"));
    }

    #[tokio::test]
    async fn test_signup_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/signup"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"token": "t2", "user": {"username": "newbie"}}),
            ))
            .mount(&server)
            .await;

        let (auth, state, storage) = controller_for(&server);
        let data = SignupData {
            username: "newbie".to_string(),
            email: "n@b.com".to_string(),
            password: "longenough".to_string(),
        };
        let outcome = auth.signup(&data).await;

        assert!(outcome.is_success());
        assert_eq!(storage.get(AUTH_TOKEN_KEY).as_deref(), Some("t2"));
        assert!(state.lock().unwrap().is_authenticated());
    }

    #[tokio::test]
    async fn test_signup_without_token_uses_generic_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/signup"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let (auth, _, _) = controller_for(&server);
        let data = SignupData {
            username: "x".to_string(),
            email: "x@b.com".to_string(),
            password: "pw".to_string(),
        };
        assert_eq!(auth.signup(&data).await.failure_message(), Some("Signup failed"));
    }

    #[tokio::test]
    async fn test_logout_clears_everything_even_when_request_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/logout"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let (auth, state, storage) = controller_for(&server);
        storage.set(AUTH_TOKEN_KEY, "t").unwrap();
        state.lock().unwrap().set_user(Some(User {
            username: "a".to_string(),
            email: None,
        }));

        auth.logout().await;

        assert_eq!(storage.get(AUTH_TOKEN_KEY), None);
        assert!(state.lock().unwrap().user().is_none());
        assert!(!state.lock().unwrap().is_authenticated());
    }

    #[tokio::test]
    async fn test_check_auth_without_token_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&server)
            .await;

        let (auth, _, _) = controller_for(&server);
        assert!(!auth.check_auth().await);
    }

    #[tokio::test]
    async fn test_check_auth_with_valid_token_updates_state() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"user": {"username": "back"}}),
            ))
            .mount(&server)
            .await;

        let (auth, state, storage) = controller_for(&server);
        storage.set(AUTH_TOKEN_KEY, "t").unwrap();

        assert!(auth.check_auth().await);
        assert_eq!(
            state.lock().unwrap().user().map(|u| u.username.clone()),
            Some("back".to_string())
        );
    }

    #[tokio::test]
    async fn test_check_auth_rejected_token_is_removed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let (auth, _, storage) = controller_for(&server);
        storage.set(AUTH_TOKEN_KEY, "stale").unwrap();

        assert!(!auth.check_auth().await);
        assert_eq!(storage.get(AUTH_TOKEN_KEY), None);
    }

    #[tokio::test]
    async fn test_check_auth_success_without_user_keeps_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let (auth, _, storage) = controller_for(&server);
        storage.set(AUTH_TOKEN_KEY, "t").unwrap();

        assert!(!auth.check_auth().await);
        assert_eq!(storage.get(AUTH_TOKEN_KEY).as_deref(), Some("t"));
    }
}
