//! Application state and startup wiring for the BLT terminal client.
//!
//! `App` is the composition root: it constructs the storage, client state,
//! API client, and auth controller, and owns the transient UI state (open
//! modal, form fields, toasts). Network flows run on background tasks and
//! report back through an mpsc channel drained by `check_background_tasks`,
//! so the event loop never blocks on the network.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::api::ApiClient;
use crate::auth::{AuthController, AuthOutcome};
use crate::config::Config;
use crate::models::SignupData;
use crate::state::{ClientEvent, ClientState, EventKind, Theme};
use crate::storage::{FileStorage, Storage, THEME_KEY};
use crate::ui::toast::{Toast, ToastKind};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
/// Auth flows produce one message each; 16 leaves plenty of headroom.
const CHANNEL_BUFFER_SIZE: usize = 16;

/// Maximum length for email input.
const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum length for username input.
const MAX_USERNAME_LENGTH: usize = 50;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

// ============================================================================
// UI State Types
// ============================================================================

/// What the main screen is currently showing on top of the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    /// Login form modal open
    Login,
    /// Signup form modal open
    Signup,
    Quitting,
}

/// Focused field inside the login/signup modal.
/// The login form skips `Username`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Username,
    Email,
    Password,
    Submit,
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Results sent from background network tasks back to the event loop.
pub enum TaskResult {
    /// A login attempt finished
    LoginDone(AuthOutcome),
    /// A signup attempt finished
    SignupDone(AuthOutcome),
    /// Logout cleanup ran (network part was best-effort)
    LogoutDone,
    /// The startup session check finished
    AuthChecked(bool),
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    // Core services
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    pub state: Arc<Mutex<ClientState>>,
    pub auth: Arc<AuthController>,

    // UI state
    pub mode: Mode,
    pub theme: Theme,
    pub toasts: Vec<Toast>,
    pub last_updated: Option<DateTime<Utc>>,

    // Form state (shared between the login and signup modals)
    pub form_username: String,
    pub form_email: String,
    pub form_password: String,
    pub form_focus: FormField,
    pub form_error: Option<String>,
    pub auth_pending: bool,

    task_tx: mpsc::Sender<TaskResult>,
    task_rx: mpsc::Receiver<TaskResult>,
}

impl App {
    pub fn new() -> Result<Self> {
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };

        let storage: Arc<dyn Storage> = Arc::new(FileStorage::open_default(Config::app_name())?);

        // Restore the theme preference before the first frame
        let theme = storage
            .get(THEME_KEY)
            .map(|s| Theme::from_str(&s))
            .unwrap_or_default();

        let state = Arc::new(Mutex::new(ClientState::new()));

        let api = ApiClient::new(config.api_base_url(), storage.clone())?;
        debug!(base_url = api.base_url(), "API client ready");
        let auth = Arc::new(AuthController::new(api, state.clone(), storage.clone()));

        let (task_tx, task_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        let form_email = config.last_email.clone().unwrap_or_default();
        let last_updated = storage.last_modified();

        Ok(Self {
            config,
            storage,
            state,
            auth,

            mode: Mode::Normal,
            theme,
            toasts: Vec::new(),
            last_updated,

            form_username: String::new(),
            form_email,
            form_password: String::new(),
            form_focus: FormField::Email,
            form_error: None,
            auth_pending: false,

            task_tx,
            task_rx,
        })
    }

    /// Startup wiring: log-only bus listeners, the background session
    /// check, and the ready event. Each phase is best-effort so a failure
    /// in one cannot block the others.
    pub fn bootstrap(&mut self) {
        {
            let mut state = self.state.lock().expect("state lock poisoned");
            state.subscribe(EventKind::UserChanged, |event| {
                if let ClientEvent::UserChanged(user) = event {
                    debug!(user = ?user.as_ref().map(|u| &u.username), "user:changed");
                }
            });
            state.subscribe(EventKind::ThemeChanged, |event| {
                if let ClientEvent::ThemeChanged(theme) = event {
                    debug!(theme = theme.as_str(), "theme:changed");
                }
            });
            state.subscribe(EventKind::AppReady, |_| debug!("app:ready"));
        }

        // Verify any stored token in the background; failures leave the UI
        // in its logged-out default.
        let auth = self.auth.clone();
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            let ok = auth.check_auth().await;
            let _ = tx.send(TaskResult::AuthChecked(ok)).await;
        });

        self.state
            .lock()
            .expect("state lock poisoned")
            .emit(&ClientEvent::AppReady);
    }

    // =========================================================================
    // Session accessors
    // =========================================================================

    pub fn is_authenticated(&self) -> bool {
        self.state.lock().expect("state lock poisoned").is_authenticated()
    }

    pub fn username(&self) -> Option<String> {
        self.state
            .lock()
            .expect("state lock poisoned")
            .user()
            .map(|u| u.username.clone())
    }

    // =========================================================================
    // Modal handling
    // =========================================================================

    pub fn start_login(&mut self) {
        self.mode = Mode::Login;
        self.form_password.clear();
        self.form_error = None;
        self.form_focus = if self.form_email.is_empty() {
            FormField::Email
        } else {
            FormField::Password
        };
    }

    pub fn start_signup(&mut self) {
        self.mode = Mode::Signup;
        self.form_password.clear();
        self.form_error = None;
        self.form_focus = FormField::Username;
    }

    pub fn close_modal(&mut self) {
        self.mode = Mode::Normal;
        self.form_password.clear();
        self.form_error = None;
    }

    // =========================================================================
    // Auth flows (spawned so the UI keeps drawing)
    // =========================================================================

    pub fn submit_login(&mut self) {
        if self.auth_pending {
            return;
        }
        if self.form_email.is_empty() || self.form_password.is_empty() {
            self.form_error = Some("Email and password required".to_string());
            return;
        }
        self.form_error = None;
        self.auth_pending = true;

        let auth = self.auth.clone();
        let tx = self.task_tx.clone();
        let email = self.form_email.clone();
        let password = self.form_password.clone();
        tokio::spawn(async move {
            let outcome = auth.login(&email, &password).await;
            let _ = tx.send(TaskResult::LoginDone(outcome)).await;
        });
    }

    pub fn submit_signup(&mut self) {
        if self.auth_pending {
            return;
        }
        if self.form_username.is_empty() || self.form_email.is_empty() || self.form_password.is_empty()
        {
            self.form_error = Some("All fields are required".to_string());
            return;
        }
        self.form_error = None;
        self.auth_pending = true;

        let auth = self.auth.clone();
        let tx = self.task_tx.clone();
        let data = SignupData {
            username: self.form_username.clone(),
            email: self.form_email.clone(),
            password: self.form_password.clone(),
        };
        tokio::spawn(async move {
            let outcome = auth.signup(&data).await;
            let _ = tx.send(TaskResult::SignupDone(outcome)).await;
        });
    }

    pub fn request_logout(&mut self) {
        let auth = self.auth.clone();
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            auth.logout().await;
            let _ = tx.send(TaskResult::LogoutDone).await;
        });
    }

    // =========================================================================
    // Theme
    // =========================================================================

    /// Flip the theme, persist the preference, and publish the change.
    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        if let Err(e) = self.storage.set(THEME_KEY, self.theme.as_str()) {
            warn!(error = %e, "Failed to persist theme preference");
        }
        self.state
            .lock()
            .expect("state lock poisoned")
            .emit(&ClientEvent::ThemeChanged(self.theme));
        self.refresh_last_updated();
    }

    // =========================================================================
    // Background task handling
    // =========================================================================

    /// Drain completed background tasks and apply their results.
    pub fn check_background_tasks(&mut self) {
        while let Ok(result) = self.task_rx.try_recv() {
            match result {
                TaskResult::LoginDone(outcome) => {
                    self.auth_pending = false;
                    match outcome {
                        AuthOutcome::Success { .. } => {
                            self.remember_email();
                            self.close_modal();
                            self.push_toast("Logged in successfully!", ToastKind::Success);
                            self.refresh_last_updated();
                        }
                        AuthOutcome::Failure { message } => {
                            self.form_error = Some(message.clone());
                            self.push_toast(message, ToastKind::Error);
                        }
                    }
                }
                TaskResult::SignupDone(outcome) => {
                    self.auth_pending = false;
                    match outcome {
                        AuthOutcome::Success { .. } => {
                            self.remember_email();
                            self.close_modal();
                            self.push_toast("Account created successfully!", ToastKind::Success);
                            self.refresh_last_updated();
                        }
                        AuthOutcome::Failure { message } => {
                            self.form_error = Some(message.clone());
                            self.push_toast(message, ToastKind::Error);
                        }
                    }
                }
                TaskResult::LogoutDone => {
                    self.push_toast("Logged out successfully", ToastKind::Success);
                    self.refresh_last_updated();
                }
                TaskResult::AuthChecked(ok) => {
                    debug!(authenticated = ok, "Startup session check finished");
                }
            }
        }
    }

    // =========================================================================
    // Toasts
    // =========================================================================

    pub fn push_toast(&mut self, message: impl Into<String>, kind: ToastKind) {
        self.toasts.push(Toast::new(message, kind));
    }

    pub fn prune_toasts(&mut self) {
        self.toasts.retain(|t| !t.is_expired());
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn remember_email(&mut self) {
        self.config.last_email = Some(self.form_email.clone());
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save config");
        }
    }

    fn refresh_last_updated(&mut self) {
        self.last_updated = self.storage.last_modified();
    }
}

/// Input length guards shared by the form handlers.
pub fn can_add_email_char(len: usize) -> bool {
    len < MAX_EMAIL_LENGTH
}

pub fn can_add_username_char(len: usize) -> bool {
    len < MAX_USERNAME_LENGTH
}

pub fn can_add_password_char(len: usize) -> bool {
    len < MAX_PASSWORD_LENGTH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_length_guards() {
        assert!(can_add_email_char(0));
        assert!(!can_add_email_char(MAX_EMAIL_LENGTH));
        assert!(can_add_username_char(MAX_USERNAME_LENGTH - 1));
        assert!(!can_add_username_char(MAX_USERNAME_LENGTH));
        assert!(!can_add_password_char(MAX_PASSWORD_LENGTH));
    }
}
