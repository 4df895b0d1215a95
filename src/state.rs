//! Client-side application state and event bus.
//!
//! `ClientState` is the single holder of the current user and the
//! authentication flag, mutated only through `set_user`. Components talk
//! to each other through a small typed publish/subscribe bus: listeners
//! are invoked synchronously, in registration order, with no isolation.
//!
//! There are no process-wide singletons; the composition root in `app`
//! constructs one `ClientState` and injects it where needed.

use std::collections::HashMap;

use crate::models::User;

/// UI color scheme. Persisted under the `theme` storage key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    /// Parse a stored preference. Anything unrecognized falls back to dark,
    /// the terminal default.
    pub fn from_str(s: &str) -> Self {
        match s {
            "light" => Theme::Light,
            _ => Theme::Dark,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

/// Events published on the client state bus.
#[derive(Debug, Clone)]
pub enum ClientEvent {
    /// The current user changed (login, signup, logout, session check).
    UserChanged(Option<User>),
    /// The theme preference was toggled.
    ThemeChanged(Theme),
    /// Startup wiring finished.
    AppReady,
}

impl ClientEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ClientEvent::UserChanged(_) => EventKind::UserChanged,
            ClientEvent::ThemeChanged(_) => EventKind::ThemeChanged,
            ClientEvent::AppReady => EventKind::AppReady,
        }
    }
}

/// Event names a listener can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    UserChanged,
    ThemeChanged,
    AppReady,
}

/// Handle returned by `subscribe`, usable to remove the listener later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&ClientEvent) + Send>;

/// Holder of the current user plus the event bus.
#[derive(Default)]
pub struct ClientState {
    user: Option<User>,
    is_authenticated: bool,
    listeners: HashMap<EventKind, Vec<(SubscriptionId, Listener)>>,
    next_subscription: u64,
}

impl ClientState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for `kind`. Multiple listeners are allowed and
    /// keep their insertion order.
    pub fn subscribe<F>(&mut self, kind: EventKind, callback: F) -> SubscriptionId
    where
        F: FnMut(&ClientEvent) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners
            .entry(kind)
            .or_default()
            .push((id, Box::new(callback)));
        id
    }

    /// Remove a previously registered listener. Returns false if the handle
    /// was already removed or never existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        for list in self.listeners.values_mut() {
            if let Some(pos) = list.iter().position(|(sub_id, _)| *sub_id == id) {
                list.remove(pos);
                return true;
            }
        }
        false
    }

    /// Invoke every listener registered for the event's kind, synchronously
    /// and in registration order. Listener panics propagate to the caller.
    pub fn emit(&mut self, event: &ClientEvent) {
        if let Some(list) = self.listeners.get_mut(&event.kind()) {
            for (_, callback) in list.iter_mut() {
                callback(event);
            }
        }
    }

    /// Update the current user and the derived authentication flag, then
    /// publish `UserChanged`. The only mutation path for user state.
    pub fn set_user(&mut self, user: Option<User>) {
        self.user = user.clone();
        self.is_authenticated = user.is_some();
        self.emit(&ClientEvent::UserChanged(user));
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn test_user(name: &str) -> User {
        User {
            username: name.to_string(),
            email: None,
        }
    }

    #[test]
    fn test_listeners_run_in_registration_order() {
        let mut state = ClientState::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for i in 0..3 {
            let seen = Arc::clone(&seen);
            state.subscribe(EventKind::AppReady, move |_| {
                seen.lock().unwrap().push(i);
            });
        }

        state.emit(&ClientEvent::AppReady);
        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2]);

        // A second emit invokes everyone again.
        state.emit(&ClientEvent::AppReady);
        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2, 0, 1, 2]);
    }

    #[test]
    fn test_emit_delivers_payload() {
        let mut state = ClientState::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_clone = Arc::clone(&seen);
        state.subscribe(EventKind::ThemeChanged, move |event| {
            if let ClientEvent::ThemeChanged(theme) = event {
                seen_clone.lock().unwrap().push(*theme);
            }
        });

        state.emit(&ClientEvent::ThemeChanged(Theme::Light));
        assert_eq!(*seen.lock().unwrap(), vec![Theme::Light]);
    }

    #[test]
    fn test_emit_without_listeners_is_noop() {
        let mut state = ClientState::new();
        state.emit(&ClientEvent::AppReady);
    }

    #[test]
    fn test_set_user_updates_flag_and_emits() {
        let mut state = ClientState::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_clone = Arc::clone(&seen);
        state.subscribe(EventKind::UserChanged, move |event| {
            if let ClientEvent::UserChanged(user) = event {
                seen_clone.lock().unwrap().push(user.clone());
            }
        });

        state.set_user(Some(test_user("alice")));
        assert_eq!(state.user().map(|u| u.username.as_str()), Some("alice"));
        assert!(state.is_authenticated());

        state.set_user(None);
        assert!(state.user().is_none());
        assert!(!state.is_authenticated());

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].as_ref().map(|u| u.username.as_str()), Some("alice"));
        assert!(seen[1].is_none());
    }

    #[test]
    fn test_unsubscribe_removes_only_target() {
        let mut state = ClientState::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let first = {
            let seen = Arc::clone(&seen);
            state.subscribe(EventKind::AppReady, move |_| seen.lock().unwrap().push("first"))
        };
        {
            let seen = Arc::clone(&seen);
            state.subscribe(EventKind::AppReady, move |_| seen.lock().unwrap().push("second"));
        }

        assert!(state.unsubscribe(first));
        assert!(!state.unsubscribe(first));

        state.emit(&ClientEvent::AppReady);
        assert_eq!(*seen.lock().unwrap(), vec!["second"]);
    }

    #[test]
    fn test_theme_parse_and_toggle() {
        assert_eq!(Theme::from_str("light"), Theme::Light);
        assert_eq!(Theme::from_str("dark"), Theme::Dark);
        assert_eq!(Theme::from_str("garbage"), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.toggled().as_str(), "dark");
    }
}
