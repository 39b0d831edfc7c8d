//! The in-memory record of who is signed in.
//!
//! [`SessionStore`] is the only place the session is mutated. Views read
//! snapshots and react to [`SessionEvent`]s delivered through
//! [`SessionStore::subscribe`].

use std::fmt;
use std::sync::{Mutex, PoisonError, RwLock};

use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use serde::{Deserialize, Serialize};

/// Identity returned by the profile endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub email: String,
    #[serde(default)]
    pub username: String,
}

impl User {
    /// Name to greet the user with.
    pub fn display_name(&self) -> &str {
        if self.username.is_empty() {
            &self.email
        } else {
            &self.username
        }
    }
}

/// Client-side view of the current authentication.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    identity: Option<User>,
}

impl Session {
    pub fn identity(&self) -> Option<&User> {
        self.identity.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignOutReason {
    /// The user asked to log out.
    UserRequested,
    /// The credential could not be renewed.
    SessionExpired,
}

/// Where the view layer should go after a session change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Home,
    Login,
    TaskList,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Interactive login succeeded.
    SignedIn(User),
    /// An existing session was picked up on page load.
    Resumed(User),
    SignedOut { reason: SignOutReason },
}

impl SessionEvent {
    /// The view to navigate to, if the event calls for navigation at all.
    pub fn destination(&self) -> Option<Destination> {
        match self {
            SessionEvent::SignedIn(_) => Some(Destination::TaskList),
            SessionEvent::Resumed(_) => None,
            SessionEvent::SignedOut {
                reason: SignOutReason::UserRequested,
            } => Some(Destination::Home),
            SessionEvent::SignedOut {
                reason: SignOutReason::SessionExpired,
            } => Some(Destination::Login),
        }
    }
}

/// Owner of the current [`Session`].
#[derive(Default)]
pub struct SessionStore {
    session: RwLock<Session>,
    subscribers: Mutex<Vec<UnboundedSender<SessionEvent>>>,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("session", &self.snapshot())
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current session.
    pub fn snapshot(&self) -> Session {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.snapshot().identity
    }

    pub fn is_authenticated(&self) -> bool {
        self.snapshot().is_authenticated()
    }

    /// Marks `user` as signed in after an interactive login.
    pub fn sign_in(&self, user: User) {
        tracing::info!(user_id = user.id, "signed in");
        self.replace(Some(user.clone()));
        self.publish(SessionEvent::SignedIn(user));
    }

    /// Marks `user` as signed in after recovering an existing session.
    pub fn resume(&self, user: User) {
        tracing::debug!(user_id = user.id, "session resumed");
        self.replace(Some(user.clone()));
        self.publish(SessionEvent::Resumed(user));
    }

    /// Clears the session. Always publishes, so an expired credential on an
    /// anonymous page still sends the user to the login view.
    pub fn sign_out(&self, reason: SignOutReason) {
        tracing::info!(?reason, "signed out");
        self.replace(None);
        self.publish(SessionEvent::SignedOut { reason });
    }

    /// Stream of every change made after this call.
    pub fn subscribe(&self) -> UnboundedReceiver<SessionEvent> {
        let (sender, receiver) = mpsc::unbounded();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sender);
        receiver
    }

    fn replace(&self, identity: Option<User>) {
        let mut session = self
            .session
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        session.identity = identity;
    }

    fn publish(&self, event: SessionEvent) {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|sender| sender.unbounded_send(event.clone()).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> User {
        User {
            id: 1,
            email: "a@b.com".to_string(),
            username: "alice".to_string(),
        }
    }

    #[test]
    fn can_start_unauthenticated() {
        let store = SessionStore::new();

        assert!(!store.is_authenticated());
        assert_eq!(store.snapshot(), Session::default());
    }

    #[test]
    fn can_sign_in_and_notify_subscribers() {
        let store = SessionStore::new();
        let mut events = store.subscribe();

        store.sign_in(alice());

        assert_eq!(store.current_user(), Some(alice()));
        let event = events.try_next().unwrap().unwrap();
        assert_eq!(event, SessionEvent::SignedIn(alice()));
        assert_eq!(event.destination(), Some(Destination::TaskList));
    }

    #[test]
    fn can_resume_without_navigation() {
        let store = SessionStore::new();
        let mut events = store.subscribe();

        store.resume(alice());

        assert!(store.is_authenticated());
        let event = events.try_next().unwrap().unwrap();
        assert_eq!(event.destination(), None);
    }

    #[test]
    fn can_send_expired_session_to_login() {
        let store = SessionStore::new();
        store.sign_in(alice());
        let mut events = store.subscribe();

        store.sign_out(SignOutReason::SessionExpired);

        assert!(!store.is_authenticated());
        let event = events.try_next().unwrap().unwrap();
        assert_eq!(event.destination(), Some(Destination::Login));
    }

    #[test]
    fn can_send_user_logout_home() {
        let event = SessionEvent::SignedOut {
            reason: SignOutReason::UserRequested,
        };

        assert_eq!(event.destination(), Some(Destination::Home));
    }

    #[test]
    fn can_drop_closed_subscribers() {
        let store = SessionStore::new();
        let events = store.subscribe();
        drop(events);

        store.sign_in(alice());

        assert!(store.subscribers.lock().unwrap().is_empty());
    }

    #[test]
    fn can_fall_back_to_email_for_display_name() {
        let mut user = alice();
        user.username.clear();

        assert_eq!(user.display_name(), "a@b.com");
    }
}
