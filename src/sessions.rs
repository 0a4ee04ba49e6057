use dashmap::DashMap;
use uuid::Uuid;

use crate::credentials::{CredentialStore, Session};

/// Per-client session table keyed by an opaque bearer token.
///
/// Each login gets its own entry, so one client's login or logout never
/// touches another client's session.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<Uuid, Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Authenticate a fresh session and register it under a new token.
    ///
    /// A client that logs in again passes its current token as `previous`;
    /// that entry is dropped once the new one is in place, so repeated
    /// logins do not grow the table. Tokens that are never passed back or
    /// logged out stay until the process exits.
    ///
    /// Returns `None` when the credentials do not match. Nothing is stored
    /// and `previous` stays valid.
    pub fn login(
        &self,
        credentials: &CredentialStore,
        username: &str,
        password: &str,
        previous: Option<&Uuid>,
    ) -> Option<Uuid> {
        let mut session = Session::new();
        if !session.authenticate(credentials, username, password) {
            return None;
        }

        let token = Uuid::new_v4();
        self.sessions.insert(token, session);
        if let Some(previous) = previous {
            self.sessions.remove(previous);
        }
        Some(token)
    }

    /// Session for a token; unknown tokens are anonymous
    pub fn get(&self, token: &Uuid) -> Session {
        self.sessions
            .get(token)
            .map(|s| s.value().clone())
            .unwrap_or_default()
    }

    /// Log the session out and forget its token. Returns the username that
    /// was logged in, if any.
    pub fn logout(&self, token: &Uuid) -> Option<String> {
        let (_, mut session) = self.sessions.remove(token)?;
        let username = session.username().map(str::to_string);
        session.logout();
        username
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> CredentialStore {
        CredentialStore::new([("admin", "password123"), ("user", "medi123")])
    }

    #[test]
    fn test_login_creates_isolated_sessions() {
        let store = SessionStore::new();
        let creds = credentials();

        let admin = store.login(&creds, "admin", "password123", None).unwrap();
        let user = store.login(&creds, "user", "medi123", None).unwrap();
        assert_ne!(admin, user);
        assert_eq!(store.len(), 2);

        assert_eq!(store.get(&admin).username(), Some("admin"));
        assert_eq!(store.get(&user).username(), Some("user"));

        assert_eq!(store.logout(&admin), Some("admin".to_string()));
        assert!(!store.get(&admin).logged_in());
        assert!(store.get(&user).logged_in());
    }

    #[test]
    fn test_failed_login_stores_nothing() {
        let store = SessionStore::new();
        assert!(store.login(&credentials(), "admin", "wrong", None).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_relogin_replaces_previous_token() {
        let store = SessionStore::new();
        let creds = credentials();

        let first = store.login(&creds, "admin", "password123", None).unwrap();
        let second = store
            .login(&creds, "user", "medi123", Some(&first))
            .unwrap();

        assert_eq!(store.len(), 1);
        assert!(!store.get(&first).logged_in());
        assert_eq!(store.get(&second).username(), Some("user"));
    }

    #[test]
    fn test_failed_relogin_keeps_previous_token() {
        let store = SessionStore::new();
        let creds = credentials();

        let token = store.login(&creds, "admin", "password123", None).unwrap();
        assert!(store.login(&creds, "admin", "wrong", Some(&token)).is_none());

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&token).username(), Some("admin"));
    }

    #[test]
    fn test_unknown_token_is_anonymous() {
        let store = SessionStore::new();
        let token = Uuid::new_v4();
        assert_eq!(store.get(&token), Session::Anonymous);
        assert_eq!(store.logout(&token), None);
    }
}
