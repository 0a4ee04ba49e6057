//! Credential gate: static credential table and per-user session state.

use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::config::UserConfig;

/// Username to password table, fixed for the lifetime of the process.
///
/// Passwords are stored and compared as plaintext.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    users: HashMap<String, String>,
}

impl CredentialStore {
    pub fn new<I, U, P>(entries: I) -> Self
    where
        I: IntoIterator<Item = (U, P)>,
        U: Into<String>,
        P: Into<String>,
    {
        Self {
            users: entries
                .into_iter()
                .map(|(u, p)| (u.into(), p.into()))
                .collect(),
        }
    }

    pub fn from_users(users: &[UserConfig]) -> Self {
        Self::new(users.iter().map(|u| (u.username.clone(), u.password.clone())))
    }

    /// Exact, case-sensitive match of both username and password
    pub fn verify(&self, username: &str, password: &str) -> bool {
        self.users
            .get(username)
            .is_some_and(|stored| stored == password)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    Anonymous,
    Authenticated,
}

/// Login state of one user session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated {
        username: String,
    },
}

impl Session {
    pub fn new() -> Self {
        Self::Anonymous
    }

    pub fn state(&self) -> SessionState {
        match self {
            Session::Anonymous => SessionState::Anonymous,
            Session::Authenticated { .. } => SessionState::Authenticated,
        }
    }

    pub fn logged_in(&self) -> bool {
        matches!(self, Session::Authenticated { .. })
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            Session::Anonymous => None,
            Session::Authenticated { username } => Some(username),
        }
    }

    /// Check the credentials and log the session in on success.
    ///
    /// A failed attempt leaves the session exactly as it was.
    pub fn authenticate(&mut self, store: &CredentialStore, username: &str, password: &str) -> bool {
        if !store.verify(username, password) {
            warn!(username = %username, "Invalid username or password");
            return false;
        }

        info!(username = %username, "User logged in");
        *self = Session::Authenticated {
            username: username.to_string(),
        };
        true
    }

    pub fn logout(&mut self) {
        if let Some(username) = self.username() {
            debug!(username = %username, "User logged out");
        }
        *self = Session::Anonymous;
    }
}

/// Serializable view of a session, as reported to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    pub logged_in: bool,
    pub username: Option<String>,
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        Self {
            logged_in: session.logged_in(),
            username: session.username().map(str::to_string),
        }
    }
}
