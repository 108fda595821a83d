//! # Session Module
//!
//! Server-side sessions keyed by an opaque id that travels in a signed cookie.
//!
//! - [`SessionRecord`] - the typed per-browser record (`state`, `access_token`,
//!   `refresh_token`)
//! - [`SessionStore`] - in-memory storage with an idle timeout
//! - [`Session`] - axum extractor that resolves the cookie to a record and
//!   writes it back with [`Session::commit`]
//!
//! Concurrent requests from the same browser are not serialized: the last
//! commit wins.

mod extract;
mod store;

use serde::{Deserialize, Serialize};

use crate::{types::TokenPair, utils};

pub use extract::{SESSION_COOKIE, Session};
pub use store::{SessionStore, spawn_reaper};

/// Opaque session identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn generate() -> Self {
        Self(utils::generate_session_id())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Everything the server remembers about one browser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Anti-forgery nonce of the login attempt in flight.
    pub state: Option<String>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl SessionRecord {
    pub fn is_empty(&self) -> bool {
        self.state.is_none() && self.access_token.is_none() && self.refresh_token.is_none()
    }

    /// Both tokens, if the session holds a complete pair.
    pub fn token_pair(&self) -> Option<TokenPair> {
        Some(TokenPair {
            access_token: self.access_token.clone()?,
            refresh_token: self.refresh_token.clone()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_record() {
        let record = SessionRecord::default();
        assert!(record.is_empty());
        assert!(record.token_pair().is_none());
    }

    #[test]
    fn test_token_pair_requires_both() {
        let mut record = SessionRecord {
            access_token: Some("AT1".into()),
            ..Default::default()
        };
        assert!(!record.is_empty());
        assert!(record.token_pair().is_none());

        record.refresh_token = Some("RT1".into());
        assert_eq!(
            record.token_pair(),
            Some(TokenPair {
                access_token: "AT1".into(),
                refresh_token: "RT1".into(),
            })
        );
    }
}
