//! Configuration management for the authorization server.
//!
//! Configuration is read from environment variables (optionally seeded from a
//! `.env` file in the working directory) exactly once at startup and turned
//! into a [`Config`] value. The server state owns that value; request handlers
//! never look at the process environment.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the working directory
//! 3. Application defaults (where applicable)

use std::{env, net::SocketAddr};

use chrono::Duration;
use thiserror::Error;
use url::Url;

/// Redirect URI registered with Spotify for this server.
pub const SPOTIFY_REDIRECT_URI: &str = "http://localhost:3000/callback";

/// Permissions requested during authorization.
pub const SPOTIFY_SCOPE: &str = "user-read-private user-read-email";

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:3000";
pub const DEFAULT_SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_SESSION_TTL_MINUTES: i64 = 60;

/// Minimum length of `SESSION_SECRET`, dictated by the cookie signing key.
pub const MIN_SESSION_SECRET_LEN: usize = 64;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Runtime configuration of the server.
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
    pub auth_url: Url,
    pub token_url: Url,
    pub server_addr: SocketAddr,
    /// Raw key material for signing the session cookie. `None` means a random
    /// key is generated per process.
    pub session_secret: Option<Vec<u8>>,
    pub session_ttl: Duration,
}

/// Loads environment variables from a `.env` file in the working directory.
///
/// A missing file is fine: variables may come from the real environment.
/// Returns `true` when a file was found and loaded.
pub fn load_env() -> bool {
    dotenv::dotenv().is_ok()
}

impl Config {
    /// Builds the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a required variable is missing or blank,
    /// or when an optional variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset.
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let client_id = get("SPOTIFY_CLIENT_ID").ok_or(ConfigError::Missing("SPOTIFY_CLIENT_ID"))?;
        let client_secret =
            get("SPOTIFY_CLIENT_SECRET").ok_or(ConfigError::Missing("SPOTIFY_CLIENT_SECRET"))?;

        let server_addr = get("SERVER_ADDRESS")
            .unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                var: "SERVER_ADDRESS",
                reason: e.to_string(),
            })?;

        let auth_url = parse_url(
            "SPOTIFY_API_AUTH_URL",
            get("SPOTIFY_API_AUTH_URL").as_deref(),
            DEFAULT_SPOTIFY_AUTH_URL,
        )?;
        let token_url = parse_url(
            "SPOTIFY_API_TOKEN_URL",
            get("SPOTIFY_API_TOKEN_URL").as_deref(),
            DEFAULT_SPOTIFY_TOKEN_URL,
        )?;

        let session_secret = match get("SESSION_SECRET") {
            Some(secret) if secret.len() < MIN_SESSION_SECRET_LEN => {
                return Err(ConfigError::Invalid {
                    var: "SESSION_SECRET",
                    reason: format!("must be at least {MIN_SESSION_SECRET_LEN} bytes"),
                });
            }
            Some(secret) => Some(secret.into_bytes()),
            None => None,
        };

        let session_ttl_minutes = match get("SESSION_TTL_MINUTES") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|minutes| *minutes > 0)
                .ok_or_else(|| ConfigError::Invalid {
                    var: "SESSION_TTL_MINUTES",
                    reason: format!("expected a positive number of minutes, got {raw:?}"),
                })?,
            None => DEFAULT_SESSION_TTL_MINUTES,
        };

        Ok(Self {
            client_id,
            client_secret,
            redirect_uri: SPOTIFY_REDIRECT_URI.to_string(),
            scope: SPOTIFY_SCOPE.to_string(),
            auth_url,
            token_url,
            server_addr,
            session_secret,
            session_ttl: Duration::minutes(session_ttl_minutes),
        })
    }
}

fn parse_url(var: &'static str, value: Option<&str>, default: &str) -> Result<Url, ConfigError> {
    Url::parse(value.unwrap_or(default)).map_err(|e| ConfigError::Invalid {
        var,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_with_only_credentials() {
        let config = Config::from_lookup(lookup(&[
            ("SPOTIFY_CLIENT_ID", "id"),
            ("SPOTIFY_CLIENT_SECRET", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.client_id, "id");
        assert_eq!(config.client_secret, "secret");
        assert_eq!(config.redirect_uri, "http://localhost:3000/callback");
        assert_eq!(config.scope, "user-read-private user-read-email");
        assert_eq!(config.server_addr.to_string(), "127.0.0.1:3000");
        assert_eq!(config.auth_url.as_str(), DEFAULT_SPOTIFY_AUTH_URL);
        assert_eq!(config.token_url.as_str(), DEFAULT_SPOTIFY_TOKEN_URL);
        assert!(config.session_secret.is_none());
        assert_eq!(config.session_ttl, Duration::minutes(60));
    }

    #[test]
    fn test_missing_client_id() {
        let err = Config::from_lookup(lookup(&[("SPOTIFY_CLIENT_SECRET", "secret")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("SPOTIFY_CLIENT_ID"));
    }

    #[test]
    fn test_blank_secret_is_missing() {
        let err = Config::from_lookup(lookup(&[
            ("SPOTIFY_CLIENT_ID", "id"),
            ("SPOTIFY_CLIENT_SECRET", "   "),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Missing("SPOTIFY_CLIENT_SECRET"));
    }

    #[test]
    fn test_short_session_secret_rejected() {
        let err = Config::from_lookup(lookup(&[
            ("SPOTIFY_CLIENT_ID", "id"),
            ("SPOTIFY_CLIENT_SECRET", "secret"),
            ("SESSION_SECRET", "too-short"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "SESSION_SECRET", .. }));
    }

    #[test]
    fn test_overrides() {
        let secret = "s".repeat(64);
        let config = Config::from_lookup(lookup(&[
            ("SPOTIFY_CLIENT_ID", "id"),
            ("SPOTIFY_CLIENT_SECRET", "secret"),
            ("SERVER_ADDRESS", "0.0.0.0:8080"),
            ("SPOTIFY_API_TOKEN_URL", "http://127.0.0.1:9999/api/token"),
            ("SESSION_SECRET", secret.as_str()),
            ("SESSION_TTL_MINUTES", "15"),
        ]))
        .unwrap();

        assert_eq!(config.server_addr.port(), 8080);
        assert_eq!(config.token_url.as_str(), "http://127.0.0.1:9999/api/token");
        assert_eq!(config.session_secret.as_deref(), Some(secret.as_bytes()));
        assert_eq!(config.session_ttl, Duration::minutes(15));
    }

    #[test]
    fn test_invalid_ttl() {
        let err = Config::from_lookup(lookup(&[
            ("SPOTIFY_CLIENT_ID", "id"),
            ("SPOTIFY_CLIENT_SECRET", "secret"),
            ("SESSION_TTL_MINUTES", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "SESSION_TTL_MINUTES", .. }));
    }
}
