use serde::{Deserialize, Serialize};

/// Body returned by Spotify's token endpoint.
///
/// Only `access_token` is guaranteed; a refresh response may omit
/// `refresh_token` when the provider does not rotate it.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Tokens obtained by exchanging an authorization code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Tokens obtained by a refresh grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshedToken {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

/// Body of a successful `/refresh_token` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenBody {
    pub access_token: String,
}

/// Body of every JSON error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
