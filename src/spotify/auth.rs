use reqwest::{Client, StatusCode, header::AUTHORIZATION};
use thiserror::Error;
use url::Url;

use crate::{
    config::Config,
    types::{RefreshedToken, TokenPair, TokenResponse},
    utils,
};

/// Failure of a call to Spotify's token endpoint.
#[derive(Debug, Error)]
pub enum SpotifyError {
    /// Network failure or a body that could not be decoded.
    #[error("request to token endpoint failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("token endpoint responded with {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("token response is missing `{0}`")]
    MissingField(&'static str),
}

/// Client for Spotify's authorization and token endpoints.
///
/// Every token request authenticates with HTTP Basic auth built from the
/// client id and secret. No timeout or retry is configured beyond the
/// defaults of the underlying HTTP client.
#[derive(Clone)]
pub struct SpotifyAuth {
    http: Client,
    client_id: String,
    basic_auth: String,
    redirect_uri: String,
    scope: String,
    auth_url: Url,
    token_url: Url,
}

impl SpotifyAuth {
    pub fn new(config: &Config) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(http: Client, config: &Config) -> Self {
        Self {
            http,
            client_id: config.client_id.clone(),
            basic_auth: utils::basic_auth_header(&config.client_id, &config.client_secret),
            redirect_uri: config.redirect_uri.clone(),
            scope: config.scope.clone(),
            auth_url: config.auth_url.clone(),
            token_url: config.token_url.clone(),
        }
    }

    /// Builds the URL the browser is sent to for authorization.
    pub fn authorize_url(&self, state: &str) -> Url {
        let mut url = self.auth_url.clone();
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.client_id)
            .append_pair("scope", &self.scope)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("state", state);
        url
    }

    /// Exchanges an authorization code for an access/refresh token pair.
    ///
    /// # Errors
    ///
    /// Fails on network errors, non-2xx responses, undecodable bodies and
    /// responses lacking either token.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenPair, SpotifyError> {
        let token = self
            .request_token(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.redirect_uri.as_str()),
            ])
            .await?;

        let refresh_token = token
            .refresh_token
            .filter(|rt| !rt.is_empty())
            .ok_or(SpotifyError::MissingField("refresh_token"))?;

        Ok(TokenPair {
            access_token: token.access_token,
            refresh_token,
        })
    }

    /// Trades a refresh token for a new access token.
    ///
    /// The returned `refresh_token` is `Some` only when Spotify rotated it.
    pub async fn refresh(&self, refresh_token: &str) -> Result<RefreshedToken, SpotifyError> {
        let token = self
            .request_token(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .await?;

        Ok(RefreshedToken {
            access_token: token.access_token,
            refresh_token: token.refresh_token.filter(|rt| !rt.is_empty()),
        })
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Result<TokenResponse, SpotifyError> {
        let res = self
            .http
            .post(self.token_url.clone())
            .header(AUTHORIZATION, &self.basic_auth)
            .form(form)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(SpotifyError::Status { status, body });
        }

        let token: TokenResponse = res.json().await?;
        if token.access_token.is_empty() {
            return Err(SpotifyError::MissingField("access_token"));
        }

        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config() -> Config {
        Config::from_lookup(|key| match key {
            "SPOTIFY_CLIENT_ID" => Some("client-123".to_string()),
            "SPOTIFY_CLIENT_SECRET" => Some("secret-456".to_string()),
            _ => None,
        })
        .unwrap()
    }

    #[test]
    fn test_authorize_url_parameters() {
        let spotify = SpotifyAuth::new(&config());
        let url = spotify.authorize_url("nonce-abc");

        assert_eq!(url.host_str(), Some("accounts.spotify.com"));
        assert_eq!(url.path(), "/authorize");

        let params: HashMap<_, _> = url.query_pairs().into_owned().collect();
        assert_eq!(params["response_type"], "code");
        assert_eq!(params["client_id"], "client-123");
        assert_eq!(params["scope"], "user-read-private user-read-email");
        assert_eq!(params["redirect_uri"], "http://localhost:3000/callback");
        assert_eq!(params["state"], "nonce-abc");
    }

    #[test]
    fn test_authorize_url_is_encoded() {
        let spotify = SpotifyAuth::new(&config());
        let url = spotify.authorize_url("nonce");

        // Neither the scope's spaces nor the redirect URI leak into the query raw
        let query = url.query().unwrap();
        assert!(!query.contains(' '));
        assert!(!query.contains("http://"));
    }
}
