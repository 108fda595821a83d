use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use super::{ACCESS_TOKEN_ERROR_REDIRECT, STATE_MISMATCH_REDIRECT, found};
use crate::{spotify::SpotifyError, types::ErrorBody};

/// Every way a request can fail. Each variant is terminal for its request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Callback state missing or not the one stored for this session.
    #[error("state mismatch")]
    StateMismatch,

    /// Spotify redirected back without a usable authorization code.
    #[error("authorization not granted: {0}")]
    AuthorizationDenied(String),

    #[error("authorization code exchange failed: {0}")]
    AccessToken(#[source] SpotifyError),

    #[error("no refresh token in session")]
    MissingRefreshToken,

    #[error("no tokens in session")]
    MissingTokens,

    #[error("access token refresh failed: {0}")]
    Refresh(#[source] SpotifyError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::StateMismatch => {
                tracing::warn!("rejecting callback with missing or mismatched state");
                found(STATE_MISMATCH_REDIRECT)
            }
            ApiError::AuthorizationDenied(ref reason) => {
                tracing::warn!(reason = %reason, "authorization not granted");
                found(ACCESS_TOKEN_ERROR_REDIRECT)
            }
            ApiError::AccessToken(ref e) => {
                tracing::error!(error = %e, "authorization code exchange failed");
                found(ACCESS_TOKEN_ERROR_REDIRECT)
            }
            ApiError::MissingRefreshToken => (
                StatusCode::BAD_REQUEST,
                "No refresh token found in session. Log in again via /login.",
            )
                .into_response(),
            ApiError::MissingTokens => (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    error: "Access token or refresh token not found in session".to_string(),
                }),
            )
                .into_response(),
            ApiError::Refresh(ref e) => {
                tracing::error!(error = %e, "access token refresh failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to refresh access token",
                )
                    .into_response()
            }
        }
    }
}
