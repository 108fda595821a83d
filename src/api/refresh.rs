use axum::{Json, extract::State};
use axum_extra::extract::SignedCookieJar;

use super::ApiError;
use crate::{
    server::AppState,
    session::{Session, SessionRecord},
    spotify::SpotifyAuth,
    types::AccessTokenBody,
};

/// Replaces the session's access token using its refresh token.
///
/// Only invoked on demand; nothing refreshes tokens ahead of expiry.
pub async fn refresh_token(
    State(state): State<AppState>,
    mut session: Session,
) -> (SignedCookieJar, Result<Json<AccessTokenBody>, ApiError>) {
    let outcome = refresh_session(&state.spotify, session.record_mut()).await;
    (session.commit().await, outcome.map(Json))
}

async fn refresh_session(
    spotify: &SpotifyAuth,
    record: &mut SessionRecord,
) -> Result<AccessTokenBody, ApiError> {
    let current = record
        .refresh_token
        .as_deref()
        .ok_or(ApiError::MissingRefreshToken)?;

    let refreshed = spotify.refresh(current).await.map_err(ApiError::Refresh)?;

    // Spotify may or may not rotate the refresh token.
    if let Some(rotated) = refreshed.refresh_token {
        tracing::debug!("refresh token rotated");
        record.refresh_token = Some(rotated);
    }
    record.access_token = Some(refreshed.access_token.clone());

    Ok(AccessTokenBody {
        access_token: refreshed.access_token,
    })
}
