use axum::{extract::State, response::Response};
use axum_extra::extract::SignedCookieJar;

use super::found;
use crate::{server::AppState, session::Session, utils};

/// Starts a login attempt.
///
/// Every call replaces the session's state nonce, so only the most recent
/// attempt can complete.
pub async fn login(
    State(state): State<AppState>,
    mut session: Session,
) -> (SignedCookieJar, Response) {
    let nonce = utils::generate_state();
    let authorize_url = state.spotify.authorize_url(&nonce);
    session.record_mut().state = Some(nonce);

    tracing::debug!(
        fresh_session = session.is_fresh(),
        "redirecting to Spotify authorization"
    );

    (session.commit().await, found(authorize_url.as_str()))
}
