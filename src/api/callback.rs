use axum::{
    extract::{Query, State, rejection::QueryRejection},
    response::Response,
};
use axum_extra::extract::SignedCookieJar;
use serde::Deserialize;

use super::{ApiError, LANDING_PAGE_PATH, found};
use crate::{
    server::AppState,
    session::{Session, SessionRecord},
    spotify::SpotifyAuth,
    utils,
};

/// Query parameters Spotify appends to the redirect URI.
#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    /// Set instead of `code` when the user declined or the request was invalid.
    pub error: Option<String>,
}

pub async fn callback(
    State(state): State<AppState>,
    mut session: Session,
    query: Result<Query<CallbackParams>, QueryRejection>,
) -> (SignedCookieJar, Result<Response, ApiError>) {
    let params = match query {
        Ok(Query(params)) => Some(params),
        Err(rejection) => {
            tracing::warn!(%rejection, "unreadable callback query");
            None
        }
    };

    let outcome = complete_authorization(&state.spotify, session.record_mut(), params).await;
    if outcome.is_ok() {
        tracing::info!("authorization completed, tokens stored in session");
    }

    (
        session.commit().await,
        outcome.map(|()| found(LANDING_PAGE_PATH)),
    )
}

async fn complete_authorization(
    spotify: &SpotifyAuth,
    record: &mut SessionRecord,
    params: Option<CallbackParams>,
) -> Result<(), ApiError> {
    // The stored nonce is single-use whatever the outcome.
    let expected = record.state.take();

    let Some(params) = params else {
        return Err(ApiError::StateMismatch);
    };
    match (params.state.as_deref(), expected.as_deref()) {
        (Some(received), Some(expected)) if utils::constant_time_eq(received, expected) => {}
        _ => return Err(ApiError::StateMismatch),
    }

    if let Some(error) = params.error {
        return Err(ApiError::AuthorizationDenied(error));
    }
    let code = params
        .code
        .filter(|code| !code.is_empty())
        .ok_or_else(|| ApiError::AuthorizationDenied("missing authorization code".to_string()))?;

    let tokens = spotify
        .exchange_code(&code)
        .await
        .map_err(ApiError::AccessToken)?;

    record.access_token = Some(tokens.access_token);
    record.refresh_token = Some(tokens.refresh_token);
    Ok(())
}
