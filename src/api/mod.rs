//! # API Module
//!
//! HTTP handlers of the authorization server.
//!
//! ## Endpoints
//!
//! | Route | Handler | Purpose |
//! |---|---|---|
//! | `/login` | [`login`] | store a fresh state nonce, redirect to Spotify |
//! | `/callback` | [`callback`] | check the state, exchange the code, store tokens |
//! | `/refresh_token` | [`refresh_token`] | trade the stored refresh token for a new access token |
//! | `/landingpage` | [`landing_page`] | show the tokens held by the session |
//! | `/health` | [`health`] | liveness and version |
//!
//! Failures are expressed as [`ApiError`]; the callback reports them to the
//! browser as a redirect to `/#error=<kind>` so a front end can read the
//! fragment, the JSON endpoints as 4xx/5xx responses.

mod callback;
mod error;
mod health;
mod landing;
mod login;
mod refresh;

use axum::{
    http::{StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
};

pub use callback::{CallbackParams, callback};
pub use error::ApiError;
pub use health::health;
pub use landing::landing_page;
pub use login::login;
pub use refresh::refresh_token;

pub const LOGIN_PATH: &str = "/login";
pub const CALLBACK_PATH: &str = "/callback";
pub const REFRESH_TOKEN_PATH: &str = "/refresh_token";
pub const LANDING_PAGE_PATH: &str = "/landingpage";
pub const HEALTH_PATH: &str = "/health";

pub const STATE_MISMATCH_REDIRECT: &str = "/#error=state_mismatch";
pub const ACCESS_TOKEN_ERROR_REDIRECT: &str = "/#error=access_token_error";

/// `302 Found` to `location`.
pub(crate) fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location.to_string())]).into_response()
}
