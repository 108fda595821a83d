//! # Spotify Integration Module
//!
//! Thin client for the two Spotify Accounts endpoints this server talks to:
//!
//! - `GET /authorize` - the browser is redirected there to grant access
//! - `POST /api/token` - authorization codes and refresh tokens are traded
//!   for access tokens, server to server, authenticated with the client secret
//!
//! The consuming Web API (search, playback, ...) is not wrapped here.

pub mod auth;

pub use auth::{SpotifyAuth, SpotifyError};
