use std::{sync::Arc, time::Duration};

use axum::{Router, extract::FromRef, routing::get};
use axum_extra::extract::cookie::Key;
use tokio::signal;
use tower_http::trace::TraceLayer;

use crate::{
    Res, api,
    config::Config,
    session::{self, SessionStore},
    spotify::SpotifyAuth,
};

/// How often expired sessions are swept out of the store.
const REAPER_INTERVAL: Duration = Duration::from_secs(60);

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub spotify: Arc<SpotifyAuth>,
    pub sessions: Arc<SessionStore>,
    pub cookie_key: Key,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self::with_spotify(config, SpotifyAuth::new(config))
    }

    /// Like [`AppState::new`] but with a preconfigured Spotify client.
    pub fn with_spotify(config: &Config, spotify: SpotifyAuth) -> Self {
        let cookie_key = match &config.session_secret {
            Some(secret) => Key::from(secret.as_slice()),
            None => {
                tracing::warn!(
                    "SESSION_SECRET not set, using a random cookie key; sessions will not survive a restart"
                );
                Key::generate()
            }
        };

        Self {
            spotify: Arc::new(spotify),
            sessions: Arc::new(SessionStore::new(config.session_ttl)),
            cookie_key,
        }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

impl FromRef<AppState> for Arc<SessionStore> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.sessions)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(api::HEALTH_PATH, get(api::health))
        .route(api::LOGIN_PATH, get(api::login))
        .route(api::CALLBACK_PATH, get(api::callback))
        .route(api::REFRESH_TOKEN_PATH, get(api::refresh_token))
        .route(api::LANDING_PAGE_PATH, get(api::landing_page))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Binds `config.server_addr` and serves until Ctrl+C or SIGTERM.
pub async fn start_api_server(config: Config) -> Res<()> {
    let state = AppState::new(&config);
    let reaper = session::spawn_reaper(Arc::clone(&state.sessions), REAPER_INTERVAL);

    let listener = tokio::net::TcpListener::bind(config.server_addr).await?;
    tracing::info!(addr = %config.server_addr, "listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    reaper.abort();
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
