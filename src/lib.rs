//! Spotify Authorization Server Library
//!
//! This library implements a small web server that walks a browser through
//! Spotify's OAuth2 authorization code flow. It generates and validates the
//! anti-forgery state nonce, exchanges the authorization code for an
//! access/refresh token pair, keeps both in a server-side session and refreshes
//! the access token on demand.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for login, callback, refresh and the landing page
//! - `config` - Configuration object loaded once from the environment
//! - `server` - Router assembly, shared state and the HTTP listener
//! - `session` - Typed server-side sessions carried by a signed cookie
//! - `spotify` - Client for Spotify's authorize and token endpoints
//! - `types` - Wire types exchanged with Spotify and the browser
//! - `utils` - Nonce, session id and credential helpers
//!
//! # Example
//!
//! ```
//! use sporlauth::{config, server};
//!
//! #[tokio::main]
//! async fn main() -> sporlauth::Res<()> {
//!     config::load_env();
//!     let config = config::Config::from_env()?;
//!     server::start_api_server(config).await
//! }
//! ```

pub mod api;
pub mod config;
pub mod server;
pub mod session;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used at the binary boundary where errors from configuration, binding and
/// serving are only reported, never matched on.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Listening on {}", addr);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only used for fatal startup errors where recovery is not possible; request
/// handling never calls this.
///
/// # Example
///
/// ```
/// error!("Invalid configuration: {}", e);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
