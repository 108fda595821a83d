use base64::{
    Engine,
    engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD},
};
use rand::Rng;
use subtle::ConstantTimeEq;

/// Number of random bytes behind an OAuth state nonce (256 bits).
pub const STATE_NONCE_BYTES: usize = 32;

/// Number of random bytes behind a session id (256 bits).
pub const SESSION_ID_BYTES: usize = 32;

/// Generates a fresh anti-forgery state nonce, hex encoded.
pub fn generate_state() -> String {
    let bytes: [u8; STATE_NONCE_BYTES] = rand::rng().random();
    hex::encode(bytes)
}

/// Generates an opaque, URL-safe session identifier.
pub fn generate_session_id() -> String {
    let bytes: [u8; SESSION_ID_BYTES] = rand::rng().random();
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Builds the value of an `Authorization` header for HTTP Basic auth.
pub fn basic_auth_header(client_id: &str, client_secret: &str) -> String {
    let credentials = STANDARD.encode(format!("{client_id}:{client_secret}"));
    format!("Basic {credentials}")
}

/// Compares two strings without short-circuiting on the first differing byte.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
