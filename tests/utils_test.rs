use base64::{Engine, engine::general_purpose::STANDARD};
use sporlauth::utils::*;

#[test]
fn test_generate_state() {
    let state = generate_state();

    // 32 random bytes, hex encoded
    assert_eq!(state.len(), 64);
    assert!(state.chars().all(|c| c.is_ascii_hexdigit()));

    // Two generated nonces should be different
    let state2 = generate_state();
    assert_ne!(state, state2);
}

#[test]
fn test_generate_session_id() {
    let id = generate_session_id();

    // 32 bytes base64url without padding
    assert_eq!(id.len(), 43);
    assert!(
        id.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    );
    assert_ne!(id, generate_session_id());
}

#[test]
fn test_basic_auth_header() {
    let header = basic_auth_header("my-client", "my-secret");

    assert!(header.starts_with("Basic "));
    let decoded = STANDARD.decode(&header["Basic ".len()..]).unwrap();
    assert_eq!(decoded, b"my-client:my-secret");
}

#[test]
fn test_basic_auth_header_known_value() {
    // RFC 7617 example
    assert_eq!(
        basic_auth_header("Aladdin", "open sesame"),
        "Basic QWxhZGRpbjpvcGVuIHNlc2FtZQ=="
    );
}

#[test]
fn test_constant_time_eq() {
    assert!(constant_time_eq("abc123", "abc123"));
    assert!(!constant_time_eq("abc123", "abc124"));
    assert!(!constant_time_eq("abc", "abc123"));
    assert!(!constant_time_eq("", "a"));
    assert!(constant_time_eq("", ""));
}
