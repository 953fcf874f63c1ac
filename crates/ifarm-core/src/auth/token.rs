//! Access-token validity checks.
//!
//! Tokens are JWTs, but the client performs no signature verification: it
//! only inspects the structure and the embedded `exp` claim to decide
//! whether the token is worth sending. The server remains the authority.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

/// Lookahead window before expiry that counts as "expiring soon" (5 minutes).
pub const EXPIRY_LOOKAHEAD_SECS: i64 = 5 * 60;

#[derive(Deserialize)]
struct Claims {
    exp: i64,
}

/// Extracts the expiry claim from a token.
///
/// Returns `None` for anything malformed: wrong segment count, invalid
/// base64, invalid JSON, or a missing `exp` claim. Malformed tokens are
/// treated as invalid, never as an error.
pub fn token_expiry(token: &str) -> Option<DateTime<Utc>> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return None;
    }

    let payload = URL_SAFE_NO_PAD.decode(parts[1]).ok()?;
    let claims: Claims = serde_json::from_slice(&payload).ok()?;
    Utc.timestamp_opt(claims.exp, 0).single()
}

/// Whether the token is structurally sound and its expiry is strictly in
/// the future relative to `now`.
pub fn is_token_valid_at(token: &str, now: DateTime<Utc>) -> bool {
    match token_expiry(token) {
        Some(expiry) => expiry > now,
        None => false,
    }
}

/// [`is_token_valid_at`] against the current time.
pub fn is_token_valid(token: &str) -> bool {
    is_token_valid_at(token, Utc::now())
}

/// Whether the token expires within [`EXPIRY_LOOKAHEAD_SECS`] of `now`.
///
/// A token without a readable expiry counts as expiring so that callers
/// attempt a refresh rather than keep sending it.
pub fn is_expiring_soon_at(token: &str, now: DateTime<Utc>) -> bool {
    match token_expiry(token) {
        Some(expiry) => (expiry - now).num_seconds() < EXPIRY_LOOKAHEAD_SECS,
        None => true,
    }
}

/// [`is_expiring_soon_at`] against the current time.
pub fn is_expiring_soon(token: &str) -> bool {
    is_expiring_soon_at(token, Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    /// Builds an unsigned JWT-shaped token with the given exp claim.
    fn make_token(exp: i64) -> String {
        let header = URL_SAFE_NO_PAD.encode(b"{\"alg\":\"HS256\",\"typ\":\"JWT\"}");
        let payload = URL_SAFE_NO_PAD.encode(format!("{{\"exp\":{exp}}}").as_bytes());
        format!("{header}.{payload}.sig")
    }

    #[test]
    fn test_valid_token() {
        let now = Utc::now();
        let token = make_token((now + Duration::hours(1)).timestamp());
        assert!(is_token_valid_at(&token, now));
    }

    #[test]
    fn test_expired_token() {
        let now = Utc::now();
        let token = make_token((now - Duration::seconds(1)).timestamp());
        assert!(!is_token_valid_at(&token, now));
    }

    #[test]
    fn test_expiry_equal_to_now_is_invalid() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let token = make_token(now.timestamp());
        assert!(!is_token_valid_at(&token, now));
    }

    #[test]
    fn test_malformed_tokens_are_invalid() {
        let now = Utc::now();
        assert!(!is_token_valid_at("", now));
        assert!(!is_token_valid_at("onlyonesegment", now));
        assert!(!is_token_valid_at("two.segments", now));
        assert!(!is_token_valid_at("a.b.c.d", now));
        assert!(!is_token_valid_at("head.!!!notbase64!!!.sig", now));
        let bad_json = format!("h.{}.s", URL_SAFE_NO_PAD.encode(b"not json"));
        assert!(!is_token_valid_at(&bad_json, now));
        let no_exp = format!("h.{}.s", URL_SAFE_NO_PAD.encode(b"{\"sub\":\"alice\"}"));
        assert!(!is_token_valid_at(&no_exp, now));
    }

    #[test]
    fn test_expiring_soon_window() {
        let now = Utc::now();
        let in_two_minutes = make_token((now + Duration::minutes(2)).timestamp());
        let in_ten_minutes = make_token((now + Duration::minutes(10)).timestamp());
        assert!(is_expiring_soon_at(&in_two_minutes, now));
        assert!(!is_expiring_soon_at(&in_ten_minutes, now));
        // Unreadable expiry counts as expiring.
        assert!(is_expiring_soon_at("garbage", now));
    }
}
