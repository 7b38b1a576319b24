//! Bearer credential extraction.
//!
//! Callers pass a cookie-like string (`a=1; token=<jwt>; b=2`). Only the
//! `token` segment matters; nothing here checks signatures or expiry.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use glyphgate_common::GatewayError;

/// Pull `<value>` out of a `token=<value>` segment.
///
/// The segment ends at `;` or end of string. Empty values count as missing.
pub fn extract_token(cookie: &str) -> Result<String, GatewayError> {
    cookie
        .split(';')
        .filter_map(|segment| segment.trim().strip_prefix("token="))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or(GatewayError::MissingCredential)
}

#[derive(Deserialize)]
struct TokenClaims {
    exp: Option<f64>,
}

/// Expiry advertised by the token's own payload segment.
///
/// Informational only: the payload is decoded without verification and
/// `None` is returned for anything that is not a three-part token with a
/// numeric `exp`.
pub fn token_expiry(token: &str) -> Option<DateTime<Utc>> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: TokenClaims = serde_json::from_slice(&bytes).ok()?;
    DateTime::from_timestamp(claims.exp? as i64, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_token(payload: &str) -> String {
        format!("eyJhbGciOiJIUzI1NiJ9.{}.sig", URL_SAFE_NO_PAD.encode(payload))
    }

    #[test]
    fn test_extract_token_between_segments() {
        let token = extract_token("lang=zh; token=abc.def.ghi; theme=dark").unwrap();
        assert_eq!(token, "abc.def.ghi");
    }

    #[test]
    fn test_extract_token_at_end() {
        assert_eq!(extract_token("a=1;token=xyz").unwrap(), "xyz");
        assert_eq!(extract_token("token=only").unwrap(), "only");
    }

    #[test]
    fn test_extract_token_ignores_lookalike_keys() {
        let err = extract_token("csrftoken=nope; refresh_token=nope").unwrap_err();
        assert!(matches!(err, GatewayError::MissingCredential));
    }

    #[test]
    fn test_extract_token_missing_or_empty() {
        assert!(matches!(
            extract_token(""),
            Err(GatewayError::MissingCredential)
        ));
        assert!(matches!(
            extract_token("token=; other=1"),
            Err(GatewayError::MissingCredential)
        ));
    }

    #[test]
    fn test_token_expiry_reads_exp() {
        let token = make_token(r#"{"id":"u1","exp":1735689600}"#);
        let expiry = token_expiry(&token).unwrap();
        assert_eq!(expiry.timestamp(), 1_735_689_600);
    }

    #[test]
    fn test_token_expiry_tolerates_padding() {
        let payload = base64::engine::general_purpose::URL_SAFE.encode(r#"{"exp":10}"#);
        assert!(payload.ends_with("=="));
        let token = format!("h.{}.s", payload);
        assert_eq!(token_expiry(&token).unwrap().timestamp(), 10);
    }

    #[test]
    fn test_token_expiry_opaque_token() {
        assert!(token_expiry("not-a-jwt").is_none());
        assert!(token_expiry("a.!!!.c").is_none());
        assert!(token_expiry(&make_token(r#"{"sub":"x"}"#)).is_none());
    }
}
