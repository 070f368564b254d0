//! Session validity.
//!
//! The API issues a JWT on login. The client never verifies the signature (it
//! has no key); it only reads the payload to learn who is logged in and when
//! the token stops being accepted. That reading happens in exactly one place,
//! [`JwtExpiry`], behind the [`SessionValidator`] trait the routing guard uses.

use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::{EngineError, ResultEngine};

/// Claims carried by the login token that the client cares about.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Claims {
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
    #[serde(default, alias = "_id", alias = "userId")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    /// Account creation time as sent by the server (ISO 8601).
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<String>,
}

impl Claims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Expired once `now` is strictly past `exp`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp.saturating_mul(1000) < now.timestamp_millis()
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().filter(|n| !n.is_empty()).unwrap_or("User")
    }

    /// Uppercased first letter of the name, `U` when unnamed.
    pub fn initial(&self) -> char {
        self.name
            .as_deref()
            .and_then(|n| n.chars().next())
            .map(|c| c.to_uppercase().next().unwrap_or(c))
            .unwrap_or('U')
    }

    pub fn role_label(&self) -> &str {
        self.role.as_deref().filter(|r| !r.is_empty()).unwrap_or("User")
    }

    /// Calendar date of `createdAt`, when it parses.
    pub fn joined_on(&self) -> Option<chrono::NaiveDate> {
        let raw = self.created_at.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.date_naive())
            .ok()
            .or_else(|| chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
    }
}

/// Decides whether a stored token may still be used.
pub trait SessionValidator {
    /// Returns the token's claims if it is well formed and unexpired at `now`.
    fn validate(&self, token: &str, now: DateTime<Utc>) -> ResultEngine<Claims>;
}

/// Reads the JWT payload and compares `exp` with the clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct JwtExpiry;

impl SessionValidator for JwtExpiry {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> ResultEngine<Claims> {
        let claims = decode_claims(token)?;
        if claims.is_expired_at(now) {
            return Err(EngineError::ExpiredToken);
        }
        Ok(claims)
    }
}

/// Decodes the payload segment of a JWT without checking its signature.
pub fn decode_claims(token: &str) -> ResultEngine<Claims> {
    let mut segments = token.trim().split('.');
    let payload = match (segments.next(), segments.next(), segments.next()) {
        (Some(_), Some(payload), Some(_)) if segments.next().is_none() => payload,
        _ => return Err(EngineError::InvalidToken("expected three segments".to_string())),
    };

    let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|err| EngineError::InvalidToken(format!("payload is not base64url: {err}")))?;

    serde_json::from_slice(&bytes)
        .map_err(|err| EngineError::InvalidToken(format!("payload is not valid claims: {err}")))
}

#[cfg(test)]
pub(crate) mod test_support {
    use base64::Engine as _;

    /// Builds an unsigned token around `payload` (a JSON object).
    pub fn token_with(payload: &str) -> String {
        let enc = |s: &str| base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(s);
        format!(
            "{}.{}.{}",
            enc(r#"{"alg":"HS256","typ":"JWT"}"#),
            enc(payload),
            enc("signature")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::token_with;
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn valid_token_yields_claims() {
        let token = token_with(
            r#"{"id":"u1","name":"asha","email":"a@b.co","exp":2000,"createdAt":"2024-01-02T10:00:00Z"}"#,
        );
        let claims = JwtExpiry.validate(&token, at(1000)).unwrap();
        assert_eq!(claims.id.as_deref(), Some("u1"));
        assert_eq!(claims.initial(), 'A');
        assert_eq!(claims.role_label(), "User");
        assert_eq!(
            claims.joined_on(),
            chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
        );
    }

    #[test]
    fn expiry_is_strict() {
        let token = token_with(r#"{"exp":2000}"#);
        assert!(JwtExpiry.validate(&token, at(2000)).is_ok());
        assert_eq!(
            JwtExpiry.validate(&token, at(2001)),
            Err(EngineError::ExpiredToken)
        );
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        for token in ["", "abc", "a.b", "a.b.c.d", "a.!!!.c"] {
            assert!(matches!(
                decode_claims(token),
                Err(EngineError::InvalidToken(_))
            ));
        }
        // Well-formed but missing `exp`.
        assert!(decode_claims(&token_with(r#"{"name":"x"}"#)).is_err());
    }

    #[test]
    fn padded_payload_is_accepted() {
        let token = token_with(r#"{"exp":1}"#);
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        parts[1].push_str("==");
        assert_eq!(decode_claims(&parts.join(".")).unwrap().exp, 1);
    }

    #[test]
    fn profile_fallbacks() {
        let claims = decode_claims(&token_with(r#"{"exp":1,"name":""}"#)).unwrap();
        assert_eq!(claims.display_name(), "User");
        assert_eq!(claims.initial(), 'U');
        assert!(claims.joined_on().is_none());
    }
}
