use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::warn;

/// Outcome of checking a stored admin token before opening the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCheck {
    /// No token stored; go to the login screen.
    LoginRequired,
    /// Token expired or unreadable; clear it and go to the login screen.
    Expired,
    Active,
}

impl SessionCheck {
    pub fn requires_login(self) -> bool {
        !matches!(self, SessionCheck::Active)
    }
}

#[derive(Debug, Deserialize)]
struct Claims {
    exp: Option<i64>,
}

/// Check the `exp` claim of a stored JWT against `now`.
///
/// Tokens that are not three dot-separated parts are passed through; the server remains the
/// authority on those.
pub fn check_admin_token(token: Option<&str>, now: DateTime<Utc>) -> SessionCheck {
    let Some(token) = token.filter(|token| !token.trim().is_empty()) else {
        return SessionCheck::LoginRequired;
    };

    let parts: Vec<&str> = token.split('.').collect();
    let [_, payload, _] = parts.as_slice() else {
        return SessionCheck::Active;
    };

    match decode_claims(payload) {
        Ok(Claims { exp: Some(exp) }) if now.timestamp() >= exp => SessionCheck::Expired,
        Ok(_) => SessionCheck::Active,
        Err(reason) => {
            warn!(%reason, "unable to read admin token");
            SessionCheck::Expired
        }
    }
}

fn decode_claims(payload: &str) -> Result<Claims, String> {
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|err| err.to_string())?;
    serde_json::from_slice(&bytes).map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn token_with(claims: &str) -> String {
        format!(
            "{}.{}.signature",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
            URL_SAFE_NO_PAD.encode(claims)
        )
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn missing_token_requires_login() {
        assert_eq!(check_admin_token(None, now()), SessionCheck::LoginRequired);
        assert_eq!(check_admin_token(Some("  "), now()), SessionCheck::LoginRequired);
    }

    #[test]
    fn token_past_expiry_is_expired() {
        let exp = now().timestamp() - 1;
        let token = token_with(&format!(r#"{{"sub":"admin","exp":{exp}}}"#));
        assert_eq!(check_admin_token(Some(&token), now()), SessionCheck::Expired);
    }

    #[test]
    fn token_expiring_exactly_now_is_expired() {
        let exp = now().timestamp();
        let token = token_with(&format!(r#"{{"exp":{exp}}}"#));
        assert!(check_admin_token(Some(&token), now()).requires_login());
    }

    #[test]
    fn token_before_expiry_is_active() {
        let exp = now().timestamp() + 3600;
        let token = token_with(&format!(r#"{{"exp":{exp}}}"#));
        assert_eq!(check_admin_token(Some(&token), now()), SessionCheck::Active);
    }

    #[test]
    fn unreadable_payload_is_treated_as_expired() {
        assert_eq!(
            check_admin_token(Some("head.!!notbase64!!.sig"), now()),
            SessionCheck::Expired
        );
    }

    #[test]
    fn opaque_tokens_are_passed_through() {
        assert_eq!(
            check_admin_token(Some("opaque-session-token"), now()),
            SessionCheck::Active
        );
    }
}
