use chrono::{DateTime, Utc};
use engine::{
    EngineError,
    session::{Claims, SessionValidator},
};
use tokio::sync::watch;

pub const SESSION_EXPIRED: &str = "Session expired. Please log in again.";

/// A bearer token together with the claims decoded from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub claims: Claims,
}

/// Owner of the current session.
///
/// Every sign-in and sign-out goes through here; observers hold a
/// [`watch::Receiver`] from [`SessionStore::subscribe`].
#[derive(Debug)]
pub struct SessionStore {
    tx: watch::Sender<Option<Session>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// Validates `token` and makes it the current session.
    pub fn sign_in(
        &self,
        token: String,
        validator: &dyn SessionValidator,
        now: DateTime<Utc>,
    ) -> Result<Session, EngineError> {
        let claims = validator.validate(&token, now)?;
        let session = Session { token, claims };
        tracing::info!(user = session.claims.id.as_deref().unwrap_or("-"), "signed in");
        self.tx.send_replace(Some(session.clone()));
        Ok(session)
    }

    /// Clears the session. Returns whether one was active.
    pub fn sign_out(&self) -> bool {
        let was_active = self.tx.send_replace(None).is_some();
        if was_active {
            tracing::info!("signed out");
        }
        was_active
    }

    pub fn current(&self) -> Option<Session> {
        self.tx.borrow().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.tx.borrow().as_ref().map(|s| s.token.clone())
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.tx.subscribe()
    }
}

/// Outcome of the routing guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Granted(Session),
    /// No session, or the one held was rejected and has been cleared.
    Denied(Option<EngineError>),
}

/// Checks the current session before a protected section or an entry call.
///
/// An expired or malformed token signs the user out.
pub fn guard(store: &SessionStore, validator: &dyn SessionValidator, now: DateTime<Utc>) -> Access {
    let Some(session) = store.current() else {
        return Access::Denied(None);
    };
    match validator.validate(&session.token, now) {
        Ok(_) => Access::Granted(session),
        Err(err) => {
            tracing::warn!(%err, "session rejected by guard");
            store.sign_out();
            Access::Denied(Some(err))
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use base64::Engine as _;

    pub fn token_expiring_at(exp: i64) -> String {
        let enc = |s: &str| base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(s);
        let payload = format!(
            r#"{{"exp":{exp},"id":"u1","name":"asha","email":"asha@example.com","createdAt":"2024-02-01T10:00:00Z"}}"#
        );
        format!("{}.{}.{}", enc(r#"{"alg":"HS256"}"#), enc(&payload), enc("sig"))
    }
}

#[cfg(test)]
mod tests {
    use engine::session::JwtExpiry;

    use super::test_support::token_expiring_at;
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn sign_in_notifies_subscribers() {
        let store = SessionStore::new();
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        let session = store
            .sign_in(token_expiring_at(2_000), &JwtExpiry, at(1_000))
            .unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().as_ref(), Some(&session));
        assert_eq!(session.claims.id.as_deref(), Some("u1"));

        assert!(store.sign_out());
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_none());
        assert!(!store.sign_out());
    }

    #[test]
    fn expired_token_is_not_signed_in() {
        let store = SessionStore::new();
        let err = store
            .sign_in(token_expiring_at(1_000), &JwtExpiry, at(2_000))
            .unwrap_err();
        assert_eq!(err, EngineError::ExpiredToken);
        assert!(store.current().is_none());
    }

    #[test]
    fn guard_grants_live_session() {
        let store = SessionStore::new();
        store
            .sign_in(token_expiring_at(2_000), &JwtExpiry, at(1_000))
            .unwrap();
        assert!(matches!(guard(&store, &JwtExpiry, at(1_500)), Access::Granted(_)));
        assert!(store.token().is_some());
    }

    #[test]
    fn guard_signs_out_once_expired() {
        let store = SessionStore::new();
        store
            .sign_in(token_expiring_at(2_000), &JwtExpiry, at(1_000))
            .unwrap();
        let rx = store.subscribe();

        let access = guard(&store, &JwtExpiry, at(2_001));
        assert_eq!(access, Access::Denied(Some(EngineError::ExpiredToken)));
        assert!(store.current().is_none());
        assert!(rx.has_changed().unwrap());
    }

    #[test]
    fn guard_without_session_is_denied() {
        let store = SessionStore::new();
        assert_eq!(guard(&store, &JwtExpiry, at(0)), Access::Denied(None));
    }
}
