//! Explicit login session.
//!
//! A [`Session`] owns the current bearer token and the store it is persisted
//! in. Expiry is checked every time a token is handed out and again by a
//! periodic verification cycle; either check logs the operator out once the
//! token is stale.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use mockable::Clock;
use tracing::{info, warn};

use super::error::SESSION_EXPIRED_MESSAGE;
use super::ports::{TokenStore, TokenStoreError};
use super::{AuthToken, Error, UserInfo};

/// Interval between two session verification cycles.
pub const SESSION_VERIFY_INTERVAL: Duration = Duration::from_secs(60);

const LOGIN_REQUIRED_MESSAGE: &str = "Debe iniciar sesión para continuar";

/// Outcome of a session check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    /// Nobody is logged in.
    Anonymous,
    /// A valid token is held for this user.
    Active(UserInfo),
    /// The held token expired and the session was closed.
    Expired,
}

/// Login session shared by every authenticated service.
pub struct Session {
    store: Arc<dyn TokenStore>,
    clock: Arc<dyn Clock>,
    current: Mutex<Option<AuthToken>>,
}

impl Session {
    /// Create an anonymous session backed by `store`.
    pub fn new(store: Arc<dyn TokenStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            current: Mutex::new(None),
        }
    }

    fn lock_current(&self) -> MutexGuard<'_, Option<AuthToken>> {
        match self.current.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn map_store_error(error: TokenStoreError) -> Error {
        Error::internal(format!("token store failed: {error}"))
    }

    /// Reload a previously persisted token.
    ///
    /// Tokens that cannot be decoded or have already expired are removed from
    /// the store.
    pub async fn restore(&self) -> Result<SessionStatus, Error> {
        let Some(raw) = self.store.load().await.map_err(Self::map_store_error)? else {
            return Ok(SessionStatus::Anonymous);
        };

        let token = match AuthToken::decode(&raw) {
            Ok(token) => token,
            Err(error) => {
                warn!(%error, "discarding unreadable stored token");
                self.store.clear().await.map_err(Self::map_store_error)?;
                return Ok(SessionStatus::Anonymous);
            }
        };

        if token.is_expired_at(self.clock.utc()) {
            info!(user_id = token.user().user_id, "stored token has expired");
            self.store.clear().await.map_err(Self::map_store_error)?;
            return Ok(SessionStatus::Expired);
        }

        let user = token.user().clone();
        *self.lock_current() = Some(token);
        Ok(SessionStatus::Active(user))
    }

    /// Adopt a freshly issued token and persist it.
    pub async fn establish(&self, raw: &str) -> Result<UserInfo, Error> {
        let token = AuthToken::decode(raw).map_err(|error| {
            Error::internal(format!("el servidor devolvió un token inválido: {error}"))
        })?;
        if token.is_expired_at(self.clock.utc()) {
            return Err(Error::unauthorized(SESSION_EXPIRED_MESSAGE));
        }
        self.store
            .save(token.as_str())
            .await
            .map_err(Self::map_store_error)?;

        let user = token.user().clone();
        info!(user_id = user.user_id, rol = %user.rol, "session established");
        *self.lock_current() = Some(token);
        Ok(user)
    }

    /// Forget the current token, in memory and on disk.
    pub async fn logout(&self) -> Result<(), Error> {
        let previous = self.lock_current().take();
        if let Some(token) = previous {
            info!(user_id = token.user().user_id, "session closed");
        }
        self.store.clear().await.map_err(Self::map_store_error)
    }

    /// Identity of the logged-in operator, without an expiry check.
    pub fn current_user(&self) -> Option<UserInfo> {
        self.lock_current().as_ref().map(|token| token.user().clone())
    }

    /// Check the held token, logging out when it has expired.
    pub async fn verify(&self) -> Result<SessionStatus, Error> {
        let now = self.clock.utc();
        let status = match self.lock_current().as_ref() {
            None => SessionStatus::Anonymous,
            Some(token) if token.is_expired_at(now) => SessionStatus::Expired,
            Some(token) => SessionStatus::Active(token.user().clone()),
        };
        if status == SessionStatus::Expired {
            info!("session expired during verification");
            self.logout().await?;
        }
        Ok(status)
    }

    /// Token for an authenticated request.
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::ErrorCode::Unauthorized`] when nobody is
    /// logged in or the token has expired; in the latter case the session is
    /// closed first.
    pub async fn bearer(&self) -> Result<AuthToken, Error> {
        match self.verify().await? {
            SessionStatus::Active(_) => self
                .lock_current()
                .clone()
                .ok_or_else(|| Error::unauthorized(LOGIN_REQUIRED_MESSAGE)),
            SessionStatus::Anonymous => Err(Error::unauthorized(LOGIN_REQUIRED_MESSAGE)),
            SessionStatus::Expired => Err(Error::unauthorized(SESSION_EXPIRED_MESSAGE)),
        }
    }

    /// Logged-in operator, or an unauthorized error.
    pub async fn require_user(&self) -> Result<UserInfo, Error> {
        self.bearer().await.map(|token| token.user().clone())
    }

    /// Run the verification cycle until the session is no longer active.
    ///
    /// The first check happens one full interval after the call.
    pub async fn watch(&self, interval: Duration) -> Result<SessionStatus, Error> {
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
        loop {
            ticker.tick().await;
            match self.verify().await? {
                SessionStatus::Active(_) => continue,
                ended => return Ok(ended),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockTokenStore;
    use crate::test_support::{MutableClock, unsigned_token as token};
    use chrono::{TimeZone, Utc};
    use rstest::{fixture, rstest};

    const NOW: i64 = 1_760_000_000;

    #[fixture]
    fn clock() -> Arc<MutableClock> {
        Arc::new(MutableClock::new(
            Utc.timestamp_opt(NOW, 0).single().expect("fixture instant"),
        ))
    }

    fn session(store: MockTokenStore, clock: &Arc<MutableClock>) -> Session {
        Session::new(Arc::new(store), clock.clone())
    }

    #[rstest]
    #[tokio::test]
    async fn restore_keeps_a_live_token(clock: Arc<MutableClock>) {
        let raw = token(3, "admin", NOW + 3_600);
        let mut store = MockTokenStore::new();
        store
            .expect_load()
            .times(1)
            .return_once(move || Ok(Some(raw)));
        store.expect_clear().never();

        let session = session(store, &clock);
        let status = session.restore().await.expect("restore succeeds");
        assert!(matches!(status, SessionStatus::Active(user) if user.user_id == 3));
    }

    #[rstest]
    #[case::expired(token(3, "admin", NOW - 1), SessionStatus::Expired)]
    #[case::garbage("not-a-token".to_owned(), SessionStatus::Anonymous)]
    #[tokio::test]
    async fn restore_discards_unusable_tokens(
        clock: Arc<MutableClock>,
        #[case] raw: String,
        #[case] expected: SessionStatus,
    ) {
        let mut store = MockTokenStore::new();
        store
            .expect_load()
            .times(1)
            .return_once(move || Ok(Some(raw)));
        store.expect_clear().times(1).return_once(|| Ok(()));

        let session = session(store, &clock);
        assert_eq!(session.restore().await.expect("restore succeeds"), expected);
        assert!(session.current_user().is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn bearer_logs_out_once_the_token_expires(clock: Arc<MutableClock>) {
        let raw = token(9, "user", NOW + 30);
        let mut store = MockTokenStore::new();
        store.expect_save().times(1).returning(|_| Ok(()));
        store.expect_clear().times(1).returning(|| Ok(()));

        let session = session(store, &clock);
        session.establish(&raw).await.expect("login succeeds");
        assert!(session.bearer().await.is_ok());

        clock.advance_seconds(31);
        let err = session.bearer().await.expect_err("expired token");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert!(session.current_user().is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn bearer_requires_login(clock: Arc<MutableClock>) {
        let session = session(MockTokenStore::new(), &clock);
        let err = session.bearer().await.expect_err("anonymous");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[tokio::test]
    async fn establish_rejects_already_expired_tokens(clock: Arc<MutableClock>) {
        let mut store = MockTokenStore::new();
        store.expect_save().never();
        let session = session(store, &clock);

        let err = session
            .establish(&token(1, "user", NOW - 10))
            .await
            .expect_err("stale token");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn watch_returns_after_the_cycle_that_sees_expiry(clock: Arc<MutableClock>) {
        let raw = token(5, "user", NOW + 90);
        let mut store = MockTokenStore::new();
        store.expect_save().times(1).returning(|_| Ok(()));
        store.expect_clear().times(1).returning(|| Ok(()));
        let session = Arc::new(session(store, &clock));
        session.establish(&raw).await.expect("login succeeds");

        let watcher = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.watch(SESSION_VERIFY_INTERVAL).await })
        };

        tokio::time::sleep(SESSION_VERIFY_INTERVAL).await;
        tokio::task::yield_now().await;
        assert!(!watcher.is_finished(), "first cycle sees a live token");

        clock.advance_seconds(120);
        tokio::time::sleep(SESSION_VERIFY_INTERVAL).await;
        let status = watcher
            .await
            .expect("watcher joins")
            .expect("verification succeeds");
        assert_eq!(status, SessionStatus::Expired);
        assert!(session.current_user().is_none());
    }
}
