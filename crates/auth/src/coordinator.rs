//! Single-flight coordinator for access-token refresh and session state.
//!
//! Responsibilities:
//! - Run at most one refresh call at a time; callers that hit a 401 while a
//!   refresh is in flight wait in a FIFO queue for its result.
//! - Hand the refreshed token to every waiter, in registration order.
//! - End the session (clear `accessToken` / `refreshToken` / `user`, notify
//!   the [`SessionListener`]) when recovery is impossible, rejecting every
//!   waiter.
//! - Be the only writer of persisted credentials, including sign-in and
//!   explicit logout.
use secrecy::{ExposeSecret as _, SecretString};
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard},
};
use storefront_types::{
    ApiError, ApiResult, CredentialStore, Credentials, LogSessionListener, RefreshedToken,
    SessionListener, StorageKey, StorefrontError, TokenRefresher, User, traits::Result,
};
use tokio::sync::oneshot;

const DEFAULT_REFRESH_PATH: &str = "/auth/refresh-token";
const DEFAULT_LOGIN_PATH: &str = "/login";

type Waiter = oneshot::Sender<ApiResult<String>>;

enum Step {
    Wait(oneshot::Receiver<ApiResult<String>>),
    Reuse(String),
    Lead(u64),
}

#[derive(Default)]
struct RefreshState {
    in_flight: bool,
    waiters: VecDeque<Waiter>,
    /// Bumped whenever the session is replaced or ended; a refresh that
    /// started in an older epoch must not publish its result.
    epoch: u64,
    /// Last access token this coordinator issued or persisted.
    issued: Option<String>,
}

/// Coordinates token refresh and owns every write to session credentials.
pub struct RefreshCoordinator {
    store: Arc<dyn CredentialStore>,
    refresher: Arc<dyn TokenRefresher>,
    listener: Arc<dyn SessionListener>,
    refresh_path: String,
    login_path: String,
    state: Mutex<RefreshState>,
    /// Serializes credential writes so a late refresh cannot resurrect a
    /// session that was ended meanwhile.
    writes: tokio::sync::Mutex<()>,
}

impl RefreshCoordinator {
    pub fn new(store: Arc<dyn CredentialStore>, refresher: Arc<dyn TokenRefresher>) -> Self {
        Self {
            store,
            refresher,
            listener: Arc::new(LogSessionListener),
            refresh_path: DEFAULT_REFRESH_PATH.to_string(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            state: Mutex::new(RefreshState::default()),
            writes: tokio::sync::Mutex::new(()),
        }
    }

    #[must_use]
    pub fn with_listener(mut self, listener: Arc<dyn SessionListener>) -> Self {
        self.listener = listener;
        self
    }

    #[must_use]
    pub fn with_refresh_path(mut self, path: impl Into<String>) -> Self {
        self.refresh_path = path.into();
        self
    }

    #[must_use]
    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    #[must_use]
    pub fn refresh_path(&self) -> &str {
        &self.refresh_path
    }

    #[must_use]
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Whether `path` (or URL) targets the refresh endpoint.
    #[must_use]
    pub fn is_refresh_path(&self, path: &str) -> bool {
        path.contains(self.refresh_path.as_str())
    }

    /// Whether a refresh call is currently outstanding.
    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.lock_state().in_flight
    }

    /// Number of callers queued behind the outstanding refresh.
    #[must_use]
    pub fn pending_waiters(&self) -> usize {
        self.lock_state().waiters.len()
    }

    /// The access token to attach to the next request, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential store cannot be read.
    pub async fn access_token(&self) -> Result<Option<String>> {
        self.store.get(StorageKey::AccessToken).await
    }

    /// The persisted user, for restoring a session at startup.
    ///
    /// A corrupt `user` entry is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential store cannot be read.
    pub async fn restore_user(&self) -> Result<Option<User>> {
        let Some(raw) = self.store.get(StorageKey::User).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable persisted user");
                Ok(None)
            }
        }
    }

    /// Persist a freshly signed-in session.
    ///
    /// Callers still waiting on an older refresh receive the new access token.
    ///
    /// # Errors
    ///
    /// Returns an error if the user cannot be serialized or the store write fails.
    pub async fn establish(&self, credentials: &Credentials, user: &User) -> Result<()> {
        let user_json = serde_json::to_string(user)?;
        let access = credentials.access_token.expose_secret().to_string();

        let _writes = self.writes.lock().await;
        self.store.set(StorageKey::AccessToken, &access).await?;
        self.store
            .set(
                StorageKey::RefreshToken,
                credentials.refresh_token.expose_secret(),
            )
            .await?;
        self.store.set(StorageKey::User, &user_json).await?;

        let waiters = {
            let mut state = self.lock_state();
            state.epoch += 1;
            state.in_flight = false;
            state.issued = Some(access.clone());
            std::mem::take(&mut state.waiters)
        };
        for waiter in waiters {
            let _ = waiter.send(Ok(access.clone()));
        }
        tracing::info!(email = %user.email, role = %user.role, "session established");
        Ok(())
    }

    /// Explicit logout: erase credentials and notify the listener.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be cleared.
    pub async fn end_session(&self) -> Result<()> {
        self.terminate().await
    }

    /// Recover from a 401 observed on `request_path`, which was sent with `used_token`.
    ///
    /// Returns the access token to retry with. Exactly one refresh call runs no
    /// matter how many callers arrive while it is outstanding.
    ///
    /// # Errors
    ///
    /// When the session cannot be recovered it is ended first. The caller whose
    /// 401 ended it gets `rejection` back (the server's own 401); callers queued
    /// behind a failed refresh get the session-expired [`ApiError`].
    pub async fn on_unauthorized(
        &self,
        request_path: &str,
        used_token: Option<&str>,
        rejection: ApiError,
    ) -> ApiResult<String> {
        if self.is_refresh_path(request_path) {
            tracing::warn!(path = request_path, "refresh endpoint rejected credentials");
            return Err(self.fail_session(rejection).await);
        }

        let refresh_token = match self.store.get(StorageKey::RefreshToken).await {
            Ok(Some(token)) => SecretString::from(token),
            Ok(None) => {
                tracing::warn!(path = request_path, "401 without a refresh token");
                return Err(self.fail_session(rejection).await);
            }
            Err(e) => return Err(e.into()),
        };

        let step = {
            let mut state = self.lock_state();
            if state.in_flight {
                let (tx, rx) = oneshot::channel();
                state.waiters.push_back(tx);
                tracing::debug!(
                    path = request_path,
                    queued = state.waiters.len(),
                    "refresh in flight, queued"
                );
                Step::Wait(rx)
            } else if let Some(current) = &state.issued
                && used_token != Some(current.as_str())
            {
                // Another caller already refreshed past the token this request carried.
                Step::Reuse(current.clone())
            } else {
                state.in_flight = true;
                Step::Lead(state.epoch)
            }
        };
        let epoch = match step {
            Step::Wait(rx) => return rx.await.unwrap_or_else(|_| Err(interrupted())),
            Step::Reuse(token) => return Ok(token),
            Step::Lead(epoch) => epoch,
        };

        // Stays armed until the outcome is settled; once `terminate` has run,
        // the epoch check turns the guard into a no-op.
        let mut guard = InFlightGuard {
            coordinator: self,
            epoch,
            armed: true,
        };
        tracing::debug!(path = request_path, "refreshing access token");
        let result = match self.refresher.refresh(&refresh_token).await {
            Ok(refreshed) => self.publish(epoch, refreshed).await,
            Err(e) => {
                tracing::warn!(error = %e, "token refresh failed, ending session");
                Err(self.fail_session(rejection).await)
            }
        };
        guard.armed = false;
        result
    }

    async fn publish(&self, epoch: u64, refreshed: RefreshedToken) -> ApiResult<String> {
        let access = refreshed.access().to_string();
        let writes = self.writes.lock().await;

        // The session was replaced or ended while the refresh was outstanding.
        {
            let state = self.lock_state();
            if state.epoch != epoch {
                return state.issued.clone().ok_or_else(ApiError::session_expired);
            }
        }

        let persisted = async {
            self.store.set(StorageKey::AccessToken, &access).await?;
            if let Some(rotated) = &refreshed.refresh_token {
                self.store
                    .set(StorageKey::RefreshToken, rotated.expose_secret())
                    .await?;
            }
            Ok::<_, StorefrontError>(())
        }
        .await;
        if let Err(e) = persisted {
            tracing::error!(error = %e, "failed to persist refreshed token");
            drop(writes);
            return Err(self.fail_session(ApiError::session_expired()).await);
        }

        let waiters = {
            let mut state = self.lock_state();
            state.in_flight = false;
            state.issued = Some(access.clone());
            std::mem::take(&mut state.waiters)
        };
        tracing::info!(waiters = waiters.len(), "access token refreshed");
        for waiter in waiters {
            let _ = waiter.send(Ok(access.clone()));
        }
        Ok(access)
    }

    /// End the session and hand `rejection` back to the current caller.
    async fn fail_session(&self, rejection: ApiError) -> ApiError {
        if let Err(e) = self.terminate().await {
            tracing::error!(error = %e, "failed to clear credentials");
        }
        rejection
    }

    async fn terminate(&self) -> Result<()> {
        let _writes = self.writes.lock().await;
        let waiters = {
            let mut state = self.lock_state();
            state.in_flight = false;
            state.epoch += 1;
            state.issued = None;
            std::mem::take(&mut state.waiters)
        };
        let cleared = self.store.clear().await;
        self.listener.session_ended(&self.login_path);
        for waiter in waiters {
            let _ = waiter.send(Err(ApiError::session_expired()));
        }
        cleared
    }

    fn lock_state(&self) -> MutexGuard<'_, RefreshState> {
        // State stays consistent across a panic: every mutation is a plain field write.
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

fn interrupted() -> ApiError {
    ApiError::transport("token refresh was interrupted")
}

/// Releases the in-flight flag if the refreshing future is dropped mid-call.
struct InFlightGuard<'a> {
    coordinator: &'a RefreshCoordinator,
    epoch: u64,
    armed: bool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let waiters = {
            let mut state = self.coordinator.lock_state();
            if state.epoch != self.epoch {
                return;
            }
            state.in_flight = false;
            std::mem::take(&mut state.waiters)
        };
        for waiter in waiters {
            let _ = waiter.send(Err(interrupted()));
        }
    }
}
