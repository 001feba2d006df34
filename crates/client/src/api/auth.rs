use storefront_types::{
    ApiResult, Credentials, SignInPayload, SignInResponse, SignUpPayload, User,
};

use crate::{Dispatcher, RequestOptions};

const SIGN_IN: &str = "/auth/sign-in";
const SIGN_UP: &str = "/auth/sign-up";
const LOGOUT: &str = "/auth/logout";

/// Account endpoints and local session lifecycle.
pub struct AuthApi<'a> {
    dispatcher: &'a Dispatcher,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(dispatcher: &'a Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Signs in and persists the returned tokens and user.
    ///
    /// # Errors
    ///
    /// Returns the backend's rejection, or a storage failure while persisting.
    pub async fn sign_in(&self, payload: &SignInPayload) -> ApiResult<User> {
        let opts = RequestOptions::post(SIGN_IN).body(payload)?;
        let resp: SignInResponse = self.dispatcher.send(opts).await?;
        let credentials = Credentials::new(resp.access_token, resp.refresh_token);
        self.dispatcher
            .coordinator()
            .establish(&credentials, &resp.user)
            .await?;
        tracing::info!(email = %resp.user.email, role = %resp.user.role, "signed in");
        Ok(resp.user)
    }

    /// Registers a new customer account. Does not sign in.
    ///
    /// # Errors
    ///
    /// Returns the backend's rejection (e.g. email already registered).
    pub async fn sign_up(&self, payload: &SignUpPayload) -> ApiResult<()> {
        let opts = RequestOptions::post(SIGN_UP).body(payload)?;
        self.dispatcher.send_unit(opts).await
    }

    /// Tells the backend to end the session, then clears it locally.
    ///
    /// The local session is always cleared; the backend's failure, if any,
    /// is returned afterwards.
    ///
    /// # Errors
    ///
    /// Returns the backend's rejection or a local storage failure.
    pub async fn logout(&self) -> ApiResult<()> {
        let remote = self
            .dispatcher
            .send_unit(RequestOptions::post(LOGOUT))
            .await;
        self.dispatcher.coordinator().end_session().await?;
        if let Err(e) = &remote {
            tracing::warn!(code = e.code, message = %e.message, "backend logout failed");
        }
        remote
    }

    /// The persisted user of the current session, if any.
    ///
    /// # Errors
    ///
    /// Returns a storage failure.
    pub async fn current_user(&self) -> ApiResult<Option<User>> {
        Ok(self.dispatcher.coordinator().restore_user().await?)
    }
}
