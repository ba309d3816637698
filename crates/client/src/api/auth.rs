//! `/auth`: login, refresh, logout, current user.

use qms_auth::TokenPair;
use qms_core::Shape;

use crate::api::users::User;
use crate::error::ClientResult;
use crate::request::ApiRequest;

pub const LOGIN_PATH: &str = "/auth/login";
pub const LOGOUT_PATH: &str = "/auth/logout";
pub const ME_PATH: &str = "/auth/me";

facade!(
    /// Session lifecycle.
    Auth
);

impl Auth<'_> {
    /// Exchange credentials for a token pair and start the session.
    ///
    /// Sent as `application/x-www-form-urlencoded`. A 401 here is a wrong
    /// password and is returned as-is.
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<TokenPair> {
        let request = ApiRequest::post(LOGIN_PATH)
            .form([("username", username), ("password", password)])
            .without_refresh();

        let tokens: TokenPair = self.client.send(request, Shape::Enveloped).await?;
        self.client.establish_session(&tokens)?;
        tracing::info!(username, "logged in");
        Ok(tokens)
    }

    /// Explicitly exchange the stored refresh token.
    ///
    /// Unlike the transparent refresh, a failure here does not end the
    /// session; the caller decides.
    pub async fn refresh(&self) -> ClientResult<TokenPair> {
        self.client.refresh_session().await
    }

    /// Tell the server, then forget the tokens locally whatever it answered.
    pub async fn logout(&self) -> ClientResult<()> {
        let request = ApiRequest::post(LOGOUT_PATH).without_refresh();
        let server = self.client.send_discard(request, Shape::Bare).await;

        self.client.end_session()?;
        tracing::info!("logged out");

        if let Err(err) = &server {
            tracing::warn!(error = %err, "logout request failed; local session cleared anyway");
        }
        server
    }

    pub async fn me(&self) -> ClientResult<User> {
        self.client.send(ApiRequest::get(ME_PATH), Shape::Enveloped).await
    }
}
