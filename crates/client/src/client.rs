//! Authenticated HTTP transport.
//!
//! Every facade call funnels through [`ApiClient::execute`], which:
//! 1. attaches `Authorization: Bearer <access token>` when one is stored;
//! 2. on a 401 (request not yet retried, not the refresh endpoint) exchanges
//!    the refresh token with a bare call and replays the request once;
//! 3. on refresh failure clears the tokens, ends the session and navigates to
//!    the login route.
//!
//! Refreshes are serialized behind one gate. A request that waited at the gate
//! and finds a different access token in the store than the one it was
//! rejected with replays without refreshing again.

use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::{DeserializeOwned, IgnoredAny};
use tokio::sync::{Mutex, watch};

use qms_auth::{
    AuthStore, FileAuthStore, LOGIN_ROUTE, LogNavigator, MemoryAuthStore, Navigator, SessionEvent,
    SessionState, TokenPair,
};
use qms_core::Shape;

use crate::config::{ApiBase, ClientConfig};
use crate::error::{ClientError, ClientResult};
use crate::request::{ApiRequest, Blob, Body, REFRESH_PATH};

/// Cheap-to-clone handle to the API; clones share tokens and session state.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

struct Inner {
    http: reqwest::Client,
    base: ApiBase,
    base_url: String,
    store: Arc<dyn AuthStore>,
    navigator: Arc<dyn Navigator>,
    refresh_gate: Mutex<()>,
    session: watch::Sender<SessionState>,
}

pub struct ApiClientBuilder {
    config: ClientConfig,
    store: Option<Arc<dyn AuthStore>>,
    navigator: Option<Arc<dyn Navigator>>,
}

impl ApiClientBuilder {
    /// Token store to use instead of the one derived from the configuration.
    pub fn store(mut self, store: Arc<dyn AuthStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    pub fn build(self) -> ClientResult<ApiClient> {
        let store: Arc<dyn AuthStore> = match (self.store, &self.config.token_file) {
            (Some(store), _) => store,
            (None, Some(path)) => Arc::new(FileAuthStore::open(path)?),
            (None, None) => Arc::new(MemoryAuthStore::new()),
        };
        let navigator = self.navigator.unwrap_or_else(|| Arc::new(LogNavigator));

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(self.config.timeout)
            .default_headers(headers)
            .build()?;

        let base = self.config.resolve_base();
        let base_url = base.url(&self.config.origin);
        let (session, _) = watch::channel(SessionState::initial(store.has_access_token()));

        tracing::debug!(%base_url, ?base, "api client configured");

        Ok(ApiClient {
            inner: Arc::new(Inner {
                http,
                base,
                base_url,
                store,
                navigator,
                refresh_gate: Mutex::new(()),
                session,
            }),
        })
    }
}

impl ApiClient {
    pub fn builder(config: ClientConfig) -> ApiClientBuilder {
        ApiClientBuilder {
            config,
            store: None,
            navigator: None,
        }
    }

    /// Client configured from the `QMS_*` environment variables.
    pub fn from_env() -> ClientResult<Self> {
        Self::builder(ClientConfig::from_env()?).build()
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn api_base(&self) -> &ApiBase {
        &self.inner.base
    }

    pub fn store(&self) -> &Arc<dyn AuthStore> {
        &self.inner.store
    }

    pub fn session(&self) -> SessionState {
        *self.inner.session.borrow()
    }

    pub fn subscribe_session(&self) -> watch::Receiver<SessionState> {
        self.inner.session.subscribe()
    }

    /// Send a request and decode its payload according to `shape`.
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest, shape: Shape) -> ClientResult<T> {
        let response = self.execute(&request).await?;
        let body = response.bytes().await?;
        Ok(shape.decode(&body)?)
    }

    /// Send a request whose payload the caller does not need.
    pub async fn send_discard(&self, request: ApiRequest, shape: Shape) -> ClientResult<()> {
        self.send::<IgnoredAny>(request, shape).await.map(|_| ())
    }

    /// Send a request whose response is a file.
    pub async fn download(&self, request: ApiRequest) -> ClientResult<Blob> {
        let request = request.binary();
        let response = self.execute(&request).await?;
        let headers = response.headers().clone();
        let bytes = response.bytes().await?;
        Ok(Blob::from_parts(&headers, bytes.to_vec()))
    }

    /// Send a request through the auth interceptor; returns the 2xx response.
    pub async fn execute(&self, request: &ApiRequest) -> ClientResult<reqwest::Response> {
        let mut retried = false;

        loop {
            let token = self.inner.store.access_token();
            let http_request = self.build_request(request, token.as_deref())?;
            let response = self.inner.http.execute(http_request).await?;
            let status = response.status();

            tracing::debug!(
                method = %request.method(),
                path = request.path(),
                status = status.as_u16(),
                retried,
                "api response"
            );

            if status == StatusCode::UNAUTHORIZED && !retried && request.refreshes_on_unauthorized() {
                retried = true;
                self.refresh_rejected(token.as_deref()).await?;
                continue;
            }

            if !status.is_success() {
                return Err(ClientError::from_response(response).await);
            }

            return Ok(response);
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.inner.base_url, path)
    }

    fn build_request(&self, request: &ApiRequest, token: Option<&str>) -> ClientResult<reqwest::Request> {
        let mut builder = self
            .inner
            .http
            .request(request.method().clone(), self.url(request.path()));

        if !request.query_params().is_empty() {
            builder = builder.query(request.query_params());
        }
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        if request.is_binary() {
            builder = builder.header(ACCEPT, "*/*");
        }

        builder = match request.body() {
            Body::Empty => builder,
            Body::Json(value) => builder.json(value),
            Body::Form(fields) => builder.form(fields),
            Body::Multipart(form) => builder.multipart(form.to_reqwest()?),
        };

        Ok(builder.build()?)
    }

    /// Recover from a 401 received while `stale` was the stored access token.
    async fn refresh_rejected(&self, stale: Option<&str>) -> ClientResult<()> {
        let _gate = self.inner.refresh_gate.lock().await;

        let current = self.inner.store.access_token();
        if current.as_deref() != stale {
            return match current {
                Some(_) => {
                    tracing::debug!("access token already refreshed by a concurrent request");
                    Ok(())
                }
                None => Err(ClientError::SessionExpired),
            };
        }

        self.transition(SessionEvent::RefreshStarted);

        let refreshed = match self.exchange_refresh_token().await {
            Ok(tokens) => self.inner.store.set_tokens(&tokens).map_err(ClientError::from),
            Err(err) => Err(err),
        };

        match refreshed {
            Ok(()) => {
                self.transition(SessionEvent::RefreshSucceeded);
                tracing::info!("access token refreshed");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "token refresh failed; session ended");
                self.expire_session();
                Err(err)
            }
        }
    }

    /// POST the stored refresh token to the refresh endpoint.
    ///
    /// Goes straight to the HTTP client: no interceptor and no stale
    /// `Authorization` header.
    async fn exchange_refresh_token(&self) -> ClientResult<TokenPair> {
        let refresh_token = self.inner.store.refresh_token().ok_or(ClientError::NoRefreshToken)?;

        let response = self
            .inner
            .http
            .post(self.url(REFRESH_PATH))
            .json(&serde_json::json!({ "refresh_token": refresh_token }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClientError::from_response(response).await);
        }

        let body = response.bytes().await?;
        Ok(Shape::Enveloped.decode(&body)?)
    }

    fn expire_session(&self) {
        if let Err(err) = self.inner.store.clear() {
            tracing::error!(error = %err, "failed to clear token store");
        }
        self.transition(SessionEvent::RefreshFailed);
        self.inner.navigator.navigate(LOGIN_ROUTE);
    }

    /// Persist credentials from a successful login.
    pub(crate) fn establish_session(&self, tokens: &TokenPair) -> ClientResult<()> {
        self.inner.store.set_tokens(tokens)?;
        self.transition(SessionEvent::LoggedIn);
        Ok(())
    }

    /// Refresh on the caller's request.
    ///
    /// Shares the gate with the transparent refresh. A failure puts the
    /// session back where it was instead of ending it.
    pub(crate) async fn refresh_session(&self) -> ClientResult<TokenPair> {
        let _gate = self.inner.refresh_gate.lock().await;
        let previous = self.session();

        self.transition(SessionEvent::RefreshStarted);
        let refreshed = match self.exchange_refresh_token().await {
            Ok(tokens) => self
                .inner
                .store
                .set_tokens(&tokens)
                .map(|()| tokens)
                .map_err(ClientError::from),
            Err(err) => Err(err),
        };

        match &refreshed {
            Ok(_) => {
                self.transition(SessionEvent::RefreshSucceeded);
                tracing::info!("access token refreshed on request");
            }
            Err(err) => {
                tracing::warn!(error = %err, "explicit token refresh failed");
                self.inner.session.send_if_modified(|state| {
                    let restore = *state == SessionState::Refreshing;
                    if restore {
                        *state = previous;
                    }
                    restore
                });
            }
        }
        refreshed
    }

    /// Forget credentials after an explicit logout.
    pub(crate) fn end_session(&self) -> ClientResult<()> {
        let cleared = self.inner.store.clear();
        self.transition(SessionEvent::LoggedOut);
        Ok(cleared?)
    }

    fn transition(&self, event: SessionEvent) {
        self.inner.session.send_if_modified(|state| {
            let next = state.apply(event);
            let changed = next != *state;
            *state = next;
            changed
        });
    }
}

impl core::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .field("session", &self.session())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(store: Arc<dyn AuthStore>) -> ApiClient {
        ApiClient::builder(ClientConfig::new("https://qms.example.com"))
            .store(store)
            .build()
            .unwrap()
    }

    #[test]
    fn initial_session_follows_store() {
        let empty = client(Arc::new(MemoryAuthStore::new()));
        assert_eq!(empty.session(), SessionState::Unauthenticated);

        let seeded = client(Arc::new(MemoryAuthStore::with_tokens(&TokenPair::new("a", "r"))));
        assert_eq!(seeded.session(), SessionState::Authenticated);
    }

    #[test]
    fn base_url_is_resolved_once() {
        let c = client(Arc::new(MemoryAuthStore::new()));
        assert_eq!(c.base_url(), "https://qms.example.com/api/v1");
        assert!(matches!(c.api_base(), ApiBase::SameOrigin(_)));
    }

    #[test]
    fn bearer_header_only_with_token() {
        let c = client(Arc::new(MemoryAuthStore::new()));
        let request = ApiRequest::get("/documents");

        let anonymous = c.build_request(&request, None).unwrap();
        assert!(anonymous.headers().get(reqwest::header::AUTHORIZATION).is_none());

        let authed = c.build_request(&request, Some("tok")).unwrap();
        assert_eq!(
            authed.headers().get(reqwest::header::AUTHORIZATION).unwrap(),
            "Bearer tok"
        );
        assert_eq!(authed.url().as_str(), "https://qms.example.com/api/v1/documents");
    }

    #[test]
    fn query_is_encoded_onto_url() {
        let c = client(Arc::new(MemoryAuthStore::new()));
        let request = ApiRequest::get("/documents")
            .query(&serde_json::json!({ "search": "allergen control", "page": 2, "status": "" }))
            .unwrap();

        let built = c.build_request(&request, None).unwrap();
        assert_eq!(built.url().query(), Some("page=2&search=allergen+control"));
    }

    #[test]
    fn login_and_logout_move_the_session() {
        let c = client(Arc::new(MemoryAuthStore::new()));
        let mut rx = c.subscribe_session();

        c.establish_session(&TokenPair::new("a", "r")).unwrap();
        assert_eq!(c.session(), SessionState::Authenticated);
        assert!(rx.has_changed().unwrap());
        rx.borrow_and_update();

        c.end_session().unwrap();
        assert_eq!(c.session(), SessionState::LoggedOut);
        assert!(c.store().access_token().is_none());
        assert!(rx.has_changed().unwrap());
    }
}
