//! The one HTTP transport every API call goes through.
//!
//! [`ApiClient`] resolves paths against the configured base address, attaches
//! the bearer token and CSRF header, classifies failures into [`ApiError`] and
//! runs the refresh-then-retry-once flow on authorization failures.

use std::sync::{Arc, PoisonError, RwLock};

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::credential::Credential;
use crate::error::ApiError;
use crate::refresh::{RefreshCoordinator, RefreshState, RenewalError};
use crate::session::{SessionStore, SignOutReason};

pub const REFRESH_PATH: &str = "/api/token/refresh/";

/// Read access to the cookies the API has set, used for the CSRF token.
#[cfg_attr(test, mockall::automock)]
pub trait CookieSource: Send + Sync {
    fn cookie(&self, name: &str) -> Option<String>;
}

/// Finds `name` in a `Cookie` header or `document.cookie` string.
pub fn find_cookie(header: &str, name: &str) -> Option<String> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key.trim() == name).then(|| value.trim().to_string())
    })
}

#[cfg(not(target_arch = "wasm32"))]
struct JarCookies {
    jar: Arc<reqwest::cookie::Jar>,
    url: Url,
}

#[cfg(not(target_arch = "wasm32"))]
impl CookieSource for JarCookies {
    fn cookie(&self, name: &str) -> Option<String> {
        use reqwest::cookie::CookieStore;

        let header = self.jar.cookies(&self.url)?;
        find_cookie(header.to_str().ok()?, name)
    }
}

type CookieHandle = Option<Arc<dyn CookieSource>>;

#[cfg(not(target_arch = "wasm32"))]
fn build_http(
    config: &ClientConfig,
    base_url: &Url,
) -> Result<(reqwest::Client, CookieHandle), ApiError> {
    let jar = Arc::new(reqwest::cookie::Jar::default());
    let http = reqwest::Client::builder()
        .cookie_provider(jar.clone())
        .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
        .build()?;
    let cookies = JarCookies {
        jar,
        url: base_url.clone(),
    };
    Ok((http, Some(Arc::new(cookies))))
}

#[cfg(target_arch = "wasm32")]
fn build_http(
    _config: &ClientConfig,
    _base_url: &Url,
) -> Result<(reqwest::Client, CookieHandle), ApiError> {
    Ok((reqwest::Client::builder().build()?, None))
}

/// How a request reacts to a 401/403.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPolicy {
    /// Never renewed: login, registration, renewal itself.
    Public,
    /// Renew and retry once; sign the user out if renewal fails.
    Authenticated,
    /// Renew and retry once; on failure stay signed out without navigating.
    Probe,
}

/// A request relative to the API base address.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Value>,
    policy: AuthPolicy,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            policy: AuthPolicy::Authenticated,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_value(body).map_err(ApiError::Encode)?);
        Ok(self)
    }

    pub fn query(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    pub fn policy(mut self, policy: AuthPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    fn is_mutating(&self) -> bool {
        !matches!(self.method, Method::GET | Method::HEAD | Method::OPTIONS)
    }
}

/// A successful response, body already read.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: String,
}

impl ApiResponse {
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_str(&self.body).map_err(|err| {
            tracing::warn!(status = %self.status, error = %err, "response body is not the expected JSON");
            ApiError::UnexpectedFormat {
                status: self.status,
                content_type: self.content_type.clone(),
            }
        })
    }

    /// Like [`ApiResponse::json`], but an empty body yields `T::default()`.
    pub fn json_or_default<T: DeserializeOwned + Default>(&self) -> Result<T, ApiError> {
        if self.body.trim().is_empty() {
            Ok(T::default())
        } else {
            self.json()
        }
    }
}

struct Inner {
    http: reqwest::Client,
    base_url: Url,
    config: ClientConfig,
    cookies: CookieHandle,
    credential: RwLock<Credential>,
    session: Arc<SessionStore>,
    refresh: RefreshCoordinator,
}

/// Cheap to clone; clones share the credential, cookie jar and session.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("credential", &self.credential())
            .field("refresh", &self.inner.refresh)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Creates a client whose CSRF token comes from its own cookie jar
    /// natively, or from nowhere in the browser (see [`ApiClient::with_cookie_source`]).
    pub fn new(config: ClientConfig, session: Arc<SessionStore>) -> Result<Self, ApiError> {
        let base_url = config.base_url()?;
        let (http, cookies) = build_http(&config, &base_url)?;
        Ok(Self::assemble(http, base_url, config, cookies, session))
    }

    /// Creates a client that reads the CSRF token from `cookies`, e.g.
    /// `document.cookie` in the browser.
    pub fn with_cookie_source(
        config: ClientConfig,
        session: Arc<SessionStore>,
        cookies: Arc<dyn CookieSource>,
    ) -> Result<Self, ApiError> {
        let base_url = config.base_url()?;
        let (http, _) = build_http(&config, &base_url)?;
        Ok(Self::assemble(http, base_url, config, Some(cookies), session))
    }

    fn assemble(
        http: reqwest::Client,
        base_url: Url,
        config: ClientConfig,
        cookies: CookieHandle,
        session: Arc<SessionStore>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                http,
                base_url,
                config,
                cookies,
                credential: RwLock::new(Credential::default()),
                session,
                refresh: RefreshCoordinator::new(),
            }),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.inner.session
    }

    pub fn refresh_state(&self) -> RefreshState {
        self.inner.refresh.state()
    }

    /// Number of renewals performed by this client.
    pub fn refresh_attempts(&self) -> u64 {
        self.inner.refresh.attempts()
    }

    pub fn credential(&self) -> Credential {
        self.inner
            .credential
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Installs a credential obtained by logging in (or loaded from disk).
    pub fn set_credential(&self, credential: Credential) {
        *self
            .inner
            .credential
            .write()
            .unwrap_or_else(PoisonError::into_inner) = credential;
        self.inner.refresh.credential_replaced();
    }

    pub fn clear_credential(&self) {
        self.set_credential(Credential::default());
    }

    /// Sends `request` and decodes its JSON body.
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        self.dispatch(&request).await?.json()
    }

    /// Sends `request` and ignores its body, for 204-style endpoints.
    pub async fn send_empty(&self, request: ApiRequest) -> Result<(), ApiError> {
        self.dispatch(&request).await.map(|_| ())
    }

    /// Sends `request`, renewing the credential and replaying the request once
    /// if it is rejected as unauthorized.
    #[tracing::instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn dispatch(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let generation = self.inner.refresh.generation();
        let rejection = match self.execute(request).await {
            Err(err) if err.is_auth_failure() && request.policy != AuthPolicy::Public => err,
            outcome => return outcome,
        };

        let renewal = self
            .inner
            .refresh
            .renew(generation, || self.renew_credential())
            .await;
        match renewal {
            Ok(renewal) => {
                tracing::debug!(?renewal, "replaying request with renewed credential");
                self.execute(request).await
            }
            Err(RenewalError::Failed) => {
                self.abandon_session(request.policy);
                Err(rejection)
            }
            Err(RenewalError::FailedEarlier) => Err(rejection),
        }
    }

    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = self.url(&request.path)?;
        let mut builder = self
            .inner
            .http
            .request(request.method.clone(), url)
            .header(ACCEPT, "application/json");
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = self.credential().access {
            builder = builder.bearer_auth(token);
        }
        if request.is_mutating() {
            if let Some(token) = self.csrf_token() {
                builder = builder.header(self.inner.config.csrf_header_name.as_str(), token);
            }
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        #[cfg(target_arch = "wasm32")]
        {
            builder = builder.fetch_credentials_include();
        }

        tracing::debug!("sending request");
        let response = builder.send().await.inspect_err(|err| {
            tracing::warn!(error = %err, "request did not complete");
        })?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response.text().await?;

        if status.is_success() {
            Ok(ApiResponse {
                status,
                content_type,
                body,
            })
        } else {
            tracing::warn!(%status, "request rejected");
            Err(ApiError::from_response(status, content_type, &body))
        }
    }

    async fn renew_credential(&self) -> Result<(), ApiError> {
        let body = match self.credential().refresh {
            Some(token) => serde_json::json!({ "refresh": token }),
            None => serde_json::json!({}),
        };
        let request = ApiRequest::post(REFRESH_PATH)
            .json(&body)?
            .policy(AuthPolicy::Public);
        let renewed: Credential = self.execute(&request).await?.json_or_default()?;

        self.inner
            .credential
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .merge(renewed);
        Ok(())
    }

    fn abandon_session(&self, policy: AuthPolicy) {
        *self
            .inner
            .credential
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Credential::default();
        if policy == AuthPolicy::Authenticated {
            self.inner.session.sign_out(SignOutReason::SessionExpired);
        }
        self.inner.refresh.finish_logout();
    }

    fn csrf_token(&self) -> Option<String> {
        let cookies = self.inner.cookies.as_ref()?;
        cookies.cookie(&self.inner.config.csrf_cookie_name)
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.inner
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| ApiError::Config(format!("invalid request path {path:?}: {err}")))
    }
}
