//! App-wide state shared through Dioxus context, plus the small preferences
//! kept in LocalStorage across reloads.

use std::sync::Arc;

use dioxus::prelude::*;
use gloo_storage::{LocalStorage, Storage};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use taskboard_core::config::DEFAULT_PAGE_SIZE;
use taskboard_core::{
    ApiClient, ApiError, AuthService, ClientConfig, Session, SessionStore, TaskRepository,
};

const PREFERENCES_KEY: &str = "taskboard_preferences";

/// Handles to the API, created once by the app root.
#[derive(Clone)]
pub struct Services {
    pub session: Arc<SessionStore>,
    pub auth: AuthService,
    pub tasks: TaskRepository,
}

impl PartialEq for Services {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.session, &other.session)
    }
}

impl Services {
    pub fn connect() -> Result<Self, ApiError> {
        let session = Arc::new(SessionStore::new());
        let client = connect_client(browser_config(), session.clone())?;
        Ok(Self {
            session,
            auth: AuthService::new(client.clone()),
            tasks: TaskRepository::new(client),
        })
    }
}

/// What the views render from. `restored` stays false until the page-load
/// session check has finished, so protected pages can wait instead of
/// flashing the 401 page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionView {
    pub session: Session,
    pub restored: bool,
}

pub fn use_services() -> Services {
    use_context::<Services>()
}

pub fn use_session_view() -> Signal<SessionView> {
    use_context::<Signal<SessionView>>()
}

/// Replaces the reducer state held in `signal` with `reduce(state, action)`.
pub fn dispatch<S, A>(mut signal: Signal<S>, action: A, reduce: fn(S, A) -> S)
where
    S: Default + 'static,
{
    let mut state = signal.write();
    let current = std::mem::take(&mut *state);
    *state = reduce(current, action);
}

#[cfg(target_arch = "wasm32")]
fn connect_client(config: ClientConfig, session: Arc<SessionStore>) -> Result<ApiClient, ApiError> {
    ApiClient::with_cookie_source(config, session, Arc::new(DocumentCookies))
}

#[cfg(not(target_arch = "wasm32"))]
fn connect_client(config: ClientConfig, session: Arc<SessionStore>) -> Result<ApiClient, ApiError> {
    ApiClient::new(config, session)
}

/// Base URL baked in at build time, otherwise the origin serving the app.
fn browser_config() -> ClientConfig {
    if option_env!("TASKBOARD_API_BASE_URL").is_some() {
        return ClientConfig::from_build_env();
    }
    match page_origin() {
        Some(origin) => ClientConfig::default().with_api_base_url(origin),
        None => ClientConfig::default(),
    }
}

#[cfg(target_arch = "wasm32")]
fn page_origin() -> Option<String> {
    web_sys::window()?.location().origin().ok()
}

#[cfg(not(target_arch = "wasm32"))]
fn page_origin() -> Option<String> {
    None
}

/// Reads the CSRF cookie from `document.cookie`.
#[cfg(target_arch = "wasm32")]
struct DocumentCookies;

#[cfg(target_arch = "wasm32")]
impl taskboard_core::CookieSource for DocumentCookies {
    fn cookie(&self, name: &str) -> Option<String> {
        use wasm_bindgen::JsCast;

        let document = web_sys::window()?
            .document()?
            .dyn_into::<web_sys::HtmlDocument>()
            .ok()?;
        let cookies = document.cookie().ok()?;
        taskboard_core::client::find_cookie(&cookies, name)
    }
}

/// Client preferences that survive reloads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Preferences {
    pub page_size: u32,
    /// Prefilled on the login form.
    #[serde(default)]
    pub last_email: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            last_email: String::new(),
        }
    }
}

pub fn use_preferences() -> UsePersistent<Preferences> {
    use_persistent(PREFERENCES_KEY, Preferences::default)
}

/// A signal mirrored into LocalStorage under `key`.
pub fn use_persistent<T: Serialize + DeserializeOwned + Default + 'static>(
    key: impl ToString,
    init: impl FnOnce() -> T,
) -> UsePersistent<T> {
    let state = use_signal(move || {
        let key = key.to_string();
        let value = LocalStorage::get(key.as_str()).ok().unwrap_or_else(init);
        StorageEntry { key, value }
    });
    UsePersistent { inner: state }
}

#[derive(Debug)]
struct StorageEntry<T> {
    key: String,
    value: T,
}

pub struct UsePersistent<T: 'static> {
    inner: Signal<StorageEntry<T>>,
}

impl<T> Clone for UsePersistent<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for UsePersistent<T> {}

impl<T: Serialize + DeserializeOwned + Clone + 'static> UsePersistent<T> {
    pub fn get(&self) -> T {
        self.inner.read().value.clone()
    }

    /// Mutates the value in place and writes it back to storage.
    pub fn update(&mut self, f: impl FnOnce(&mut T)) {
        let mut inner = self.inner.write();
        f(&mut inner.value);
        if let Err(err) = LocalStorage::set(inner.key.as_str(), &inner.value) {
            tracing::warn!(key = %inner.key, error = %err, "could not persist preferences");
        }
    }
}
