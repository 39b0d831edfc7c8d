use serde::{Deserialize, Serialize};

use crate::client::{ApiClient, ApiRequest, AuthPolicy};
use crate::credential::Credential;
use crate::error::{ApiError, FieldErrors};
use crate::session::{SignOutReason, User};

pub const LOGIN_PATH: &str = "/api/token/";
pub const REGISTER_PATH: &str = "/api/register/";
pub const LOGOUT_PATH: &str = "/api/logout/";
pub const PROFILE_PATH: &str = "/api/profile/";

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Body of a successful login. Token-based deployments return `access` and
/// `refresh`; some also embed the user.
#[derive(Debug, Default, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    access: Option<String>,
    #[serde(default)]
    refresh: Option<String>,
    #[serde(default)]
    user: Option<User>,
}

/// Sign-up details, sent as-is to the registration endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub email: String,
    pub username: String,
    pub password: String,
    pub password2: String,
}

impl Registration {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        let email = self.email.trim();
        if email.is_empty() {
            errors.add("email", "Email is required.");
        } else if !email.contains('@') {
            errors.add("email", "Enter a valid email address.");
        }
        if self.username.trim().is_empty() {
            errors.add("username", "Username is required.");
        }
        if self.password.is_empty() {
            errors.add("password", "Password is required.");
        }
        if self.password2 != self.password {
            errors.add("password2", "Passwords do not match.");
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Login, registration, logout and session restore.
#[derive(Debug, Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Exchanges credentials for a session and signs the user in.
    #[tracing::instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let email = email.trim();
        let mut errors = FieldErrors::new();
        if email.is_empty() {
            errors.add("email", "Email is required.");
        }
        if password.is_empty() {
            errors.add("password", "Password is required.");
        }
        if !errors.is_empty() {
            return Err(ApiError::InvalidInput(errors));
        }

        let request = ApiRequest::post(LOGIN_PATH)
            .json(&LoginRequest { email, password })?
            .policy(AuthPolicy::Public);
        let response: LoginResponse = self
            .client
            .dispatch(&request)
            .await?
            .json_or_default()?;

        self.client.set_credential(Credential {
            access: response.access,
            refresh: response.refresh,
        });
        let user = match response.user {
            Some(user) => user,
            None => match self.profile().await {
                Ok(user) => user,
                Err(err) => {
                    self.client.clear_credential();
                    return Err(err);
                }
            },
        };
        self.client.session().sign_in(user.clone());
        Ok(user)
    }

    /// Creates an account. Does not sign in.
    #[tracing::instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(&self, registration: &Registration) -> Result<(), ApiError> {
        registration.validate().map_err(ApiError::InvalidInput)?;

        let request = ApiRequest::post(REGISTER_PATH)
            .json(registration)?
            .policy(AuthPolicy::Public);
        self.client.send_empty(request).await
    }

    /// Ends the session. The local session is cleared even when the server
    /// cannot be reached.
    #[tracing::instrument(skip(self))]
    pub async fn logout(&self) {
        let mut request = ApiRequest::post(LOGOUT_PATH).policy(AuthPolicy::Public);
        if let Some(refresh) = self.client.credential().refresh {
            match request.clone().json(&serde_json::json!({ "refresh": refresh })) {
                Ok(with_body) => request = with_body,
                Err(err) => tracing::warn!(error = %err, "could not encode logout body"),
            }
        }
        if let Err(err) = self.client.send_empty(request).await {
            tracing::warn!(error = %err, "logout request failed, clearing local session anyway");
        }

        self.client.clear_credential();
        self.client.session().sign_out(SignOutReason::UserRequested);
    }

    /// Picks up an existing session on page load. Failures only mean "not
    /// logged in" and are not reported.
    #[tracing::instrument(skip(self))]
    pub async fn restore(&self) -> Option<User> {
        let request = ApiRequest::get(PROFILE_PATH).policy(AuthPolicy::Probe);
        match self.client.send::<User>(request).await {
            Ok(user) => {
                self.client.session().resume(user.clone());
                Some(user)
            }
            Err(err) => {
                tracing::debug!(error = %err, "no session to restore");
                None
            }
        }
    }

    /// Identity behind the current credential.
    pub async fn profile(&self) -> Result<User, ApiError> {
        self.client.send(ApiRequest::get(PROFILE_PATH)).await
    }
}
