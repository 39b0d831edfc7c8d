use std::collections::BTreeMap;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Keys the API uses for messages that do not belong to a single field.
const GENERAL_KEYS: [&str; 4] = ["detail", "message", "error", "non_field_errors"];

/// Messages attached to a rejected submission, grouped per field.
///
/// Produced either locally (before any request is made) or from the body of a
/// 4xx response such as `{"title": ["This field may not be blank."]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors {
    pub general: Vec<String>,
    pub fields: BTreeMap<String, Vec<String>>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.general.is_empty() && self.fields.is_empty()
    }

    /// Records a message against a named field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Records a message that is not tied to a field.
    pub fn add_general(&mut self, message: impl Into<String>) {
        self.general.push(message.into());
    }

    /// Returns the first message recorded for `field`, if any.
    pub fn field(&self, field: &str) -> Option<&str> {
        self.fields
            .get(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    pub fn clear_field(&mut self, field: &str) {
        self.fields.remove(field);
    }

    /// A single line suitable for a notification: the first general message,
    /// otherwise the first field message.
    pub fn summary(&self) -> Option<String> {
        self.general.first().cloned().or_else(|| {
            self.fields
                .values()
                .find_map(|messages| messages.first().cloned())
        })
    }

    /// Every message, prefixed with its field name where it has one.
    pub fn messages(&self) -> Vec<String> {
        let mut lines = self.general.clone();
        for (field, messages) in &self.fields {
            lines.extend(messages.iter().map(|message| format!("{field}: {message}")));
        }
        lines
    }

    /// Interprets an error body returned by the API.
    ///
    /// `detail`, `message`, `error` and `non_field_errors` become general
    /// messages; every other key is treated as a field name.
    pub fn from_payload(payload: &Value) -> Self {
        let mut errors = Self::new();
        match payload {
            Value::Object(map) => {
                for (key, value) in map {
                    let messages = collect_messages(value);
                    if GENERAL_KEYS.contains(&key.as_str()) {
                        errors.general.extend(messages);
                    } else if !messages.is_empty() {
                        errors.fields.entry(key.clone()).or_default().extend(messages);
                    }
                }
            }
            other => errors.general.extend(collect_messages(other)),
        }
        errors
    }
}

fn collect_messages(value: &Value) -> Vec<String> {
    match value {
        Value::Null => Vec::new(),
        Value::String(message) => vec![message.clone()],
        Value::Array(items) => items.iter().flat_map(collect_messages).collect(),
        Value::Object(map) => map.values().flat_map(collect_messages).collect(),
        other => vec![other.to_string()],
    }
}

/// Everything that can go wrong talking to the task API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never completed (DNS, connection, TLS, timeout, aborted body).
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// 401 or 403.
    #[error("Not authorized (HTTP {status})")]
    Auth {
        status: StatusCode,
        payload: Option<Value>,
    },
    /// Any other 4xx, with whatever field messages the server supplied.
    #[error("Request rejected (HTTP {status})")]
    Validation {
        status: StatusCode,
        errors: FieldErrors,
    },
    /// 5xx.
    #[error("Server error (HTTP {status})")]
    Server {
        status: StatusCode,
        payload: Option<Value>,
    },
    /// The body could not be read as the JSON we expected, e.g. an HTML error page.
    #[error("Unexpected response format (HTTP {status}, content type {content_type:?})")]
    UnexpectedFormat {
        status: StatusCode,
        content_type: Option<String>,
    },
    /// Rejected locally before any request was sent.
    #[error("Invalid input: {}", .0.messages().join("; "))]
    InvalidInput(FieldErrors),
    #[error("Failed to encode request body")]
    Encode(#[source] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// Classifies a non-2xx response.
    pub fn from_response(status: StatusCode, content_type: Option<String>, body: &str) -> Self {
        let payload = serde_json::from_str::<Value>(body).ok();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return ApiError::Auth { status, payload };
        }
        if status.is_server_error() {
            return ApiError::Server { status, payload };
        }
        match payload {
            Some(payload) => ApiError::Validation {
                status,
                errors: FieldErrors::from_payload(&payload),
            },
            None if body.trim().is_empty() => ApiError::Validation {
                status,
                errors: FieldErrors::new(),
            },
            None => ApiError::UnexpectedFormat {
                status,
                content_type,
            },
        }
    }

    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ApiError::Auth { .. })
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Network(err) => err.status(),
            ApiError::Auth { status, .. }
            | ApiError::Validation { status, .. }
            | ApiError::Server { status, .. }
            | ApiError::UnexpectedFormat { status, .. } => Some(*status),
            ApiError::InvalidInput(_) | ApiError::Encode(_) | ApiError::Config(_) => None,
        }
    }

    /// Per-field messages for errors a form should display next to its inputs.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ApiError::Validation { errors, .. } | ApiError::InvalidInput(errors) => Some(errors),
            _ => None,
        }
    }

    /// Errors to show on a form: field errors when there are any, otherwise
    /// the generic notification as a general message.
    pub fn form_errors(&self) -> FieldErrors {
        match self.field_errors() {
            Some(errors) if !errors.is_empty() => errors.clone(),
            _ => {
                let mut errors = FieldErrors::new();
                errors.add_general(self.user_message());
                errors
            }
        }
    }

    /// Message shown to the user as a notification.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            ApiError::Auth { payload, .. } => payload
                .as_ref()
                .and_then(|payload| FieldErrors::from_payload(payload).summary())
                .unwrap_or_else(|| "Your session has expired. Please log in again.".to_string()),
            ApiError::Validation { errors, .. } | ApiError::InvalidInput(errors) => errors
                .summary()
                .unwrap_or_else(|| "Please correct the highlighted fields.".to_string()),
            ApiError::Server { .. } => {
                "The server encountered an error. Please try again later.".to_string()
            }
            ApiError::UnexpectedFormat { .. } => {
                "The server returned an unexpected response.".to_string()
            }
            ApiError::Encode(_) | ApiError::Config(_) => {
                "The application is misconfigured. Please contact support.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_debug_snapshot;
    use serde_json::json;

    #[test]
    fn can_split_general_and_field_messages() {
        let payload = json!({
            "non_field_errors": ["Unable to log in with provided credentials."],
            "title": ["This field may not be blank."],
            "due_date": "Date has wrong format."
        });

        let errors = FieldErrors::from_payload(&payload);

        assert_debug_snapshot!(errors, @r###"
        FieldErrors {
            general: [
                "Unable to log in with provided credentials.",
            ],
            fields: {
                "due_date": [
                    "Date has wrong format.",
                ],
                "title": [
                    "This field may not be blank.",
                ],
            },
        }
        "###);
    }

    #[test]
    fn can_read_detail_as_general_message() {
        let errors = FieldErrors::from_payload(&json!({"detail": "Not found."}));

        assert_eq!(errors.general, vec!["Not found.".to_string()]);
        assert!(errors.fields.is_empty());
        assert_eq!(errors.summary().as_deref(), Some("Not found."));
    }

    #[test]
    fn can_classify_unauthorized_and_forbidden_as_auth() {
        let unauthorized = ApiError::from_response(StatusCode::UNAUTHORIZED, None, "");
        let forbidden = ApiError::from_response(
            StatusCode::FORBIDDEN,
            Some("application/json".to_string()),
            r#"{"detail": "CSRF Failed"}"#,
        );

        assert!(unauthorized.is_auth_failure());
        assert!(forbidden.is_auth_failure());
        assert_eq!(forbidden.user_message(), "CSRF Failed");
    }

    #[test]
    fn can_classify_server_errors_regardless_of_body() {
        let err = ApiError::from_response(
            StatusCode::BAD_GATEWAY,
            Some("text/html".to_string()),
            "<html><body>Bad gateway</body></html>",
        );

        assert!(matches!(err, ApiError::Server { payload: None, .. }));
        assert_eq!(err.status(), Some(StatusCode::BAD_GATEWAY));
    }

    #[test]
    fn can_flag_html_client_errors_as_unexpected_format() {
        let err = ApiError::from_response(
            StatusCode::NOT_FOUND,
            Some("text/html".to_string()),
            "<h1>Not Found</h1>",
        );

        assert!(matches!(
            err,
            ApiError::UnexpectedFormat { content_type: Some(ref ct), .. } if ct == "text/html"
        ));
    }

    #[test]
    fn can_fall_back_to_generic_form_error() {
        let err = ApiError::Server {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            payload: None,
        };

        let errors = err.form_errors();

        assert_eq!(
            errors.general,
            vec!["The server encountered an error. Please try again later.".to_string()]
        );
    }

    #[test]
    fn can_keep_field_errors_for_forms() {
        let mut local = FieldErrors::new();
        local.add("title", "Title is required.");
        let err = ApiError::InvalidInput(local.clone());

        assert_eq!(err.form_errors(), local);
        assert_eq!(err.user_message(), "Title is required.");
        assert_eq!(err.to_string(), "Invalid input: title: Title is required.");
    }
}
