use std::fmt;

use serde::{Deserialize, Serialize};

/// Tokens issued by the API. Both are optional because a cookie-only
/// deployment returns neither and relies on the browser's cookie jar.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh: Option<String>,
}

impl Credential {
    pub fn is_empty(&self) -> bool {
        self.access.is_none() && self.refresh.is_none()
    }

    /// Applies a renewal response: tokens it carries replace ours, missing
    /// ones are kept.
    pub fn merge(&mut self, renewed: Credential) {
        if renewed.access.is_some() {
            self.access = renewed.access;
        }
        if renewed.refresh.is_some() {
            self.refresh = renewed.refresh;
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access", &self.access.as_ref().map(|_| "<redacted>"))
            .field("refresh", &self.refresh.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_keep_refresh_token_when_renewal_omits_it() {
        let mut credential = Credential {
            access: Some("old-access".to_string()),
            refresh: Some("refresh".to_string()),
        };

        credential.merge(Credential {
            access: Some("new-access".to_string()),
            refresh: None,
        });

        assert_eq!(credential.access.as_deref(), Some("new-access"));
        assert_eq!(credential.refresh.as_deref(), Some("refresh"));
    }

    #[test]
    fn can_redact_tokens_in_debug_output() {
        let credential = Credential {
            access: Some("secret-access".to_string()),
            refresh: None,
        };

        let rendered = format!("{credential:?}");

        assert!(!rendered.contains("secret-access"));
        assert!(rendered.contains("<redacted>"));
    }
}
