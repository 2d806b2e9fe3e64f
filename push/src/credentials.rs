//! Firebase project identifiers.

use std::fmt;

use serde::Deserialize;

use crate::config::ConfigError;
use crate::{PushError, PushResult};

/// The four identifiers Firebase needs to initialize.
///
/// All of them are opaque strings supplied by the host configuration.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushCredentials {
    /// Firebase application id.
    pub application_id: String,
    /// GCM sender id (project number).
    #[serde(rename = "gcmSenderId")]
    pub sender_id: String,
    /// Firebase project id.
    pub project_id: String,
    /// Web API key.
    pub api_key: String,
}

impl fmt::Debug for PushCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PushCredentials")
            .field("application_id", &self.application_id)
            .field("sender_id", &self.sender_id)
            .field("project_id", &self.project_id)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl PushCredentials {
    /// Bundle the four identifiers.
    pub fn new(
        application_id: impl Into<String>,
        sender_id: impl Into<String>,
        project_id: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            application_id: application_id.into(),
            sender_id: sender_id.into(),
            project_id: project_id.into(),
            api_key: api_key.into(),
        }
    }

    /// Parse `{"applicationId", "gcmSenderId", "projectId", "apiKey"}`.
    ///
    /// # Errors
    /// Returns [`ConfigError::Json`] on malformed input.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check that every identifier is non-empty.
    ///
    /// # Errors
    /// Returns [`PushError::MissingCredential`] naming the first empty field.
    pub fn validate(&self) -> PushResult<()> {
        let fields = [
            ("application_id", &self.application_id),
            ("sender_id", &self.sender_id),
            ("project_id", &self.project_id),
            ("api_key", &self.api_key),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(PushError::MissingCredential(name));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_first_missing_field() {
        let credentials = PushCredentials::new("app", "", "proj", "");
        assert_eq!(
            credentials.validate(),
            Err(PushError::MissingCredential("sender_id"))
        );
    }

    #[test]
    fn blank_is_missing() {
        let credentials = PushCredentials::new("app", "123", "  ", "key");
        assert_eq!(
            credentials.validate(),
            Err(PushError::MissingCredential("project_id"))
        );
    }

    #[test]
    fn parses_google_services_names() {
        let credentials = PushCredentials::from_json(
            r#"{"applicationId":"1:123:android:abc","gcmSenderId":"123","projectId":"demo","apiKey":"AIza"}"#,
        )
        .unwrap();
        assert_eq!(credentials.sender_id, "123");
        assert!(credentials.validate().is_ok());
    }

    #[test]
    fn debug_hides_api_key() {
        let credentials = PushCredentials::new("app", "123", "demo", "secret-key");
        assert!(!format!("{credentials:?}").contains("secret-key"));
    }
}
