//! Coordinator configuration.

use serde::Deserialize;

use crate::keepalive::KeepAliveJob;
use crate::launch::LAUNCH_PUSH_NOTIFICATION_KEY;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The document is not valid JSON for the expected shape.
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Settings for [`crate::PushNotificationsService`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PushConfig {
    /// The periodic keep-alive job registered during Firebase setup.
    pub keep_alive: KeepAliveJob,
    /// Argument key used when relaying launch payloads.
    pub launch_key: String,
    /// Fully qualified name of the host `JobService` run by the keep-alive job.
    pub job_service_class: String,
    /// Host class with a static `retrieveToken()` method. When unset, the
    /// token is requested from `FirebaseMessaging` directly.
    pub messaging_service_class: Option<String>,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            keep_alive: KeepAliveJob::default(),
            launch_key: LAUNCH_PUSH_NOTIFICATION_KEY.to_owned(),
            job_service_class: "com.waterkit.push.PushNotificationJobService".to_owned(),
            messaging_service_class: None,
        }
    }
}

impl PushConfig {
    /// Parse configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    /// Returns [`ConfigError::Json`] on malformed input.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}
