//! External collaborators of the push coordinator.
//!
//! Each trait is one facility the host platform provides. The Android
//! implementation backs all of them with a single JNI object; tests back them
//! with in-memory fakes.

use crate::PushResult;
use crate::keepalive::KeepAliveJob;

/// The host application context (an Android `Activity`).
pub trait HostContext: Send + Sync {
    /// Package name of the host application.
    fn package_name(&self) -> PushResult<String>;

    /// Whether the host holds the named runtime permission.
    fn has_permission(&self, name: &str) -> bool;
}

/// The external push SDK (Google Play Services and Firebase).
pub trait PushServices: Send + Sync {
    /// Raw availability code of the push services on this device.
    ///
    /// This may block on a local lookup inside the SDK.
    fn check_availability(&self) -> PushResult<i32>;

    /// Diagnostic text for a raw availability code.
    fn resolve_error_text(&self, code: i32) -> PushResult<String>;

    /// Initialize the SDK with the given credentials.
    ///
    /// # Errors
    /// Returns [`crate::PushError::SdkInit`] if the SDK rejects the configuration.
    fn initialize(&self, credentials: &crate::PushCredentials) -> PushResult<()>;

    /// Ask the SDK to refresh the delivery token.
    ///
    /// The result is delivered through the SDK's own callbacks.
    fn request_token_refresh(&self) -> PushResult<()>;
}

/// The OS periodic job scheduler.
pub trait JobScheduler: Send + Sync {
    /// Register `job`, replacing any job with the same id.
    fn schedule(&self, job: &KeepAliveJob) -> PushResult<()>;
}

/// The OS notification service.
pub trait NotificationService: Send + Sync {
    /// Cancel every outstanding notification posted by this app.
    fn cancel_all(&self) -> PushResult<()>;
}

/// Platform capability queries.
pub trait PlatformCapabilities: Send + Sync {
    /// Whether periodic jobs can be persisted across reboots.
    fn supports_persistent_periodic_jobs(&self) -> bool;

    /// Whether posting notifications needs a runtime permission grant.
    fn requires_notification_permission(&self) -> bool;
}

/// The host runtime's argument pipeline.
pub trait LaunchArgumentSink: Send + Sync {
    /// Hand a launch argument to the host runtime.
    ///
    /// # Errors
    /// Returns [`crate::PushError::DeliveryUnavailable`] if the pipeline is gone.
    fn deliver_launch_argument(&self, key: &str, value: &str) -> PushResult<()>;
}
