//! Push notification coordination.
//!
//! This crate tracks the host application's lifecycle, relays the payload of
//! the notification that launched the app, checks Google Play Services,
//! initializes Firebase, keeps a periodic keep-alive job registered and
//! manages the badge counter.
//!
//! Every platform facility is reached through the traits in [`backend`], so
//! the coordinator itself is platform-neutral. On Android the JNI
//! implementation lives in `sys::android`.
//!
//! # Usage
//!
//! ```ignore
//! use waterkit_push::{PushConfig, PushNotificationsService, PushPlatform};
//!
//! let service = PushNotificationsService::new(platform, PushConfig::default());
//! if service.is_google_play_services_available()?.is_success() {
//!     service.initialize_firebase(app_id, sender_id, project_id, api_key)?;
//! }
//! ```

#![warn(missing_docs)]

pub mod availability;
pub mod backend;
pub mod badge;
pub mod config;
pub mod credentials;
pub mod keepalive;
pub mod launch;
pub mod lifecycle;
mod service;

/// Platform-specific implementations.
pub mod sys;

pub use availability::{Availability, AvailabilityStatus};
pub use backend::{
    HostContext, JobScheduler, LaunchArgumentSink, NotificationService, PlatformCapabilities,
    PushServices,
};
pub use config::{ConfigError, PushConfig};
pub use credentials::PushCredentials;
pub use keepalive::{KeepAliveJob, KeepAliveOutcome};
pub use launch::{ChannelLaunchSink, LAUNCH_PUSH_NOTIFICATION_KEY, LaunchPayload};
pub use lifecycle::{LifecycleEvent, LifecycleState};
pub use service::{PushNotificationsService, PushPlatform};

/// Errors that can occur while coordinating push notifications.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PushError {
    /// A mandatory credential was empty.
    #[error("missing credential: {0}")]
    MissingCredential(&'static str),
    /// The push SDK rejected its configuration.
    #[error("push SDK initialization failed: {0}")]
    SdkInit(String),
    /// The host argument pipeline is not reachable.
    #[error("launch argument delivery unavailable")]
    DeliveryUnavailable,
    /// An underlying platform call failed.
    #[error("platform error: {0}")]
    Platform(String),
}

/// Result type for push operations.
pub type PushResult<T> = Result<T, PushError>;
