use std::fmt;
use std::sync::Arc;

use crate::PushResult;
use crate::availability::{self, Availability};
use crate::backend::{
    HostContext, JobScheduler, LaunchArgumentSink, NotificationService, PlatformCapabilities,
    PushServices,
};
use crate::badge::BadgeCounter;
use crate::config::PushConfig;
use crate::credentials::PushCredentials;
use crate::keepalive::{self, KeepAliveOutcome};
use crate::launch::{LaunchPayload, LaunchRelay};
use crate::lifecycle::{LifecycleState, LifecycleTracker};

/// Runtime permission needed to post notifications on Android 13+.
const POST_NOTIFICATIONS: &str = "android.permission.POST_NOTIFICATIONS";

/// The collaborators a [`PushNotificationsService`] talks to.
#[derive(Clone)]
pub struct PushPlatform {
    /// Host application context.
    pub host: Arc<dyn HostContext>,
    /// Push SDK.
    pub services: Arc<dyn PushServices>,
    /// OS job scheduler.
    pub scheduler: Arc<dyn JobScheduler>,
    /// OS notification service.
    pub notifications: Arc<dyn NotificationService>,
    /// Platform capability queries.
    pub capabilities: Arc<dyn PlatformCapabilities>,
    /// Host argument pipeline.
    pub launch_sink: Arc<dyn LaunchArgumentSink>,
}

impl fmt::Debug for PushPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PushPlatform").finish_non_exhaustive()
    }
}

impl PushPlatform {
    /// Use one object for every platform facility.
    pub fn uniform<P>(platform: Arc<P>, launch_sink: Arc<dyn LaunchArgumentSink>) -> Self
    where
        P: HostContext
            + PushServices
            + JobScheduler
            + NotificationService
            + PlatformCapabilities
            + 'static,
    {
        Self {
            host: platform.clone(),
            services: platform.clone(),
            scheduler: platform.clone(),
            notifications: platform.clone(),
            capabilities: platform,
            launch_sink,
        }
    }
}

/// Coordinates push notifications for one app process.
///
/// All state (lifecycle flag, badge count, last launch payload) is owned by
/// the instance. Create one per launch.
pub struct PushNotificationsService {
    platform: PushPlatform,
    config: PushConfig,
    lifecycle: LifecycleTracker,
    badge: BadgeCounter,
    relay: LaunchRelay,
    notifications_permitted: bool,
}

impl fmt::Debug for PushNotificationsService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PushNotificationsService")
            .field("config", &self.config)
            .field("lifecycle", &self.lifecycle.state())
            .field("badge", &self.badge.get())
            .field("notifications_permitted", &self.notifications_permitted)
            .finish_non_exhaustive()
    }
}

impl PushNotificationsService {
    /// Create the coordinator in the foreground state.
    ///
    /// On platforms that require a runtime grant, the notification permission
    /// is queried once here. A missing grant is logged, not an error.
    #[must_use]
    pub fn new(platform: PushPlatform, config: PushConfig) -> Self {
        let notifications_permitted = if platform.capabilities.requires_notification_permission()
        {
            let granted = platform.host.has_permission(POST_NOTIFICATIONS);
            if !granted {
                log::debug!(
                    "Post notifications disabled. POST_NOTIFICATIONS permission is required"
                );
            }
            granted
        } else {
            true
        };

        let relay = LaunchRelay::new(platform.launch_sink.clone());
        Self {
            platform,
            config,
            lifecycle: LifecycleTracker::new(),
            badge: BadgeCounter::new(),
            relay,
            notifications_permitted,
        }
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &PushConfig {
        &self.config
    }

    /// Whether the app may post notifications, as observed at construction.
    #[must_use]
    pub const fn notifications_permitted(&self) -> bool {
        self.notifications_permitted
    }

    /// Feed a host lifecycle event (`"pause"`, `"resume"`, anything else is ignored).
    pub fn on_lifecycle_event(&self, event: &str) {
        self.lifecycle.on_lifecycle_event(event);
    }

    /// Whether the app is in the foreground.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.lifecycle.is_active()
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn lifecycle_state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    /// Package name of the host application.
    ///
    /// # Errors
    /// Returns [`crate::PushError::Platform`] if the host context cannot be queried.
    pub fn package_name(&self) -> PushResult<String> {
        self.platform.host.package_name()
    }

    /// Check Google Play Services. Blocks on the SDK's local lookup.
    ///
    /// # Errors
    /// Only faults inside the SDK call are errors; an unavailable service is
    /// reported through [`Availability::status`].
    pub fn is_google_play_services_available(&self) -> PushResult<Availability> {
        availability::check(self.platform.services.as_ref())
    }

    /// Diagnostic text for a raw availability code.
    ///
    /// # Errors
    /// Returns [`crate::PushError::Platform`] if the SDK call fails.
    pub fn error_string(&self, code: i32) -> PushResult<String> {
        self.platform.services.resolve_error_text(code)
    }

    /// Initialize Firebase, then schedule the keep-alive job and request a
    /// token refresh.
    ///
    /// # Errors
    /// - [`crate::PushError::MissingCredential`] if any identifier is empty. Nothing
    ///   else is attempted.
    /// - [`crate::PushError::SdkInit`] if Firebase rejects the configuration.
    ///
    /// Keep-alive scheduling and the token refresh never fail this call.
    pub fn initialize_firebase(
        &self,
        application_id: &str,
        sender_id: &str,
        project_id: &str,
        api_key: &str,
    ) -> PushResult<KeepAliveOutcome> {
        self.initialize(&PushCredentials::new(
            application_id,
            sender_id,
            project_id,
            api_key,
        ))
    }

    /// [`Self::initialize_firebase`] with prebuilt credentials.
    ///
    /// # Errors
    /// See [`Self::initialize_firebase`].
    pub fn initialize(&self, credentials: &PushCredentials) -> PushResult<KeepAliveOutcome> {
        credentials.validate()?;
        log::debug!(
            "Initializing Firebase for application: {}, project number: {}, project id: {}",
            credentials.application_id,
            credentials.sender_id,
            credentials.project_id
        );

        self.platform.services.initialize(credentials)?;
        log::info!(
            "FirebaseApp initialized successfully for {}",
            credentials.application_id
        );

        let outcome = keepalive::schedule_keep_alive(
            self.platform.capabilities.as_ref(),
            self.platform.scheduler.as_ref(),
            &self.config.keep_alive,
        );

        // the token might have been updated since the last launch
        if let Err(e) = self.platform.services.request_token_refresh() {
            log::warn!("token refresh request failed: {e}");
        }

        Ok(outcome)
    }

    /// Store the badge count. Nothing is sent to the OS.
    pub fn set_badge_number(&self, count: i32) {
        self.badge.set(count);
    }

    /// Last stored badge count.
    #[must_use]
    pub fn badge_number(&self) -> i32 {
        self.badge.get()
    }

    /// Cancel every outstanding notification. Succeeds when there are none.
    ///
    /// # Errors
    /// Returns [`crate::PushError::Platform`] if the notification service is unreachable.
    pub fn remove_all_notifications(&self) -> PushResult<()> {
        self.platform.notifications.cancel_all()
    }

    /// Relay the payload of a tapped notification to the host runtime.
    ///
    /// # Errors
    /// Returns [`crate::PushError::DeliveryUnavailable`] if the host pipeline is gone.
    /// Delivery is best effort; callers usually log and drop this.
    pub fn send_runtime_args(&self, value: &str) -> PushResult<()> {
        self.relay.notify(&self.config.launch_key, value)
    }

    /// The payload most recently passed to [`Self::send_runtime_args`].
    #[must_use]
    pub fn last_launch_payload(&self) -> Option<LaunchPayload> {
        self.relay.last_relayed()
    }
}
