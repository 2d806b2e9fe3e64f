//! In-memory collaborators for exercising the coordinator.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use waterkit_push::{
    HostContext, JobScheduler, KeepAliveJob, LaunchArgumentSink, LaunchPayload,
    NotificationService, PlatformCapabilities, PushCredentials, PushError, PushPlatform,
    PushResult, PushServices,
};

/// A call made against the fake platform, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    HasPermission(String),
    CheckAvailability,
    ResolveErrorText(i32),
    Initialize(PushCredentials),
    TokenRefresh,
    Schedule(KeepAliveJob),
    CancelAll,
    Deliver(String, String),
}

#[derive(Debug)]
pub struct FakePlatform {
    pub calls: Mutex<Vec<Call>>,
    pub availability_code: i32,
    pub error_text: String,
    pub reject_init: bool,
    pub reject_token_refresh: bool,
    /// `check_availability` itself fails, as when the binder is gone.
    pub availability_fault: bool,
    pub reject_schedule: bool,
    pub persistent_jobs: bool,
    pub permission_required: bool,
    pub permission_granted: bool,
    pub sink_closed: bool,
    /// Active jobs keyed by id, as the OS scheduler keeps them.
    pub jobs: Mutex<HashMap<i32, KeepAliveJob>>,
    pub outstanding_notifications: Mutex<usize>,
}

impl Default for FakePlatform {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            availability_code: 0,
            error_text: String::new(),
            reject_init: false,
            reject_token_refresh: false,
            availability_fault: false,
            reject_schedule: false,
            persistent_jobs: true,
            permission_required: false,
            permission_granted: true,
            sink_closed: false,
            jobs: Mutex::new(HashMap::new()),
            outstanding_notifications: Mutex::new(0),
        }
    }
}

impl FakePlatform {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn active_jobs(&self) -> usize {
        self.jobs.lock().unwrap().len()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    /// Wrap into the collaborator bundle, using the fake as its own sink.
    pub fn into_platform(self) -> (Arc<Self>, PushPlatform) {
        let fake = Arc::new(self);
        let platform = PushPlatform::uniform(fake.clone(), fake.clone());
        (fake, platform)
    }
}

impl HostContext for FakePlatform {
    fn package_name(&self) -> PushResult<String> {
        Ok("com.example.app".to_owned())
    }

    fn has_permission(&self, name: &str) -> bool {
        self.record(Call::HasPermission(name.to_owned()));
        self.permission_granted
    }
}

impl PushServices for FakePlatform {
    fn check_availability(&self) -> PushResult<i32> {
        self.record(Call::CheckAvailability);
        if self.availability_fault {
            return Err(PushError::Platform("binder died".to_owned()));
        }
        Ok(self.availability_code)
    }

    fn resolve_error_text(&self, code: i32) -> PushResult<String> {
        self.record(Call::ResolveErrorText(code));
        Ok(self.error_text.clone())
    }

    fn initialize(&self, credentials: &PushCredentials) -> PushResult<()> {
        self.record(Call::Initialize(credentials.clone()));
        if self.reject_init {
            return Err(PushError::SdkInit("malformed application id".to_owned()));
        }
        Ok(())
    }

    fn request_token_refresh(&self) -> PushResult<()> {
        self.record(Call::TokenRefresh);
        if self.reject_token_refresh {
            return Err(PushError::Platform("token endpoint unreachable".to_owned()));
        }
        Ok(())
    }
}

impl JobScheduler for FakePlatform {
    fn schedule(&self, job: &KeepAliveJob) -> PushResult<()> {
        self.record(Call::Schedule(*job));
        if self.reject_schedule {
            return Err(PushError::Platform("scheduler refused".to_owned()));
        }
        self.jobs.lock().unwrap().insert(job.job_id, *job);
        Ok(())
    }
}

impl NotificationService for FakePlatform {
    fn cancel_all(&self) -> PushResult<()> {
        self.record(Call::CancelAll);
        *self.outstanding_notifications.lock().unwrap() = 0;
        Ok(())
    }
}

impl PlatformCapabilities for FakePlatform {
    fn supports_persistent_periodic_jobs(&self) -> bool {
        self.persistent_jobs
    }

    fn requires_notification_permission(&self) -> bool {
        self.permission_required
    }
}

impl LaunchArgumentSink for FakePlatform {
    fn deliver_launch_argument(&self, key: &str, value: &str) -> PushResult<()> {
        if self.sink_closed {
            return Err(PushError::DeliveryUnavailable);
        }
        self.record(Call::Deliver(key.to_owned(), value.to_owned()));
        Ok(())
    }
}

pub fn delivered(calls: &[Call]) -> Vec<LaunchPayload> {
    calls
        .iter()
        .filter_map(|call| match call {
            Call::Deliver(key, value) => Some(LaunchPayload {
                key: key.clone(),
                value: value.clone(),
            }),
            _ => None,
        })
        .collect()
}
