//! Hourly keep-alive job.
//!
//! The job lets the push SDK refresh its delivery channels after the app was
//! forcibly closed. Scheduling is best effort.

use std::time::Duration;

use serde::Deserialize;

use crate::backend::{JobScheduler, PlatformCapabilities};

/// Default identity of the keep-alive job.
pub const DEFAULT_JOB_ID: i32 = 0x5055_5348;

/// One hour.
pub const DEFAULT_PERIOD_MILLIS: u64 = 60 * 60 * 1000;

/// Describes the recurring keep-alive job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KeepAliveJob {
    /// Job identity. Scheduling again with the same id replaces the job.
    pub job_id: i32,
    /// Period between runs, in milliseconds.
    pub period_millis: u64,
    /// Whether the job survives reboots.
    pub persisted: bool,
}

impl Default for KeepAliveJob {
    fn default() -> Self {
        Self {
            job_id: DEFAULT_JOB_ID,
            period_millis: DEFAULT_PERIOD_MILLIS,
            persisted: true,
        }
    }
}

impl KeepAliveJob {
    /// Period between runs.
    #[must_use]
    pub const fn period(&self) -> Duration {
        Duration::from_millis(self.period_millis)
    }
}

/// What happened to a keep-alive request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeepAliveOutcome {
    /// The job was handed to the OS scheduler.
    Scheduled,
    /// The platform cannot persist periodic jobs; nothing was requested.
    Unsupported,
    /// The scheduler refused the job.
    Failed(String),
}

/// Register `job` with the OS scheduler if the platform supports it.
///
/// Failures are logged and reported in the outcome, never propagated.
pub(crate) fn schedule_keep_alive(
    capabilities: &dyn PlatformCapabilities,
    scheduler: &dyn JobScheduler,
    job: &KeepAliveJob,
) -> KeepAliveOutcome {
    if !capabilities.supports_persistent_periodic_jobs() {
        log::debug!("persistent periodic jobs unsupported, skipping keep-alive job");
        return KeepAliveOutcome::Unsupported;
    }

    match scheduler.schedule(job) {
        Ok(()) => {
            log::debug!(
                "keep-alive job {} scheduled every {:?}",
                job.job_id,
                job.period()
            );
            KeepAliveOutcome::Scheduled
        }
        Err(e) => {
            log::warn!("failed to schedule keep-alive job {}: {e}", job.job_id);
            KeepAliveOutcome::Failed(e.to_string())
        }
    }
}
