//! Google Play Services availability probing.

use std::fmt;

use crate::PushResult;
use crate::backend::PushServices;

/// `ConnectionResult` codes (must match Play Services).
const SUCCESS: i32 = 0;
const SERVICE_MISSING: i32 = 1;
const SERVICE_VERSION_UPDATE_REQUIRED: i32 = 2;
const SERVICE_DISABLED: i32 = 3;
const SERVICE_INVALID: i32 = 9;
const SERVICE_UPDATING: i32 = 18;

/// Availability of the push services on this device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AvailabilityStatus {
    /// Services are present and usable.
    Success,
    /// Services are not installed.
    ServiceMissing,
    /// The installed services are outdated.
    UpdateRequired,
    /// Services are installed but disabled.
    ServiceDisabled,
    /// The installed services are not authentic.
    ServiceInvalid,
    /// Services are being updated.
    ServiceUpdating,
    /// Any other result code.
    Other(i32),
}

impl AvailabilityStatus {
    /// Map a raw SDK result code.
    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        match code {
            SUCCESS => Self::Success,
            SERVICE_MISSING => Self::ServiceMissing,
            SERVICE_VERSION_UPDATE_REQUIRED => Self::UpdateRequired,
            SERVICE_DISABLED => Self::ServiceDisabled,
            SERVICE_INVALID => Self::ServiceInvalid,
            SERVICE_UPDATING => Self::ServiceUpdating,
            other => Self::Other(other),
        }
    }

    /// The raw SDK result code.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Success => SUCCESS,
            Self::ServiceMissing => SERVICE_MISSING,
            Self::UpdateRequired => SERVICE_VERSION_UPDATE_REQUIRED,
            Self::ServiceDisabled => SERVICE_DISABLED,
            Self::ServiceInvalid => SERVICE_INVALID,
            Self::ServiceUpdating => SERVICE_UPDATING,
            Self::Other(code) => code,
        }
    }
}

impl fmt::Display for AvailabilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::ServiceMissing => write!(f, "service missing"),
            Self::UpdateRequired => write!(f, "service update required"),
            Self::ServiceDisabled => write!(f, "service disabled"),
            Self::ServiceInvalid => write!(f, "service invalid"),
            Self::ServiceUpdating => write!(f, "service updating"),
            Self::Other(code) => write!(f, "unknown result code {code}"),
        }
    }
}

/// Outcome of an availability check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Availability {
    /// Mapped status.
    pub status: AvailabilityStatus,
    /// Diagnostic text, present for every non-success status.
    pub message: Option<String>,
}

impl Availability {
    /// Whether the services are usable.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == AvailabilityStatus::Success
    }

    /// The raw SDK result code.
    #[must_use]
    pub const fn code(&self) -> i32 {
        self.status.code()
    }
}

/// Query the SDK and attach diagnostic text on failure.
///
/// An unavailable service is a normal result. Only faults inside the SDK call
/// itself are returned as errors.
pub(crate) fn check(services: &dyn PushServices) -> PushResult<Availability> {
    log::debug!("Checking if Google Play Services is available on device");

    let code = services.check_availability()?;
    let status = AvailabilityStatus::from_code(code);
    if status == AvailabilityStatus::Success {
        log::debug!("Google Play Services found");
        return Ok(Availability {
            status,
            message: None,
        });
    }

    let mut message = services.resolve_error_text(code)?;
    if message.is_empty() {
        message = status.to_string();
    }
    log::warn!("Google Play Services Error: {message}");

    Ok(Availability {
        status,
        message: Some(message),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_map_both_ways() {
        for code in [0, 1, 2, 3, 9, 18] {
            let status = AvailabilityStatus::from_code(code);
            assert!(!matches!(status, AvailabilityStatus::Other(_)));
            assert_eq!(status.code(), code);
        }
    }

    #[test]
    fn unknown_codes_are_preserved() {
        assert_eq!(
            AvailabilityStatus::from_code(42),
            AvailabilityStatus::Other(42)
        );
        assert_eq!(AvailabilityStatus::Other(42).code(), 42);
    }
}
