//! Relaying the notification that launched or resumed the app.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use async_channel::{Receiver, Sender, bounded, unbounded};

use crate::backend::LaunchArgumentSink;
use crate::{PushError, PushResult};

/// Key identifying "the app was opened via a push notification".
pub const LAUNCH_PUSH_NOTIFICATION_KEY: &str = "Launch.PushNotification";

/// The notification payload that launched or resumed the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPayload {
    /// Argument key understood by the host runtime.
    pub key: String,
    /// Opaque notification identifier.
    pub value: String,
}

/// Forwards launch payloads to the host, remembering the last one.
pub(crate) struct LaunchRelay {
    sink: Arc<dyn LaunchArgumentSink>,
    last: Mutex<Option<LaunchPayload>>,
}

impl fmt::Debug for LaunchRelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LaunchRelay")
            .field("last", &self.last_relayed())
            .finish_non_exhaustive()
    }
}

impl LaunchRelay {
    pub(crate) fn new(sink: Arc<dyn LaunchArgumentSink>) -> Self {
        Self {
            sink,
            last: Mutex::new(None),
        }
    }

    /// Record the payload and hand it to the host once, synchronously.
    pub(crate) fn notify(&self, key: &str, value: &str) -> PushResult<()> {
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some(LaunchPayload {
            key: key.to_owned(),
            value: value.to_owned(),
        });
        self.sink.deliver_launch_argument(key, value)
    }

    pub(crate) fn last_relayed(&self) -> Option<LaunchPayload> {
        self.last
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// A [`LaunchArgumentSink`] that feeds an async channel.
///
/// Delivery fails with [`PushError::DeliveryUnavailable`] once every
/// receiver has been dropped. A bounded sink drops the oldest queued payload
/// when full, so an undrained receiver never grows past its capacity.
#[derive(Debug, Clone)]
pub struct ChannelLaunchSink {
    sender: Sender<LaunchPayload>,
}

impl ChannelLaunchSink {
    /// Create a sink and the receiver the host reads launch payloads from.
    #[must_use]
    pub fn new() -> (Self, Receiver<LaunchPayload>) {
        let (sender, receiver) = unbounded();
        (Self { sender }, receiver)
    }

    /// Like [`Self::new`], keeping at most `capacity` undelivered payloads.
    #[must_use]
    pub fn bounded(capacity: usize) -> (Self, Receiver<LaunchPayload>) {
        let (sender, receiver) = bounded(capacity.max(1));
        (Self { sender }, receiver)
    }
}

impl LaunchArgumentSink for ChannelLaunchSink {
    fn deliver_launch_argument(&self, key: &str, value: &str) -> PushResult<()> {
        let displaced = self
            .sender
            .force_send(LaunchPayload {
                key: key.to_owned(),
                value: value.to_owned(),
            })
            .map_err(|_| PushError::DeliveryUnavailable)?;
        if let Some(payload) = displaced {
            log::debug!("launch queue full, dropped {:?}", payload.value);
        }
        Ok(())
    }
}
