//! Process-wide service holder for native bridges.
//!
//! The host may re-enter its init path with a new activity (configuration
//! change, relaunch in the same process). The service is created once; later
//! binds only swap the platform's activity.

use std::sync::{Arc, Mutex, PoisonError};

use crate::PushResult;

/// Result of [`BridgeSlot::bind`].
#[derive(Debug)]
pub(crate) enum Binding<S> {
    /// The service was created by this call.
    Created(Arc<S>),
    /// An existing service was kept and its platform rebound.
    Rebound(Arc<S>),
}

impl<S> Binding<S> {
    pub(crate) fn into_service(self) -> Arc<S> {
        match self {
            Self::Created(service) | Self::Rebound(service) => service,
        }
    }
}

pub(crate) struct BridgeSlot<P, S> {
    entry: Mutex<Option<(Arc<P>, Arc<S>)>>,
}

impl<P, S> BridgeSlot<P, S> {
    pub(crate) const fn new() -> Self {
        Self {
            entry: Mutex::new(None),
        }
    }

    pub(crate) fn service(&self) -> Option<Arc<S>> {
        self.entry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|(_, service)| service.clone())
    }

    /// Rebind the existing platform, or create platform and service.
    ///
    /// `context` is handed to whichever closure runs. `create` never runs
    /// when a service already exists, and a failed `create` leaves the slot
    /// empty.
    pub(crate) fn bind<X, R, C>(&self, context: X, rebind: R, create: C) -> PushResult<Binding<S>>
    where
        R: FnOnce(&P, X) -> PushResult<()>,
        C: FnOnce(X) -> PushResult<(Arc<P>, Arc<S>)>,
    {
        let mut entry = self.entry.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((platform, service)) = entry.as_ref() {
            rebind(platform, context)?;
            return Ok(Binding::Rebound(service.clone()));
        }

        let (platform, service) = create(context)?;
        *entry = Some((platform, service.clone()));
        Ok(Binding::Created(service))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PushError;

    struct Host {
        activity: Mutex<&'static str>,
    }

    fn host(activity: &'static str) -> PushResult<(Arc<Host>, Arc<String>)> {
        Ok((
            Arc::new(Host {
                activity: Mutex::new(activity),
            }),
            Arc::new(format!("service for {activity}")),
        ))
    }

    #[test]
    fn second_bind_swaps_activity() {
        let slot: BridgeSlot<Host, String> = BridgeSlot::new();
        assert!(slot.service().is_none());

        let first = slot
            .bind((), |_, ()| panic!("nothing to rebind"), |()| host("a1"))
            .unwrap();
        assert!(matches!(first, Binding::Created(_)));

        let mut created_again = false;
        let second = slot
            .bind(
                "a2",
                |platform, activity| {
                    *platform.activity.lock().unwrap() = activity;
                    Ok(())
                },
                |activity| {
                    created_again = true;
                    host(activity)
                },
            )
            .unwrap();

        assert!(!created_again);
        assert!(matches!(&second, Binding::Rebound(_)));
        assert_eq!(*second.into_service(), "service for a1");
        assert_eq!(slot.service().as_deref().map(String::as_str), Some("service for a1"));

        let entry = slot.entry.lock().unwrap();
        let (platform, _) = entry.as_ref().unwrap();
        assert_eq!(*platform.activity.lock().unwrap(), "a2");
    }

    #[test]
    fn failed_create_leaves_slot_empty() {
        let slot: BridgeSlot<Host, String> = BridgeSlot::new();
        let failed = slot.bind(
            (),
            |_, ()| Ok(()),
            |()| Err(PushError::Platform("no JVM".to_owned())),
        );
        assert!(failed.is_err());
        assert!(slot.service().is_none());

        let created = slot.bind((), |_, ()| Ok(()), |()| host("a1")).unwrap();
        assert!(matches!(created, Binding::Created(_)));
    }

    #[test]
    fn rebind_failure_is_reported() {
        let slot: BridgeSlot<Host, String> = BridgeSlot::new();
        slot.bind((), |_, ()| Ok(()), |()| host("a1")).unwrap();
        let result = slot.bind(
            (),
            |_, ()| Err(PushError::Platform("stale env".to_owned())),
            |()| host("a2"),
        );
        assert_eq!(result.err(), Some(PushError::Platform("stale env".to_owned())));
        assert!(slot.service().is_some());
    }
}
