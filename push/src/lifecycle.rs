//! Foreground/background tracking.

use std::sync::atomic::{AtomicBool, Ordering};

/// Whether the host application is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LifecycleState {
    /// The app is in the foreground.
    #[default]
    Foreground,
    /// The app is paused.
    Background,
}

/// A lifecycle transition reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    /// The host activity was paused.
    Pause,
    /// The host activity was resumed.
    Resume,
}

impl LifecycleEvent {
    /// Parse a host event string. Anything other than `"pause"` or `"resume"`
    /// yields `None`.
    #[must_use]
    pub fn parse(event: &str) -> Option<Self> {
        match event {
            "pause" => Some(Self::Pause),
            "resume" => Some(Self::Resume),
            _ => None,
        }
    }
}

/// Process-lifetime lifecycle flag, owned by the coordinator.
#[derive(Debug)]
pub struct LifecycleTracker {
    active: AtomicBool,
}

impl LifecycleTracker {
    /// Create a tracker in the foreground state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            active: AtomicBool::new(true),
        }
    }

    /// Apply a raw host event. Unknown or empty events are ignored.
    pub fn on_lifecycle_event(&self, event: &str) {
        match LifecycleEvent::parse(event) {
            Some(event) => self.apply(event),
            None => log::trace!("ignoring lifecycle event {event:?}"),
        }
    }

    /// Apply a parsed event.
    pub fn apply(&self, event: LifecycleEvent) {
        self.active
            .store(event == LifecycleEvent::Resume, Ordering::Release);
    }

    /// Whether the app is currently in the foreground.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> LifecycleState {
        if self.is_active() {
            LifecycleState::Foreground
        } else {
            LifecycleState::Background
        }
    }
}

impl Default for LifecycleTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_in_foreground() {
        let tracker = LifecycleTracker::new();
        assert!(tracker.is_active());
        assert_eq!(tracker.state(), LifecycleState::Foreground);
    }

    #[test]
    fn last_pause_or_resume_wins() {
        let tracker = LifecycleTracker::new();
        for event in ["pause", "stop", "resume", "", "pause", "destroy"] {
            tracker.on_lifecycle_event(event);
        }
        assert!(!tracker.is_active());

        tracker.on_lifecycle_event("resume");
        tracker.on_lifecycle_event("PAUSE");
        assert_eq!(tracker.state(), LifecycleState::Foreground);
    }

    #[test]
    fn unknown_events_keep_default() {
        let tracker = LifecycleTracker::new();
        tracker.on_lifecycle_event("start");
        tracker.on_lifecycle_event("");
        assert!(tracker.is_active());
    }
}
