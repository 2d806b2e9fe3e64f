//! Badge bookkeeping.

use std::sync::atomic::{AtomicI32, Ordering};

/// In-memory badge count.
///
/// The value is stored verbatim and never pushed to the launcher; callers keep
/// it consistent with what the OS displays.
#[derive(Debug, Default)]
pub struct BadgeCounter {
    count: AtomicI32,
}

impl BadgeCounter {
    /// Create a counter at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            count: AtomicI32::new(0),
        }
    }

    /// Store `count` without validation.
    pub fn set(&self, count: i32) {
        self.count.store(count, Ordering::Release);
    }

    /// Current count.
    #[must_use]
    pub fn get(&self) -> i32 {
        self.count.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::BadgeCounter;

    #[test]
    fn stores_verbatim() {
        let badge = BadgeCounter::new();
        assert_eq!(badge.get(), 0);
        for n in [5, 0, -3, i32::MAX] {
            badge.set(n);
            assert_eq!(badge.get(), n);
        }
    }
}
