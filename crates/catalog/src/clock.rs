//! Wall-clock source for freshness checks.

use std::sync::Arc;
use time::UtcDateTime;

pub trait Clock: Send + Sync {
    fn now(&self) -> UtcDateTime;
}

pub type ClockHandle = Arc<dyn Clock + Send + Sync>;

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> UtcDateTime {
        UtcDateTime::now()
    }
}

/// A clock that only moves when told to. For tests.
#[cfg(any(test, feature = "mock"))]
#[derive(Debug)]
pub struct ManualClock {
    now: std::sync::Mutex<UtcDateTime>,
}

#[cfg(any(test, feature = "mock"))]
impl ManualClock {
    pub fn new(now: UtcDateTime) -> Self {
        Self {
            now: std::sync::Mutex::new(now),
        }
    }

    pub fn set(&self, now: UtcDateTime) {
        *self.now.lock().unwrap_or_else(std::sync::PoisonError::into_inner) = now;
    }

    pub fn advance(&self, by: time::Duration) {
        let mut now = self.now.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        *now = *now + by;
    }
}

#[cfg(any(test, feature = "mock"))]
impl Clock for ManualClock {
    fn now(&self) -> UtcDateTime {
        *self.now.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
