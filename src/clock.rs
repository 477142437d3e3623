//! Simulated clock
//!
//! The marketplace runs on a user-advanceable clock: it starts at the real
//! wall-clock instant, moves forward only in whole days when asked, and can
//! be reset. Engine calls take the instant as an explicit parameter; this
//! handle is just where the HTTP layer reads it from.

use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, RwLock};

#[derive(Clone, Debug)]
pub struct SimClock {
    inner: Arc<RwLock<DateTime<Utc>>>,
}

impl SimClock {
    pub fn starting_now() -> Self {
        Self::at(Utc::now())
    }

    pub fn at(instant: DateTime<Utc>) -> Self {
        Self { inner: Arc::new(RwLock::new(instant)) }
    }

    pub fn now(&self) -> DateTime<Utc> {
        *self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Move the simulated clock forward and return the new instant.
    pub fn advance_days(&self, days: i64) -> DateTime<Utc> {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *guard = *guard + Duration::days(days);
        *guard
    }

    /// Snap back to the real wall clock.
    pub fn reset(&self) -> DateTime<Utc> {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *guard = Utc::now();
        *guard
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::starting_now()
    }
}
