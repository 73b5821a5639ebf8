//! Time sources and per-tick code snapshots
//!
//! The engine itself only ever sees an explicit millisecond timestamp. A
//! [`Clock`] is how a polling caller supplies that timestamp, which keeps the
//! wall clock out of tests.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::Error;

/// Remaining seconds at or below which a code is considered about to expire
pub const EXPIRY_WARNING_SECS: u64 = 5;

/// Source of Unix time in milliseconds
pub trait Clock: Send + Sync {
    /// Current Unix time in milliseconds
    ///
    /// # Errors
    ///
    /// Returns an error when the time cannot be represented as a Unix timestamp.
    fn now_millis(&self) -> Result<u64, Error>;
}

/// Wall clock backed by [`SystemTime`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> Result<u64, Error> {
        let elapsed = SystemTime::now().duration_since(UNIX_EPOCH)?;
        Ok(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
    }
}

/// A clock frozen at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now_millis(&self) -> Result<u64, Error> {
        Ok(self.0)
    }
}

/// A code together with the timing metadata needed to display it
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Snapshot {
    /// Zero-padded code valid for the current period
    pub code: String,
    /// Seconds until the code rolls over, in `1..=period`
    pub remaining: u64,
    /// Period length in seconds
    pub period: u64,
}

impl Snapshot {
    /// `true` once [`EXPIRY_WARNING_SECS`] or fewer seconds are left
    #[must_use]
    pub const fn expires_soon(&self) -> bool {
        self.remaining <= EXPIRY_WARNING_SECS
    }

    /// Fraction of the period still left, in `(0, 1]`
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self) -> f64 {
        self.remaining as f64 / self.period as f64
    }
}
