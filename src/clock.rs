//! Timestamps for columns that do not carry one.

use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

/// How the loader stamps columns without an explicit timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampPolicy {
    /// Current time in milliseconds, strictly increasing from one load to
    /// the next on the same loader
    #[default]
    WallClock,

    /// The same timestamp on every load
    Fixed(i64),
}

/// Hands out one timestamp per load according to a [`TimestampPolicy`].
#[derive(Debug)]
pub(crate) struct LoadClock {
    policy: TimestampPolicy,
    last: AtomicI64,
}

impl LoadClock {
    pub(crate) fn new(policy: TimestampPolicy) -> Self {
        Self {
            policy,
            last: AtomicI64::new(i64::MIN),
        }
    }

    pub(crate) fn policy(&self) -> TimestampPolicy {
        self.policy
    }

    /// Timestamp for the next load.
    pub(crate) fn next(&self) -> i64 {
        match self.policy {
            TimestampPolicy::Fixed(ts) => ts,
            TimestampPolicy::WallClock => {
                let now = Utc::now().timestamp_millis();
                let previous = self
                    .last
                    .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                        Some(now.max(last.saturating_add(1)))
                    })
                    .unwrap_or(now);
                now.max(previous.saturating_add(1))
            }
        }
    }
}
