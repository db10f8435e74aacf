//! Time source used to stamp knowledge item lifecycle fields.
//!
//! Services read time only through `Clock` so tests can pin instants.

use crate::model::knowledge_item::EpochMillis;
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of "now" in Unix epoch milliseconds.
pub trait Clock {
    fn now_millis(&self) -> EpochMillis;
}

/// Wall-clock time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> EpochMillis {
        // A clock set before 1970 reads as the epoch itself.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as EpochMillis)
            .unwrap_or_default()
    }
}

/// Clock frozen at a single instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub EpochMillis);

impl Clock for FixedClock {
    fn now_millis(&self) -> EpochMillis {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_millis(&self) -> EpochMillis {
        (**self).now_millis()
    }
}
