//! Hardware stand-ins for hosts without GPIO.
//!
//! LED and relay changes are logged and their last state kept so the
//! runtime can report it.

use shared_types::{Indicator, IndicatorLed, LockActuator};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

#[derive(Debug, Default)]
pub struct LoggingIndicator {
    processing: AtomicBool,
    granted: AtomicBool,
    denied: AtomicBool,
}

impl LoggingIndicator {
    fn slot(&self, led: IndicatorLed) -> &AtomicBool {
        match led {
            IndicatorLed::Processing => &self.processing,
            IndicatorLed::Granted => &self.granted,
            IndicatorLed::Denied => &self.denied,
        }
    }

    #[must_use]
    pub fn is_on(&self, led: IndicatorLed) -> bool {
        self.slot(led).load(Ordering::Acquire)
    }
}

impl Indicator for LoggingIndicator {
    fn set(&self, led: IndicatorLed, on: bool) {
        let was = self.slot(led).swap(on, Ordering::AcqRel);
        if was != on {
            debug!(?led, on, "LED changed");
        }
    }
}

#[derive(Debug, Default)]
pub struct LoggingLockActuator {
    unlocked: AtomicBool,
}

impl LoggingLockActuator {
    #[must_use]
    pub fn is_unlocked(&self) -> bool {
        self.unlocked.load(Ordering::Acquire)
    }
}

impl LockActuator for LoggingLockActuator {
    fn unlock(&self) {
        self.unlocked.store(true, Ordering::Release);
        info!("🔓 Relay energized, door unlocked");
    }

    fn lock(&self) {
        self.unlocked.store(false, Ordering::Release);
        info!("🔒 Relay released, door locked");
    }
}
