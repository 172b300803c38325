//! # Hardware Ports
//!
//! Status LEDs, the door relay and the wall clock, as seen by the protocol
//! crates. Board adapters live in `node-runtime`.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::debug;

/// The three status LEDs on the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorLed {
    /// Yellow; blinks while waiting on the network.
    Processing,
    /// Blue; access granted.
    Granted,
    /// Red; access denied.
    Denied,
}

impl IndicatorLed {
    pub const ALL: [IndicatorLed; 3] = [Self::Processing, Self::Granted, Self::Denied];
}

pub trait Indicator: Send + Sync {
    fn set(&self, led: IndicatorLed, on: bool);

    fn all_off(&self) {
        for led in IndicatorLed::ALL {
            self.set(led, false);
        }
    }
}

/// Door lock relay.
pub trait LockActuator: Send + Sync {
    /// Energize the relay (door open).
    fn unlock(&self);
    /// De-energize the relay (door locked).
    fn lock(&self);
}

pub trait Clock: Send + Sync {
    /// Local time formatted `YYYY-MM-DD HH:MM:SS`.
    fn timestamp(&self) -> String;
}

/// Wall clock backed by the host's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn timestamp(&self) -> String {
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Indicator for headless nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullIndicator;

impl Indicator for NullIndicator {
    fn set(&self, _led: IndicatorLed, _on: bool) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullLockActuator;

impl LockActuator for NullLockActuator {
    fn unlock(&self) {}
    fn lock(&self) {}
}

/// Blinks one LED on a fixed period until dropped.
///
/// The LED is left off when the blinker stops.
pub struct WaitIndicator {
    task: JoinHandle<()>,
    indicator: Arc<dyn Indicator>,
    led: IndicatorLed,
}

impl WaitIndicator {
    /// Start blinking. Must be called from within a tokio runtime.
    pub fn start(indicator: Arc<dyn Indicator>, led: IndicatorLed, period: Duration) -> Self {
        debug!(?led, ?period, "Wait indicator started");
        let blinking = indicator.clone();
        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            let mut on = false;
            loop {
                ticker.tick().await;
                on = !on;
                blinking.set(led, on);
            }
        });
        Self {
            task,
            indicator,
            led,
        }
    }

    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for WaitIndicator {
    fn drop(&mut self) {
        self.task.abort();
        self.indicator.set(self.led, false);
        debug!(led = ?self.led, "Wait indicator stopped");
    }
}
