//! # System Clock
//!
//! [`Clock`] is the logical tick source: a monotonically increasing pulse
//! counter plus the configured tick period. The clock's listener chain
//! (CPU, then Memory, then InterruptController) is realized as the fixed
//! call order inside `System::pulse`; the order is set at boot and never
//! changes, which is what makes the machine deterministic.
//!
//! [`Timer`] paces the interactive run loop so pulses fire at the
//! configured period in wall-clock time. Tests never touch it: they call
//! `System::pulse` directly and the simulation advances as fast as the
//! host allows.

use std::time::Duration;

#[cfg(test)]
use fake_clock::FakeClock as Instant;
#[cfg(not(test))]
use std::time::Instant;

#[cfg(not(test))]
use spin_sleep::sleep;
#[cfg(test)]
fn sleep(duration: Duration) {
    fake_clock::FakeClock::advance_time(duration.as_millis() as u64);
}

/// Default tick period for the interactive run loop: 1 kHz.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(1);

/// Pulse counter and tick period for one machine.
pub struct Clock {
    /// Wall-clock duration of one pulse in the interactive run loop.
    period: Duration,

    /// Pulses fired since boot.
    ticks: u64,
}

impl Clock {
    /// Creates a clock with the given tick period and a zeroed counter.
    pub fn new(period: Duration) -> Self {
        Self { period, ticks: 0 }
    }

    /// Advances the pulse counter and returns the new count.
    pub fn advance(&mut self) -> u64 {
        self.ticks += 1;
        self.ticks
    }

    /// Pulses fired since boot.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// The configured tick period.
    pub fn period(&self) -> Duration {
        self.period
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_PERIOD)
    }
}

/// Wall-clock pacing for the interactive run loop.
///
/// Sleeping is never exact; the timer tracks how far past the deadline
/// each sleep ran (`runover`) and shaves that debt off subsequent pauses
/// so the average pulse rate converges on the configured period.
pub struct Timer {
    instant: Instant,
    runover: Duration,
}

impl Timer {
    /// Starts a timer at the current instant with no accumulated debt.
    pub fn start() -> Self {
        Timer {
            instant: Instant::now(),
            runover: Duration::ZERO,
        }
    }

    /// Time elapsed since the timer was started or last paused.
    pub fn elapsed(&self) -> Duration {
        self.instant.elapsed()
    }

    /// Sleeps out the remainder of one `period`, accounting for time
    /// already spent since the previous pause and for accumulated
    /// oversleep. If the caller has already overrun the period, returns
    /// immediately.
    pub fn pause_for(&mut self, period: Duration) {
        let elapsed = self.elapsed();
        let remaining = period.saturating_sub(elapsed);

        if self.runover < remaining {
            let should_sleep = remaining - self.runover;
            let before = Instant::now();

            sleep(should_sleep);

            self.runover = before.elapsed().saturating_sub(should_sleep);
        } else {
            self.runover -= remaining;
        }

        self.instant = Instant::now();
    }
}
