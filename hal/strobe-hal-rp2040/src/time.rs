//! Scheduler timing on `embassy-time`
//!
//! Both the clock and the wake signal count in milliseconds, so the
//! blinker must be configured with [`TICKS_PER_SECOND`].

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{with_timeout, Duration, Instant};
use strobe_hal::{TickClock, WaitOutcome, WakeSignal};

/// Scheduler tick rate of [`EmbassyClock`] and [`EmbassyWake`]
pub const TICKS_PER_SECOND: u32 = 1000;

/// Milliseconds since boot
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl TickClock for EmbassyClock {
    fn now_ticks(&self) -> u64 {
        Instant::now().as_millis()
    }
}

/// Wake signal usable from any task or interrupt
pub struct EmbassyWake {
    signal: Signal<CriticalSectionRawMutex, ()>,
}

impl EmbassyWake {
    pub const fn new() -> Self {
        Self {
            signal: Signal::new(),
        }
    }
}

impl Default for EmbassyWake {
    fn default() -> Self {
        Self::new()
    }
}

impl WakeSignal for EmbassyWake {
    fn signal(&self) {
        self.signal.signal(());
    }

    async fn wait(&self, timeout_ticks: u64) -> WaitOutcome {
        match with_timeout(Duration::from_millis(timeout_ticks), self.signal.wait()).await {
            Ok(()) => WaitOutcome::Signaled,
            Err(_) => WaitOutcome::TimedOut,
        }
    }

    fn reset(&self) {
        self.signal.reset();
    }
}
