//! Wait-and-signal primitive
//!
//! The scheduler sleeps on a [`WakeSignal`] until either its deadline
//! expires or another context signals that channel state changed.

use core::future::Future;

/// Result of a bounded wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WaitOutcome {
    /// Woken early by [`WakeSignal::signal`]
    Signaled,
    /// The full timeout elapsed
    TimedOut,
}

/// Release-once wake primitive
///
/// Multiple signals raised before the waiter runs coalesce into a single
/// wakeup. Implementations must allow `signal` from any context, including
/// ones that cannot block.
pub trait WakeSignal {
    /// Wake the waiter (or make the next wait return immediately)
    fn signal(&self);

    /// Wait for a signal for at most `timeout_ticks` scheduler ticks
    fn wait(&self, timeout_ticks: u64) -> impl Future<Output = WaitOutcome>;

    /// Drop any pending signal
    fn reset(&self);
}
