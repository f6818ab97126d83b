//! Monotonic tick clock

/// Monotonic tick counter
///
/// The tick rate must match the rate the [`crate::WakeSignal`] timeout is
/// expressed in.
pub trait TickClock {
    /// Ticks since an arbitrary fixed origin
    fn now_ticks(&self) -> u64;

    /// Ticks elapsed since `since`
    fn elapsed_since(&self, since: u64) -> u64 {
        self.now_ticks().saturating_sub(since)
    }
}
