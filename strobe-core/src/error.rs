//! Blink operation errors
//!
//! Operating on a channel id that is not initialized is a contract
//! violation and panics instead of returning one of these.

/// Recoverable failures of the public blink operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlinkError {
    /// Every channel slot is already in use
    CapacityExceeded,
    /// Pulse width exceeds the period
    InvalidParameters,
    /// Lock was busy and the caller could not wait; the request was dropped
    LockUnavailable,
    /// The scheduler task could not be started
    SchedulerUnavailable,
}
