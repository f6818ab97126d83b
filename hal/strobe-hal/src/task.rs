//! Background task creation
//!
//! The scheduler task is started lazily when the first channel is claimed.
//! It stops on its own once the last channel is released, so there is no
//! explicit destroy operation.

/// Errors from starting the scheduler task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpawnError {
    /// The task slot is still occupied by a previous instance
    Busy,
    /// The host cannot run the task at all
    Unsupported,
}

/// Starts the scheduler task
pub trait SchedulerSpawner {
    /// Spawn a task that runs the scheduler loop to completion
    fn spawn_scheduler(&self) -> Result<(), SpawnError>;
}
