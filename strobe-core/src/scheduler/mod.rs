//! Blink scheduler
//!
//! One background loop serves every channel. It sleeps until the earliest
//! pending edge, and when woken early by a new request it charges the time
//! already slept to every channel that was not just re-armed:
//!
//! ```text
//! Sleeping(deadline) ──timeout──▶ Advancing ──▶ Sleeping(next)
//!        │                             ▲
//!        └──signal──▶ Correcting ──────┘ (once the deadline hits zero)
//! ```

mod deadline;
mod executor;

pub use deadline::IDLE_WAIT_TICKS;
