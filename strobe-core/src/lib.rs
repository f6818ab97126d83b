//! Shared soft-timer blink scheduler
//!
//! Drives any number of on/off outputs through timed blink sequences from a
//! single background task:
//!
//! - Channel store (fixed pool of channel slots)
//! - Sequence engine (per-channel edge automaton with one staged sequence)
//! - Deadline aggregator (drift correction across all channels)
//! - Scheduler loop (sleep, correct, advance)
//! - Configuration types and parser
//! - Console command parsing

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

mod fmt;

pub mod blinker;
pub mod channel;
pub mod config;
pub mod error;
pub mod scheduler;
pub mod shell;

#[cfg(test)]
pub(crate) mod testing;

pub use blinker::Blinker;
pub use channel::{BlinkCount, ChannelId, ChannelState, Edge, Sequence};
pub use error::BlinkError;
pub use scheduler::IDLE_WAIT_TICKS;
