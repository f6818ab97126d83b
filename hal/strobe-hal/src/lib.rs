//! Strobe Hardware Abstraction Layer
//!
//! This crate defines the contracts the blink scheduler consumes from its
//! host environment. Chip-specific crates implement them for real hardware;
//! the scheduler's own test suite implements them with simulated time.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (strobe-firmware, etc.)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  strobe-core (scheduler, channels)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  strobe-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!           ┌───────────────────┐
//!           │ strobe-hal-rp2040 │
//!           └───────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::BlinkPin`] - Digital outputs that can be floated
//! - [`wait::WakeSignal`] - Wait-with-timeout primitive the scheduler sleeps on
//! - [`clock::TickClock`] - Monotonic tick counter
//! - [`task::SchedulerSpawner`] - Starts the background scheduler task

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod gpio;
pub mod task;
pub mod wait;

// Re-export key traits at crate root for convenience
pub use clock::TickClock;
pub use gpio::{BlinkPin, Level, OutputPin, PinMode};
pub use task::{SchedulerSpawner, SpawnError};
pub use wait::{WaitOutcome, WakeSignal};
