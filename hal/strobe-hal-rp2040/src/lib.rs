//! RP2040-specific HAL for the Strobe blink scheduler
//!
//! This crate provides RP2040 implementations of the `strobe-hal` traits:
//! - LED outputs on `Flex` GPIO pins
//! - Millisecond tick clock and wake signal on `embassy-time`
//! - A GPIO bank that hands out pins by number for config-driven setup

#![no_std]

pub mod gpio;
pub mod led;
pub mod pins;
pub mod time;

pub use led::FlexLed;
pub use time::{EmbassyClock, EmbassyWake, TICKS_PER_SECOND};
