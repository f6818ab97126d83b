//! GPIO pin abstractions
//!
//! Provides traits for the digital outputs driven by the blink scheduler.

use core::ops::Not;

/// Physical pin level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low,
    High,
}

impl Not for Level {
    type Output = Level;

    fn not(self) -> Level {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Pin direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    /// Actively driven
    Output,
    /// Floating (high impedance)
    Input,
}

/// Digital output pin
///
/// Implementations should handle the actual hardware register manipulation
/// for the specific chip.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;

    /// Set the pin to a specific level
    fn set_level(&mut self, level: Level) {
        match level {
            Level::High => self.set_high(),
            Level::Low => self.set_low(),
        }
    }

    /// Level the pin is currently driven to
    fn output_level(&self) -> Level {
        Level::from(self.is_set_high())
    }

    /// Toggle the pin state
    fn toggle(&mut self) {
        let next = !self.output_level();
        self.set_level(next);
    }
}

/// Output that can also be released to a floating input
///
/// Blink channels switch their pin to [`PinMode::Output`] when claimed and
/// back to [`PinMode::Input`] when released.
pub trait BlinkPin: OutputPin {
    /// Change the pin direction
    fn set_mode(&mut self, mode: PinMode);
}
