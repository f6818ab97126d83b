//! Configuration type definitions

use heapless::{String, Vec};
use strobe_hal::Level;

use crate::channel::{BlinkCount, Transitions};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum label length
pub const MAX_LABEL_LEN: usize = 16;

/// Maximum LEDs per config
pub const MAX_LEDS: usize = 8;

/// Default scheduler tick rate
pub const DEFAULT_TICKS_PER_SECOND: u32 = 1000;

/// Off time before a request that interrupts an infinite sequence (ms)
pub const DEFAULT_START_TRANSITION_MS: u32 = 500;

/// Off time before an interrupted infinite sequence resumes (ms)
pub const DEFAULT_END_TRANSITION_MS: u32 = 5000;

/// Scheduler timing configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BlinkConfig {
    /// Scheduler tick rate (must match the wake signal's timeout unit)
    pub ticks_per_second: u32,
    /// Pause before a foreground request replaces an infinite pattern
    pub start_transition_ms: u32,
    /// Pause before an interrupted infinite pattern resumes
    pub end_transition_ms: u32,
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self {
            ticks_per_second: DEFAULT_TICKS_PER_SECOND,
            start_transition_ms: DEFAULT_START_TRANSITION_MS,
            end_transition_ms: DEFAULT_END_TRANSITION_MS,
        }
    }
}

impl BlinkConfig {
    /// Convert milliseconds to scheduler ticks, rounding down
    pub fn ms_to_ticks(&self, ms: u32) -> u32 {
        let ticks = u64::from(ms) * u64::from(self.ticks_per_second) / 1000;
        u32::try_from(ticks).unwrap_or(u32::MAX)
    }

    /// Transition pauses in ticks
    pub fn transitions(&self) -> Transitions {
        Transitions {
            start_ticks: self.ms_to_ticks(self.start_transition_ms),
            end_ticks: self.ms_to_ticks(self.end_transition_ms),
        }
    }
}

/// GPIO pin assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinConfig {
    /// GPIO number
    pub pin: u8,
    /// LED lights when the pin is driven low
    pub inverted: bool,
}

impl PinConfig {
    /// Level that lights the LED
    pub fn active_level(&self) -> Level {
        if self.inverted {
            Level::Low
        } else {
            Level::High
        }
    }
}

/// Pattern started on an LED at boot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BootPattern {
    pub count: BlinkCount,
    pub pulse_ms: u32,
    pub period_ms: u32,
}

/// One indicator LED
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LedConfig {
    /// LED name
    pub name: String<MAX_LABEL_LEN>,
    /// Output pin
    pub pin: PinConfig,
    /// Optional pattern to start at boot
    pub boot: Option<BootPattern>,
}

/// Complete board configuration
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StrobeConfig {
    pub blink: BlinkConfig,
    pub leds: Vec<LedConfig, MAX_LEDS>,
}

impl StrobeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find an LED by name
    pub fn find_led(&self, name: &str) -> Option<&LedConfig> {
        self.leds.iter().find(|l| l.name.as_str() == name)
    }
}
