//! Simple TOML parser for board configuration
//!
//! This is a minimal line-based parser that handles only the subset needed
//! for Strobe configuration. It does NOT support the full TOML spec.
//!
//! Supported features:
//! - Key = value pairs (string, integer, boolean)
//! - `[blink]` and `[led.<name>]` / `[led <name>]` section headers
//! - Comments (# ...)
//!
//! Example:
//!
//! ```toml
//! [blink]
//! start_transition_ms = 500
//! end_transition_ms = 5000
//!
//! [led.status]
//! pin = "!gpio25"      # active-low
//! count = "infinite"   # boot pattern
//! pulse_ms = 100
//! period_ms = 1000
//! ```

use heapless::String as HString;

use super::types::{BlinkConfig, BootPattern, LedConfig, PinConfig, StrobeConfig, MAX_LABEL_LEN};
use crate::channel::BlinkCount;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Invalid section header
    InvalidSection,
    /// Key not valid in the current section
    UnknownKey,
    /// Invalid value type or range
    InvalidValue,
    /// Too many items (exceeded heapless capacity)
    TooManyItems,
    /// Invalid pin string
    InvalidPin,
    /// LED section without a `pin` key
    MissingPin,
}

/// Current parsing context
#[derive(Debug, Clone)]
enum Section {
    Root,
    Blink,
    Led(HString<MAX_LABEL_LEN>),
}

/// LED section being assembled
#[derive(Debug, Default)]
struct LedBuilder {
    name: HString<MAX_LABEL_LEN>,
    pin: Option<PinConfig>,
    active_low: Option<bool>,
    count: Option<BlinkCount>,
    pulse_ms: Option<u32>,
    period_ms: Option<u32>,
}

impl LedBuilder {
    fn new(name: HString<MAX_LABEL_LEN>) -> Self {
        Self {
            name,
            ..Default::default()
        }
    }

    /// Boot pattern requires a period; count defaults to infinite and pulse
    /// to half the period
    fn build(self) -> Result<LedConfig, ParseError> {
        let mut pin = self.pin.ok_or(ParseError::MissingPin)?;
        if let Some(active_low) = self.active_low {
            pin.inverted = active_low;
        }

        let boot = match self.period_ms {
            Some(period_ms) => {
                let pulse_ms = self.pulse_ms.unwrap_or(period_ms / 2);
                if period_ms == 0 || pulse_ms > period_ms {
                    return Err(ParseError::InvalidValue);
                }
                Some(BootPattern {
                    count: self.count.unwrap_or(BlinkCount::Infinite),
                    pulse_ms,
                    period_ms,
                })
            }
            None if self.count.is_some() || self.pulse_ms.is_some() => {
                return Err(ParseError::InvalidValue);
            }
            None => None,
        };

        Ok(LedConfig {
            name: self.name,
            pin,
            boot,
        })
    }
}

/// Parse TOML configuration into StrobeConfig
pub fn parse_config(input: &str) -> Result<StrobeConfig, ParseError> {
    let mut config = StrobeConfig::new();
    let mut section = Section::Root;
    let mut current_led: Option<LedBuilder> = None;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Check for section header
        if line.starts_with('[') && line.ends_with(']') {
            save_led(&mut config, current_led.take())?;

            section = parse_section_header(&line[1..line.len() - 1])?;
            if let Section::Led(name) = &section {
                current_led = Some(LedBuilder::new(name.clone()));
            }
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidValue)?;
        match &section {
            Section::Root => return Err(ParseError::UnknownKey),
            Section::Blink => apply_blink_value(&mut config.blink, key, value)?,
            Section::Led(_) => {
                if let Some(led) = current_led.as_mut() {
                    apply_led_value(led, key, value)?;
                }
            }
        }
    }

    // Save final section
    save_led(&mut config, current_led.take())?;

    Ok(config)
}

fn save_led(config: &mut StrobeConfig, led: Option<LedBuilder>) -> Result<(), ParseError> {
    if let Some(led) = led {
        let led = led.build()?;
        if config.find_led(led.name.as_str()).is_some() {
            return Err(ParseError::InvalidSection);
        }
        config.leds.push(led).map_err(|_| ParseError::TooManyItems)?;
    }
    Ok(())
}

/// Parse section header like "blink", "led.status" or "led status"
fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    let header = header.trim();

    if header == "blink" {
        return Ok(Section::Blink);
    }

    let name = header
        .strip_prefix("led.")
        .or_else(|| header.strip_prefix("led "))
        .map(str::trim)
        .ok_or(ParseError::InvalidSection)?;

    if name.is_empty() || name.contains('.') || name.contains(char::is_whitespace) {
        return Err(ParseError::InvalidSection);
    }

    let name = HString::try_from(name).map_err(|_| ParseError::InvalidSection)?;
    Ok(Section::Led(name))
}

fn apply_blink_value(blink: &mut BlinkConfig, key: &str, value: &str) -> Result<(), ParseError> {
    match key {
        "ticks_per_second" => {
            let ticks: u32 = parse_int(value)?;
            if ticks == 0 {
                return Err(ParseError::InvalidValue);
            }
            blink.ticks_per_second = ticks;
        }
        "start_transition_ms" => blink.start_transition_ms = parse_int(value)?,
        "end_transition_ms" => blink.end_transition_ms = parse_int(value)?,
        _ => return Err(ParseError::UnknownKey),
    }
    Ok(())
}

fn apply_led_value(led: &mut LedBuilder, key: &str, value: &str) -> Result<(), ParseError> {
    match key {
        "pin" => led.pin = Some(parse_pin(value)?),
        "active_low" => led.active_low = Some(parse_bool(value)?),
        "count" => led.count = Some(parse_count(value)?),
        "pulse_ms" => led.pulse_ms = Some(parse_int(value)?),
        "period_ms" => led.period_ms = Some(parse_int(value)?),
        _ => return Err(ParseError::UnknownKey),
    }
    Ok(())
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    // Remove inline comments
    let value = if let Some(hash_pos) = value.find('#') {
        // Make sure # is not inside a string
        let quote_count = value[..hash_pos].matches('"').count();
        if quote_count % 2 == 0 {
            value[..hash_pos].trim()
        } else {
            value
        }
    } else {
        value
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> &str {
    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        &value[1..value.len() - 1]
    } else {
        // Allow unquoted strings for simple values
        value
    }
}

/// Parse an integer value
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Parse a blink count: positive integer, or "infinite" / -1
fn parse_count(value: &str) -> Result<BlinkCount, ParseError> {
    match parse_string(value) {
        "infinite" | "inf" | "-1" => Ok(BlinkCount::Infinite),
        other => parse_int(other).map(BlinkCount::Finite),
    }
}

/// Parse a pin string like "gpio25" or "!gpio25"
fn parse_pin(value: &str) -> Result<PinConfig, ParseError> {
    let value = parse_string(value);
    let (value, inverted) = match value.strip_prefix('!') {
        Some(rest) => (rest, true),
        None => (value, false),
    };

    let number = value.strip_prefix("gpio").ok_or(ParseError::InvalidPin)?;
    let pin: u8 = number.parse().map_err(|_| ParseError::InvalidPin)?;

    Ok(PinConfig { pin, inverted })
}
