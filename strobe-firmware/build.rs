//! Build script for strobe-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates blink.toml at compile time

use std::collections::HashSet;
use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// GPIOs taken by the UART0 console
const CONSOLE_PINS: [i64; 2] = [0, 1];

/// Highest GPIO number on RP2040
const MAX_GPIO: i64 = 29;

/// Channel pool size of the firmware blinker
const MAX_LEDS: usize = 8;

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate blink.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=blink.toml");

    let config_path = Path::new("blink.toml");

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read blink.toml", &[e.to_string()]),
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => fail(
            "Invalid TOML syntax in blink.toml",
            &e.to_string().lines().map(str::to_string).collect::<Vec<_>>(),
        ),
    };

    let mut errors = Vec::new();
    validate_blink(&config, &mut errors);
    validate_leds(&config, &mut errors);

    if !errors.is_empty() {
        fail("Invalid blink.toml configuration", &errors);
    }

    println!("cargo:warning=blink.toml validated successfully");
}

/// Abort the build with a boxed error listing
fn fail(title: &str, lines: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        lines
            .iter()
            .map(|e| {
                let e = if e.len() > 62 { &e[..62] } else { e.as_str() };
                format!("║  • {:<62} ║", e)
            })
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Validate the [blink] timing section
fn validate_blink(config: &toml::Value, errors: &mut Vec<String>) {
    let blink = match config.get("blink") {
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            errors.push("[blink] must be a table".to_string());
            return;
        }
        None => return,
    };

    for (key, value) in blink {
        match key.as_str() {
            "start_transition_ms" | "end_transition_ms" => match value.as_integer() {
                Some(ms) if (0..=u32::MAX as i64).contains(&ms) => {}
                _ => errors.push(format!("[blink] {} must be 0-{}", key, u32::MAX)),
            },
            // The RP2040 scheduler clock counts milliseconds
            "ticks_per_second" => {
                if value.as_integer() != Some(1000) {
                    errors.push("[blink] ticks_per_second must be 1000 on RP2040".to_string());
                }
            }
            _ => errors.push(format!("[blink] unknown key '{}'", key)),
        }
    }
}

/// Validate [led.*] sections
fn validate_leds(config: &toml::Value, errors: &mut Vec<String>) {
    let leds = match config.get("led") {
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            errors.push("[led] must contain named [led.<name>] tables".to_string());
            return;
        }
        None => return,
    };

    if leds.len() > MAX_LEDS {
        errors.push(format!("At most {} LEDs are supported", MAX_LEDS));
    }

    let mut pins = HashSet::new();

    for (name, led) in leds {
        let led = match led {
            toml::Value::Table(t) => t,
            _ => {
                errors.push(format!("[led.{}] must be a table", name));
                continue;
            }
        };

        if name.len() > 16 {
            errors.push(format!("[led.{}] name longer than 16 characters", name));
        }

        match led.get("pin") {
            Some(toml::Value::String(pin)) => match parse_pin(pin) {
                Some(num) if CONSOLE_PINS.contains(&num) => {
                    errors.push(format!("[led.{}] gpio{} is used by the console", name, num));
                }
                Some(num) => {
                    if !pins.insert(num) {
                        errors.push(format!("[led.{}] gpio{} assigned twice", name, num));
                    }
                }
                None => errors.push(format!(
                    "[led.{}] pin must be 'gpioN' or '!gpioN' (N = 0-{})",
                    name, MAX_GPIO
                )),
            },
            Some(_) => errors.push(format!("[led.{}] pin must be a string", name)),
            None => errors.push(format!("[led.{}] missing 'pin'", name)),
        }

        if let Some(value) = led.get("active_low") {
            if !value.is_bool() {
                errors.push(format!("[led.{}] active_low must be true or false", name));
            }
        }

        match led.get("count") {
            None | Some(toml::Value::Integer(-1)) => {}
            Some(toml::Value::Integer(n)) if (0..=u16::MAX as i64).contains(n) => {}
            Some(toml::Value::String(s)) if s == "infinite" || s == "inf" => {}
            Some(_) => errors.push(format!(
                "[led.{}] count must be 0-{} or \"infinite\"",
                name,
                u16::MAX
            )),
        }

        let period = led.get("period_ms").and_then(toml::Value::as_integer);
        let pulse = led.get("pulse_ms").and_then(toml::Value::as_integer);

        match (period, pulse) {
            (None, Some(_)) => {
                errors.push(format!("[led.{}] pulse_ms requires period_ms", name));
            }
            (None, None) if led.contains_key("count") => {
                errors.push(format!("[led.{}] count requires period_ms", name));
            }
            (Some(period), _) if period <= 0 || period > u32::MAX as i64 => {
                errors.push(format!("[led.{}] period_ms out of range", name));
            }
            (Some(period), Some(pulse)) if pulse < 0 || pulse > period => {
                errors.push(format!("[led.{}] pulse_ms must be 0-{}", name, period));
            }
            _ => {}
        }
    }
}

/// Parse "gpioN" / "!gpioN"
fn parse_pin(s: &str) -> Option<i64> {
    let s = s.strip_prefix('!').unwrap_or(s);
    let num: i64 = s.strip_prefix("gpio")?.parse().ok()?;
    (0..=MAX_GPIO).contains(&num).then_some(num)
}
