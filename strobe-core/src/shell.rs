//! Console commands
//!
//! ```text
//! blink <led> <count> [period_ms] [pulse_ms]
//! stop <led>
//! on <led>
//! off <led>
//! toggle <led>
//! ```
//!
//! `led` is the 1-based pool slot. `count` is a pulse count or `inf`. With
//! no period the LED blinks 500 ms every second; with a period and no
//! pulse it blinks at a 50% duty cycle.

use embassy_sync::blocking_mutex::raw::RawMutex;
use strobe_hal::{BlinkPin, SchedulerSpawner, WakeSignal};

use crate::blinker::Blinker;
use crate::channel::BlinkCount;
use crate::error::BlinkError;

pub const USAGE: &str = "usage: blink <led> <count|inf> [period_ms] [pulse_ms] | stop|on|off|toggle <led>";

const DEFAULT_PULSE_MS: u32 = 500;
const DEFAULT_PERIOD_MS: u32 = 1000;
const MIN_PERIOD_MS: u32 = 10;
const MIN_PULSE_MS: u32 = 10;

/// Parsed console command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    Blink {
        /// 0-based slot index
        led: usize,
        count: BlinkCount,
        pulse_ms: u32,
        period_ms: u32,
    },
    Stop { led: usize },
    On { led: usize },
    Off { led: usize },
    Toggle { led: usize },
}

impl Command {
    /// 0-based slot index the command targets
    pub fn led(&self) -> usize {
        match *self {
            Command::Blink { led, .. }
            | Command::Stop { led }
            | Command::On { led }
            | Command::Off { led }
            | Command::Toggle { led } => led,
        }
    }
}

/// Console command failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Wrong number of arguments
    Usage,
    UnknownCommand,
    /// Argument outside its allowed range
    OutOfRange,
    /// Argument is not a number
    InvalidNumber,
    /// LED slot is not claimed
    NotInitialized,
    /// Blinker refused the request
    Rejected(BlinkError),
}

impl CommandError {
    /// Text printed back on the console
    pub fn message(self) -> &'static str {
        match self {
            CommandError::Usage => USAGE,
            CommandError::UnknownCommand => "unknown command",
            CommandError::OutOfRange => {
                "out of range: led[1-N] count[1-any|inf] period[10-any] pulse[10-period]"
            }
            CommandError::InvalidNumber => "invalid number",
            CommandError::NotInitialized => "not initialized",
            CommandError::Rejected(_) => "request rejected",
        }
    }
}

/// Parse one console line
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let mut words = line.split_whitespace();
    let name = words.next().ok_or(CommandError::Usage)?;
    let mut args: heapless::Vec<&str, 4> = heapless::Vec::new();
    for word in words {
        args.push(word).map_err(|_| CommandError::Usage)?;
    }

    match name {
        "blink" => parse_blink(&args),
        "stop" | "on" | "off" | "toggle" => {
            let [led] = args.as_slice() else {
                return Err(CommandError::Usage);
            };
            let led = parse_led(led)?;
            Ok(match name {
                "stop" => Command::Stop { led },
                "on" => Command::On { led },
                "off" => Command::Off { led },
                _ => Command::Toggle { led },
            })
        }
        _ => Err(CommandError::UnknownCommand),
    }
}

fn parse_blink(args: &[&str]) -> Result<Command, CommandError> {
    let (led, count, pulse_ms, period_ms) = match *args {
        [led, count] => (led, count, DEFAULT_PULSE_MS, DEFAULT_PERIOD_MS),
        [led, count, period] => {
            let period = parse_number(period)?;
            if period < MIN_PERIOD_MS {
                return Err(CommandError::OutOfRange);
            }
            (led, count, period / 2, period)
        }
        [led, count, period, pulse] => {
            let period = parse_number(period)?;
            let pulse = parse_number(pulse)?;
            if period < MIN_PERIOD_MS || pulse < MIN_PULSE_MS || pulse > period {
                return Err(CommandError::OutOfRange);
            }
            (led, count, pulse, period)
        }
        _ => return Err(CommandError::Usage),
    };

    Ok(Command::Blink {
        led: parse_led(led)?,
        count: parse_count(count)?,
        pulse_ms,
        period_ms,
    })
}

/// 1-based on the console, 0-based internally
fn parse_led(word: &str) -> Result<usize, CommandError> {
    let led: usize = word.parse().map_err(|_| CommandError::InvalidNumber)?;
    led.checked_sub(1).ok_or(CommandError::OutOfRange)
}

fn parse_count(word: &str) -> Result<BlinkCount, CommandError> {
    if word == "inf" || word == "infinite" {
        return Ok(BlinkCount::Infinite);
    }
    let count: u32 = parse_number(word)?;
    match u16::try_from(count) {
        Ok(n) if n > 0 => Ok(BlinkCount::Finite(n)),
        _ => Err(CommandError::OutOfRange),
    }
}

fn parse_number(word: &str) -> Result<u32, CommandError> {
    word.parse().map_err(|_| CommandError::InvalidNumber)
}

/// What one received byte completed
#[derive(Debug, PartialEq, Eq)]
pub enum LineEvent<'a> {
    /// Nothing to act on yet
    Pending,
    /// A full non-empty line, terminator stripped
    Line(&'a [u8]),
    /// The line outgrew the buffer; the rest of it is dropped
    Overflow,
}

/// Assembles console bytes into lines of at most `L` bytes
#[derive(Debug, Default)]
pub struct LineBuffer<const L: usize> {
    line: heapless::Vec<u8, L>,
    complete: bool,
    discarding: bool,
}

impl<const L: usize> LineBuffer<L> {
    pub fn new() -> Self {
        Self {
            line: heapless::Vec::new(),
            complete: false,
            discarding: false,
        }
    }

    pub fn push(&mut self, byte: u8) -> LineEvent<'_> {
        if self.complete {
            self.line.clear();
            self.complete = false;
        }

        match byte {
            b'\r' | b'\n' if self.discarding => {
                self.discarding = false;
                LineEvent::Pending
            }
            b'\r' | b'\n' if self.line.is_empty() => LineEvent::Pending,
            b'\r' | b'\n' => {
                self.complete = true;
                LineEvent::Line(&self.line)
            }
            _ if self.discarding => LineEvent::Pending,
            _ => {
                if self.line.push(byte).is_err() {
                    self.line.clear();
                    self.discarding = true;
                    return LineEvent::Overflow;
                }
                LineEvent::Pending
            }
        }
    }
}

impl<M, P, W, S, const N: usize> Blinker<M, P, W, S, N>
where
    M: RawMutex,
    P: BlinkPin,
    W: WakeSignal,
    S: SchedulerSpawner,
{
    /// Run a console command against the LED in its slot
    pub async fn execute(&self, command: Command) -> Result<(), CommandError> {
        let led = command.led();
        if led >= N {
            return Err(CommandError::OutOfRange);
        }

        let mut store = self.store.lock().await;
        let id = store.channel_at(led).ok_or(CommandError::NotInitialized)?;

        match command {
            Command::Blink {
                count,
                pulse_ms,
                period_ms,
                ..
            } => {
                let sequence = self
                    .sequence_for(count, pulse_ms, period_ms)
                    .map_err(CommandError::Rejected)?;
                self.apply(&mut store, id, sequence);
            }
            Command::Stop { .. } => store.slot_mut(id).stop(),
            Command::On { .. } => store.slot_mut(id).drive_on(),
            Command::Off { .. } => store.slot_mut(id).drive_off(),
            Command::Toggle { .. } => store.slot_mut(id).toggle(),
        }
        Ok(())
    }
}
