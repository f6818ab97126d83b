//! Dynamic pin allocation for config-driven LED setup
//!
//! LED pin numbers come from the board TOML rather than being hardcoded,
//! so GPIOs are parked in a bank and taken by number at runtime.

use embassy_rp::gpio::AnyPin;
use embassy_rp::Peri;

use crate::gpio::{PinClaims, PinError, GPIO_COUNT};

/// Pin bank that holds GPIO pins and allows taking them by number
///
/// ```ignore
/// let mut bank = PinBank::new([None, None, Some(p.PIN_2.into()), /* ... */]);
/// let led = bank.take(25)?;
/// ```
pub struct PinBank {
    pins: [Option<Peri<'static, AnyPin>>; GPIO_COUNT],
    claims: PinClaims,
}

impl PinBank {
    /// Create a bank from degraded pins indexed by GPIO number
    ///
    /// `None` entries were handed to other peripherals and stay reserved.
    pub fn new(pins: [Option<Peri<'static, AnyPin>>; GPIO_COUNT]) -> Self {
        let reserved = pins
            .iter()
            .enumerate()
            .filter(|(_, pin)| pin.is_none())
            .fold(0u32, |mask, (num, _)| mask | (1 << num));

        Self {
            pins,
            claims: PinClaims::new(reserved),
        }
    }

    /// Take a pin by number
    pub fn take(&mut self, pin_num: u8) -> Result<Peri<'static, AnyPin>, PinError> {
        self.claims.claim(pin_num)?;
        self.pins[pin_num as usize]
            .take()
            .ok_or(PinError::AlreadyTaken)
    }
}
