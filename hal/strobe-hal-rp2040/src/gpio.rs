//! GPIO claim tracking
//!
//! One bit per GPIO: reserved pins belong to other peripherals, taken pins
//! already drive an LED.

/// Maximum number of GPIO pins on RP2040
pub const GPIO_COUNT: usize = 30;

/// Error when requesting a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number out of range (0-29 valid)
    InvalidPin,
    /// Pin already taken
    AlreadyTaken,
    /// Pin reserved for special function
    Reserved,
}

/// Claimed GPIO set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PinClaims {
    reserved: u32,
    taken: u32,
}

impl PinClaims {
    pub const fn new(reserved: u32) -> Self {
        Self { reserved, taken: 0 }
    }

    /// Mark `pin` taken
    pub fn claim(&mut self, pin: u8) -> Result<(), PinError> {
        if pin as usize >= GPIO_COUNT {
            return Err(PinError::InvalidPin);
        }
        let bit = 1u32 << pin;
        if self.reserved & bit != 0 {
            return Err(PinError::Reserved);
        }
        if self.taken & bit != 0 {
            return Err(PinError::AlreadyTaken);
        }
        self.taken |= bit;
        Ok(())
    }
}
