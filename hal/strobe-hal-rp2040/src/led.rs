//! LED outputs on RP2040 GPIO
//!
//! A [`FlexLed`] switches between push-pull output while its channel is
//! claimed and floating input once released.

use embassy_rp::gpio::{AnyPin, Flex, Pull};
use embassy_rp::Peri;
use strobe_hal::{BlinkPin, OutputPin, PinMode};

/// GPIO driving one indicator LED
pub struct FlexLed {
    pin: Flex<'static>,
}

impl FlexLed {
    /// Wrap a pin; it stays floating until the blinker claims it
    pub fn new(pin: Peri<'static, AnyPin>) -> Self {
        let mut pin = Flex::new(pin);
        pin.set_pull(Pull::None);
        pin.set_as_input();
        Self { pin }
    }
}

impl OutputPin for FlexLed {
    fn set_high(&mut self) {
        self.pin.set_high();
    }

    fn set_low(&mut self) {
        self.pin.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.pin.is_set_high()
    }

    fn toggle(&mut self) {
        self.pin.toggle();
    }
}

impl BlinkPin for FlexLed {
    fn set_mode(&mut self, mode: PinMode) {
        match mode {
            PinMode::Output => self.pin.set_as_output(),
            PinMode::Input => self.pin.set_as_input(),
        }
    }
}
