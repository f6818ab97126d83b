//! Raspberry Pi Pico pin assignments
//!
//! GPIO0/GPIO1 belong to the UART0 console. Every other GPIO is parked in
//! the pin bank for config-driven LED assignment.

use embassy_rp::peripherals::*;
use embassy_rp::Peri;
use strobe_hal_rp2040::pins::PinBank;

/// On-board LED
pub const STATUS_LED_PIN: u8 = 25;

/// GPIOs left over after the console UART is set up
pub struct LedPins {
    pub pin2: Peri<'static, PIN_2>,
    pub pin3: Peri<'static, PIN_3>,
    pub pin4: Peri<'static, PIN_4>,
    pub pin5: Peri<'static, PIN_5>,
    pub pin6: Peri<'static, PIN_6>,
    pub pin7: Peri<'static, PIN_7>,
    pub pin8: Peri<'static, PIN_8>,
    pub pin9: Peri<'static, PIN_9>,
    pub pin10: Peri<'static, PIN_10>,
    pub pin11: Peri<'static, PIN_11>,
    pub pin12: Peri<'static, PIN_12>,
    pub pin13: Peri<'static, PIN_13>,
    pub pin14: Peri<'static, PIN_14>,
    pub pin15: Peri<'static, PIN_15>,
    pub pin16: Peri<'static, PIN_16>,
    pub pin17: Peri<'static, PIN_17>,
    pub pin18: Peri<'static, PIN_18>,
    pub pin19: Peri<'static, PIN_19>,
    pub pin20: Peri<'static, PIN_20>,
    pub pin21: Peri<'static, PIN_21>,
    pub pin22: Peri<'static, PIN_22>,
    pub pin23: Peri<'static, PIN_23>,
    pub pin24: Peri<'static, PIN_24>,
    pub pin25: Peri<'static, PIN_25>,
    pub pin26: Peri<'static, PIN_26>,
    pub pin27: Peri<'static, PIN_27>,
    pub pin28: Peri<'static, PIN_28>,
    pub pin29: Peri<'static, PIN_29>,
}

/// Build the LED pin bank; console pins are reserved
pub fn pin_bank(p: LedPins) -> PinBank {
    PinBank::new([
        None,
        None,
        Some(p.pin2.into()),
        Some(p.pin3.into()),
        Some(p.pin4.into()),
        Some(p.pin5.into()),
        Some(p.pin6.into()),
        Some(p.pin7.into()),
        Some(p.pin8.into()),
        Some(p.pin9.into()),
        Some(p.pin10.into()),
        Some(p.pin11.into()),
        Some(p.pin12.into()),
        Some(p.pin13.into()),
        Some(p.pin14.into()),
        Some(p.pin15.into()),
        Some(p.pin16.into()),
        Some(p.pin17.into()),
        Some(p.pin18.into()),
        Some(p.pin19.into()),
        Some(p.pin20.into()),
        Some(p.pin21.into()),
        Some(p.pin22.into()),
        Some(p.pin23.into()),
        Some(p.pin24.into()),
        Some(p.pin25.into()),
        Some(p.pin26.into()),
        Some(p.pin27.into()),
        Some(p.pin28.into()),
        Some(p.pin29.into()),
    ])
}
