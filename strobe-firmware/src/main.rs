//! Strobe - Indicator LED Firmware
//!
//! Main firmware binary for RP2040 boards. Every LED listed in blink.toml
//! is driven by one shared blink scheduler task; a UART console on
//! GPIO0/GPIO1 accepts `blink`, `stop`, `on`, `off` and `toggle` commands.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use strobe_core::config::{parse_config, BootPattern, LedConfig, PinConfig, StrobeConfig};
use strobe_core::{BlinkCount, Blinker};
use strobe_hal_rp2040::pins::PinBank;
use strobe_hal_rp2040::{EmbassyWake, FlexLed, TICKS_PER_SECOND};

use crate::tasks::{FwBlinker, FwSpawner, BLINKER};

mod board;
mod tasks;

/// Embedded board configuration (compiled into firmware)
/// Edit blink.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../blink.toml");

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Strobe firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();

    // Console UART (115200 baud default)
    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);
    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, UartConfig::default());
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();
    info!("UART initialized for console");

    let mut bank = board::pin_bank(board::LedPins {
        pin2: p.PIN_2,
        pin3: p.PIN_3,
        pin4: p.PIN_4,
        pin5: p.PIN_5,
        pin6: p.PIN_6,
        pin7: p.PIN_7,
        pin8: p.PIN_8,
        pin9: p.PIN_9,
        pin10: p.PIN_10,
        pin11: p.PIN_11,
        pin12: p.PIN_12,
        pin13: p.PIN_13,
        pin14: p.PIN_14,
        pin15: p.PIN_15,
        pin16: p.PIN_16,
        pin17: p.PIN_17,
        pin18: p.PIN_18,
        pin19: p.PIN_19,
        pin20: p.PIN_20,
        pin21: p.PIN_21,
        pin22: p.PIN_22,
        pin23: p.PIN_23,
        pin24: p.PIN_24,
        pin25: p.PIN_25,
        pin26: p.PIN_26,
        pin27: p.PIN_27,
        pin28: p.PIN_28,
        pin29: p.PIN_29,
    });

    let blinker: &'static FwBlinker = BLINKER.get_or_init(|| {
        Blinker::new(
            config.blink,
            EmbassyWake::new(),
            FwSpawner::new(spawner.make_send()),
        )
    });

    for led in &config.leds {
        setup_led(blinker, &mut bank, led).await;
    }

    spawner.spawn(tasks::console_task(rx, tx, blinker)).unwrap();

    info!("All tasks spawned, firmware running");

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Parse the embedded configuration, falling back to a heartbeat on the
/// on-board LED
fn load_config() -> StrobeConfig {
    let mut config = match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Loaded {} LEDs from blink.toml", config.leds.len());
            config
        }
        Err(e) => {
            warn!("Invalid blink.toml ({:?}), using defaults", e);
            create_default_config()
        }
    };

    if config.blink.ticks_per_second != TICKS_PER_SECOND {
        warn!(
            "ticks_per_second {} not supported, using {}",
            config.blink.ticks_per_second, TICKS_PER_SECOND
        );
        config.blink.ticks_per_second = TICKS_PER_SECOND;
    }
    config
}

/// Single status LED on GPIO25
fn create_default_config() -> StrobeConfig {
    let mut config = StrobeConfig::new();

    let mut status = LedConfig {
        pin: PinConfig {
            pin: board::STATUS_LED_PIN,
            inverted: false,
        },
        boot: Some(BootPattern {
            count: BlinkCount::Infinite,
            pulse_ms: 50,
            period_ms: 2000,
        }),
        ..Default::default()
    };
    let _ = status.name.push_str("status");
    let _ = config.leds.push(status);
    config
}

/// Claim a channel for one configured LED and start its boot pattern
async fn setup_led(blinker: &'static FwBlinker, bank: &mut PinBank, led: &LedConfig) {
    let pin = match bank.take(led.pin.pin) {
        Ok(pin) => pin,
        Err(e) => {
            warn!("LED '{}': gpio{} unavailable ({:?})", led.name.as_str(), led.pin.pin, e);
            return;
        }
    };

    let id = match blinker
        .init_channel(FlexLed::new(pin), led.pin.active_level())
        .await
    {
        Ok(id) => id,
        Err(e) => {
            warn!("LED '{}': no channel ({:?})", led.name.as_str(), e);
            return;
        }
    };
    info!(
        "LED '{}' on gpio{} is channel {}",
        led.name.as_str(),
        led.pin.pin,
        id.index() + 1
    );

    if let Some(boot) = led.boot {
        if let Err(e) = blinker
            .start_blink(id, boot.count, boot.pulse_ms, boot.period_ms)
            .await
        {
            warn!("LED '{}': boot pattern rejected ({:?})", led.name.as_str(), e);
        }
    }
}
