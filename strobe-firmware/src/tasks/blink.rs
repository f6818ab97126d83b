//! Blink scheduler task
//!
//! Spawned when the first LED channel is claimed and returns once the
//! last one is released.

use defmt::*;
use embassy_executor::SendSpawner;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::once_lock::OnceLock;
use strobe_core::config::MAX_LEDS;
use strobe_core::Blinker;
use strobe_hal::{SchedulerSpawner, SpawnError};
use strobe_hal_rp2040::{EmbassyClock, EmbassyWake, FlexLed};

/// Firmware blinker: one channel per configurable LED
pub type FwBlinker = Blinker<CriticalSectionRawMutex, FlexLed, EmbassyWake, FwSpawner, MAX_LEDS>;

/// Shared by the scheduler task, the console and main
pub static BLINKER: OnceLock<FwBlinker> = OnceLock::new();

/// Starts [`blink_task`] on the executor main runs on
pub struct FwSpawner {
    spawner: SendSpawner,
}

impl FwSpawner {
    pub fn new(spawner: SendSpawner) -> Self {
        Self { spawner }
    }
}

impl SchedulerSpawner for FwSpawner {
    fn spawn_scheduler(&self) -> Result<(), SpawnError> {
        let blinker = BLINKER.try_get().ok_or(SpawnError::Unsupported)?;
        self.spawner
            .spawn(blink_task(blinker))
            .map_err(|_| SpawnError::Busy)
    }
}

/// Blink scheduler task
///
/// Two slots: an instance that just saw the pool empty may not have
/// returned yet when the next channel is claimed.
#[embassy_executor::task(pool_size = 2)]
pub async fn blink_task(blinker: &'static FwBlinker) {
    info!("Blink task started");
    blinker.run(&EmbassyClock).await;
    info!("Blink task finished");
}
