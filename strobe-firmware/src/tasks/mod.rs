//! Embassy async tasks
//!
//! The blink scheduler task is spawned on demand by the blinker itself;
//! the console task runs for the lifetime of the firmware.

pub mod blink;
pub mod console;

pub use blink::{FwBlinker, FwSpawner, BLINKER};
pub use console::console_task;
