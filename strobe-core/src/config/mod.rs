//! Configuration types
//!
//! Scheduler timing plus the board's LED assignments, parsed from a small
//! TOML subset.

pub mod toml;
pub mod types;

pub use self::toml::{parse_config, ParseError};
pub use types::*;
