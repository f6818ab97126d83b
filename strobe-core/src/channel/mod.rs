//! Blink channels
//!
//! A channel is one controlled output plus the sequence it is currently
//! running. Channels live in a fixed pool and are addressed by index.

pub mod sequence;
pub mod store;

pub use sequence::{BlinkCount, ChannelState, Edge, Reconfigured, Sequence, Transitions};
pub use store::{ChannelId, ChannelSlot, ChannelStore};
