//! Deadline aggregation across the channel pool

use strobe_hal::OutputPin;

use crate::channel::{ChannelStore, Transitions};

/// Sleep used when no channel is running
pub const IDLE_WAIT_TICKS: u64 = 0x7FFF_FFFE;

impl<P: OutputPin, const N: usize> ChannelStore<P, N> {
    /// Compute how long the scheduler may sleep
    ///
    /// With `apply_correction`, `elapsed_ticks` is charged to every running
    /// channel except those re-armed since the previous pass, whose
    /// countdown is already relative to the moment they were armed. Every
    /// pass consumes the re-armed markers.
    ///
    /// Returns the smallest countdown clamped at zero, or
    /// [`IDLE_WAIT_TICKS`] if nothing is running.
    pub fn correct_and_get_min(&mut self, elapsed_ticks: u64, apply_correction: bool) -> u64 {
        let elapsed = i64::try_from(elapsed_ticks).unwrap_or(i64::MAX);
        let mut min: Option<i64> = None;

        for slot in self.running_mut() {
            let rearmed = slot.take_correction();
            if apply_correction && !rearmed {
                slot.countdown = slot.countdown.saturating_sub(elapsed);
            }
            min = Some(min.map_or(slot.countdown, |m| m.min(slot.countdown)));
        }

        match min {
            Some(ticks) => ticks.max(0) as u64,
            None => IDLE_WAIT_TICKS,
        }
    }

    /// Charge a fully slept deadline and fire every edge that is due
    ///
    /// Channels re-armed after the deadline was computed keep their
    /// countdown.
    pub fn advance_due(&mut self, consumed_ticks: u64, transitions: Transitions) {
        let consumed = i64::try_from(consumed_ticks).unwrap_or(i64::MAX);

        for slot in self.running_mut() {
            if !slot.take_correction() {
                slot.countdown = slot.countdown.saturating_sub(consumed);
            }
            if slot.countdown <= 0 {
                slot.advance_edge(transitions);
            }
        }
    }
}
