//! Sequence engine
//!
//! Per-channel edge automaton. Each call to [`ChannelSlot::advance_edge`]
//! handles one edge of the blink waveform:
//!
//! ```text
//!         ┌── on_ticks ──┐┌──── off_ticks ────┐
//! on  ────┘              └───────────────────┘┌── ...
//!     TurnOn          TurnOff              TurnOn
//! ```
//!
//! A running channel holds at most one staged sequence, loaded when the
//! current one runs out of pulses.

use strobe_hal::OutputPin;

use super::store::ChannelSlot;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of pulses in a sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BlinkCount {
    /// Pulses left to emit
    Finite(u16),
    /// Blink until stopped or interrupted
    Infinite,
}

impl BlinkCount {
    /// Whether another on-pulse should be emitted
    pub fn has_pulses(self) -> bool {
        match self {
            BlinkCount::Finite(n) => n > 0,
            BlinkCount::Infinite => true,
        }
    }

    pub fn is_infinite(self) -> bool {
        self == BlinkCount::Infinite
    }

    /// Consume one pulse (no-op for infinite sequences)
    fn consume(&mut self) {
        if let BlinkCount::Finite(n) = self {
            *n = n.saturating_sub(1);
        }
    }
}

/// Blink waveform in scheduler ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sequence {
    pub count: BlinkCount,
    /// Time the output stays on per pulse
    pub on_ticks: u32,
    /// Time the output stays off between pulses
    pub off_ticks: u32,
}

impl Sequence {
    pub const fn new(count: BlinkCount, on_ticks: u32, off_ticks: u32) -> Self {
        Self {
            count,
            on_ticks,
            off_ticks,
        }
    }
}

/// Which edge a running channel produces next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    TurnOn,
    TurnOff,
}

/// Channel state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelState {
    /// Not blinking; output left off
    Idle,
    /// Playing a sequence
    Running {
        next_edge: Edge,
        /// Countdown was just set to an absolute value; the next
        /// correction pass must not subtract elapsed time from it
        correction_pending: bool,
    },
}

/// Pauses inserted when switching between foreground and background
/// sequences, in ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transitions {
    /// Off time before a request that interrupts an infinite sequence
    pub start_ticks: u32,
    /// Off time before an interrupted infinite sequence resumes
    pub end_ticks: u32,
}

/// What [`ChannelSlot::reconfigure`] did with a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reconfigured {
    /// Channel was idle; request armed with no delay
    Started,
    /// Infinite sequence parked in the staged slot; request armed after
    /// the start transition
    Interrupted,
    /// Finite sequence still running; request staged
    Staged,
}

impl Reconfigured {
    /// Whether the scheduler needs to be woken
    pub fn needs_wake(self) -> bool {
        !matches!(self, Reconfigured::Staged)
    }
}

impl<P: OutputPin> ChannelSlot<P> {
    /// Apply a new blink request
    ///
    /// Infinite sequences yield to the request and are resumed once it
    /// finishes. Finite sequences run to completion first; only the most
    /// recent request is kept.
    pub fn reconfigure(&mut self, request: Sequence, transitions: Transitions) -> Reconfigured {
        match self.state {
            ChannelState::Running { .. } if self.sequence.count.is_infinite() => {
                self.staged = Some(self.sequence);
                self.drive_off();
                self.arm(request, transitions.start_ticks);
                Reconfigured::Interrupted
            }
            ChannelState::Running { .. } => {
                self.staged = Some(request);
                Reconfigured::Staged
            }
            ChannelState::Idle => {
                self.arm(request, 0);
                Reconfigured::Started
            }
        }
    }

    /// Load `sequence` with its first edge `delay_ticks` from now
    fn arm(&mut self, sequence: Sequence, delay_ticks: u32) {
        self.sequence = sequence;
        self.countdown = i64::from(delay_ticks);
        self.state = ChannelState::Running {
            next_edge: Edge::TurnOn,
            correction_pending: true,
        };
    }

    /// Produce the next edge of the waveform
    ///
    /// Called by the scheduler once the countdown has reached zero. Idle
    /// channels are left untouched.
    pub fn advance_edge(&mut self, transitions: Transitions) {
        let ChannelState::Running {
            next_edge,
            correction_pending,
        } = self.state
        else {
            return;
        };

        match next_edge {
            Edge::TurnOn if self.sequence.count.has_pulses() => {
                self.drive_on();
                self.countdown = i64::from(self.sequence.on_ticks);
                self.state = ChannelState::Running {
                    next_edge: Edge::TurnOff,
                    correction_pending,
                };
            }
            Edge::TurnOn => match self.staged.take() {
                Some(next) => {
                    self.sequence = next;
                    self.countdown = if next.count.is_infinite() {
                        i64::from(transitions.end_ticks)
                    } else {
                        0
                    };
                }
                None => {
                    self.state = ChannelState::Idle;
                }
            },
            Edge::TurnOff => {
                self.drive_off();
                self.countdown = i64::from(self.sequence.off_ticks);
                self.sequence.count.consume();
                self.state = ChannelState::Running {
                    next_edge: Edge::TurnOn,
                    correction_pending,
                };
            }
        }
    }

    /// Force the output off and drop both the running and staged sequence
    pub fn stop(&mut self) {
        self.drive_off();
        self.staged = None;
        self.state = ChannelState::Idle;
    }

    /// Consume a pending correction marker
    ///
    /// Returns `true` if the marker was set, meaning the countdown must be
    /// left as is for this correction pass.
    pub(crate) fn take_correction(&mut self) -> bool {
        match &mut self.state {
            ChannelState::Running {
                correction_pending, ..
            } if *correction_pending => {
                *correction_pending = false;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ChannelStore;
    use crate::testing::{PinProbe, SimClock};
    use strobe_hal::Level;

    const TRANSITIONS: Transitions = Transitions {
        start_ticks: 500,
        end_ticks: 5000,
    };

    fn running(next_edge: Edge) -> ChannelState {
        ChannelState::Running {
            next_edge,
            correction_pending: true,
        }
    }

    #[test]
    fn test_idle_channel_starts_immediately() {
        let clock = SimClock::new();
        let probe = PinProbe::new(&clock);
        let mut store: ChannelStore<_, 1> = ChannelStore::new();
        let id = store.allocate(probe.pin(), Level::High).unwrap();
        let slot = store.slot_mut(id);

        let outcome = slot.reconfigure(Sequence::new(BlinkCount::Finite(3), 200, 300), TRANSITIONS);

        assert_eq!(outcome, Reconfigured::Started);
        assert!(outcome.needs_wake());
        assert_eq!(slot.state(), running(Edge::TurnOn));
        assert_eq!(slot.countdown(), 0);
        assert!(slot.staged().is_none());
    }

    #[test]
    fn test_finite_pulse_train() {
        let clock = SimClock::new();
        let probe = PinProbe::new(&clock);
        let mut store: ChannelStore<_, 1> = ChannelStore::new();
        let id = store.allocate(probe.pin(), Level::High).unwrap();
        let slot = store.slot_mut(id);
        slot.reconfigure(Sequence::new(BlinkCount::Finite(2), 200, 300), TRANSITIONS);

        // Pulse 1
        slot.advance_edge(TRANSITIONS);
        assert!(slot.is_lit());
        assert_eq!(slot.countdown(), 200);
        slot.advance_edge(TRANSITIONS);
        assert!(!slot.is_lit());
        assert_eq!(slot.countdown(), 300);
        assert_eq!(slot.sequence().count, BlinkCount::Finite(1));

        // Pulse 2
        slot.advance_edge(TRANSITIONS);
        assert!(slot.is_lit());
        slot.advance_edge(TRANSITIONS);
        assert!(!slot.is_lit());
        assert_eq!(slot.sequence().count, BlinkCount::Finite(0));
        assert!(slot.is_running());

        // Out of pulses after the final gap
        slot.advance_edge(TRANSITIONS);
        assert_eq!(slot.state(), ChannelState::Idle);
        assert!(!slot.is_lit());
        assert_eq!(probe.rising_edges(), 2);
    }

    #[test]
    fn test_infinite_never_runs_out() {
        let clock = SimClock::new();
        let probe = PinProbe::new(&clock);
        let mut store: ChannelStore<_, 1> = ChannelStore::new();
        let id = store.allocate(probe.pin(), Level::High).unwrap();
        let slot = store.slot_mut(id);
        slot.reconfigure(Sequence::new(BlinkCount::Infinite, 100, 900), TRANSITIONS);

        for _ in 0..1000 {
            slot.advance_edge(TRANSITIONS);
        }

        assert!(slot.is_running());
        assert_eq!(slot.sequence().count, BlinkCount::Infinite);
        assert_eq!(probe.rising_edges(), 500);
    }

    #[test]
    fn test_running_finite_stages_request() {
        let clock = SimClock::new();
        let probe = PinProbe::new(&clock);
        let mut store: ChannelStore<_, 1> = ChannelStore::new();
        let id = store.allocate(probe.pin(), Level::High).unwrap();
        let slot = store.slot_mut(id);
        let current = Sequence::new(BlinkCount::Finite(1), 200, 300);
        slot.reconfigure(current, TRANSITIONS);
        slot.advance_edge(TRANSITIONS);

        let first = Sequence::new(BlinkCount::Finite(5), 50, 50);
        let second = Sequence::new(BlinkCount::Finite(2), 10, 90);
        assert_eq!(slot.reconfigure(first, TRANSITIONS), Reconfigured::Staged);
        assert_eq!(slot.reconfigure(second, TRANSITIONS), Reconfigured::Staged);
        assert!(!Reconfigured::Staged.needs_wake());

        // Running waveform untouched, only the latest request kept
        assert!(slot.is_lit());
        assert_eq!(slot.countdown(), 200);
        assert_eq!(slot.sequence(), &current);
        assert_eq!(slot.staged(), Some(&second));

        // Finish current pulse, then the staged sequence loads with no delay
        slot.advance_edge(TRANSITIONS);
        slot.advance_edge(TRANSITIONS);
        assert_eq!(slot.sequence(), &second);
        assert_eq!(slot.countdown(), 0);
        assert!(slot.staged().is_none());
        assert!(slot.is_running());

        slot.advance_edge(TRANSITIONS);
        assert!(slot.is_lit());
        assert_eq!(slot.countdown(), 10);
    }

    #[test]
    fn test_interrupt_infinite_and_resume() {
        let clock = SimClock::new();
        let probe = PinProbe::new(&clock);
        let mut store: ChannelStore<_, 1> = ChannelStore::new();
        let id = store.allocate(probe.pin(), Level::High).unwrap();
        let slot = store.slot_mut(id);
        let idle = Sequence::new(BlinkCount::Infinite, 100, 900);
        slot.reconfigure(idle, TRANSITIONS);
        slot.advance_edge(TRANSITIONS);
        assert!(slot.is_lit());

        let foreground = Sequence::new(BlinkCount::Finite(1), 200, 200);
        assert_eq!(
            slot.reconfigure(foreground, TRANSITIONS),
            Reconfigured::Interrupted
        );

        // Forced off, start transition before the first edge
        assert!(!slot.is_lit());
        assert_eq!(slot.countdown(), 500);
        assert_eq!(slot.state(), running(Edge::TurnOn));
        assert_eq!(slot.staged(), Some(&idle));
        assert_eq!(slot.sequence(), &foreground);

        // One foreground pulse
        slot.advance_edge(TRANSITIONS);
        assert!(slot.is_lit());
        assert_eq!(slot.countdown(), 200);
        slot.advance_edge(TRANSITIONS);
        assert!(!slot.is_lit());

        // Background pattern restored after the end transition
        slot.advance_edge(TRANSITIONS);
        assert_eq!(slot.sequence(), &idle);
        assert_eq!(slot.countdown(), 5000);
        assert!(!slot.is_lit());

        slot.advance_edge(TRANSITIONS);
        assert!(slot.is_lit());
        assert_eq!(slot.countdown(), 100);
    }

    #[test]
    fn test_second_infinite_request_replaces_backup() {
        let clock = SimClock::new();
        let probe = PinProbe::new(&clock);
        let mut store: ChannelStore<_, 1> = ChannelStore::new();
        let id = store.allocate(probe.pin(), Level::High).unwrap();
        let slot = store.slot_mut(id);
        let first = Sequence::new(BlinkCount::Infinite, 100, 900);
        let second = Sequence::new(BlinkCount::Infinite, 500, 500);
        let third = Sequence::new(BlinkCount::Finite(1), 10, 10);

        slot.reconfigure(first, TRANSITIONS);
        slot.reconfigure(second, TRANSITIONS);
        assert_eq!(slot.staged(), Some(&first));

        // Third request parks the second infinite pattern; the first is gone
        assert_eq!(slot.reconfigure(third, TRANSITIONS), Reconfigured::Interrupted);
        assert_eq!(slot.staged(), Some(&second));
    }

    #[test]
    fn test_stop_clears_everything() {
        let clock = SimClock::new();
        let probe = PinProbe::new(&clock);
        let mut store: ChannelStore<_, 1> = ChannelStore::new();
        let id = store.allocate(probe.pin(), Level::High).unwrap();
        let slot = store.slot_mut(id);
        slot.reconfigure(Sequence::new(BlinkCount::Finite(3), 10, 10), TRANSITIONS);
        slot.advance_edge(TRANSITIONS);
        slot.reconfigure(Sequence::new(BlinkCount::Finite(1), 10, 10), TRANSITIONS);

        slot.stop();

        assert_eq!(slot.state(), ChannelState::Idle);
        assert!(slot.staged().is_none());
        assert!(!slot.is_lit());

        // Stopping an idle channel is harmless
        slot.stop();
        assert_eq!(slot.state(), ChannelState::Idle);
    }

    #[test]
    fn test_stopped_infinite_does_not_resume() {
        let clock = SimClock::new();
        let probe = PinProbe::new(&clock);
        let mut store: ChannelStore<_, 1> = ChannelStore::new();
        let id = store.allocate(probe.pin(), Level::High).unwrap();
        let slot = store.slot_mut(id);
        slot.reconfigure(Sequence::new(BlinkCount::Infinite, 10, 10), TRANSITIONS);
        slot.stop();

        let next = Sequence::new(BlinkCount::Finite(1), 10, 10);
        assert_eq!(slot.reconfigure(next, TRANSITIONS), Reconfigured::Started);
        assert!(slot.staged().is_none());
    }

    #[test]
    fn test_zero_count_finishes_on_first_edge() {
        let clock = SimClock::new();
        let probe = PinProbe::new(&clock);
        let mut store: ChannelStore<_, 1> = ChannelStore::new();
        let id = store.allocate(probe.pin(), Level::High).unwrap();
        let slot = store.slot_mut(id);
        slot.reconfigure(Sequence::new(BlinkCount::Finite(0), 10, 10), TRANSITIONS);

        slot.advance_edge(TRANSITIONS);

        assert_eq!(slot.state(), ChannelState::Idle);
        assert_eq!(probe.rising_edges(), 0);
    }

    #[test]
    fn test_take_correction_once() {
        let clock = SimClock::new();
        let probe = PinProbe::new(&clock);
        let mut store: ChannelStore<_, 1> = ChannelStore::new();
        let id = store.allocate(probe.pin(), Level::High).unwrap();
        let slot = store.slot_mut(id);
        slot.reconfigure(Sequence::new(BlinkCount::Finite(1), 10, 10), TRANSITIONS);

        assert!(slot.take_correction());
        assert!(!slot.take_correction());
    }
}
