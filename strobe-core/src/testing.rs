//! Host-side fakes for the HAL contracts
//!
//! Time is simulated: [`SimClock`] only moves when a test advances it, and
//! [`SimWake`] yields to the executor until it is signaled or the clock
//! passes its deadline. Driving the scheduler and a test script together
//! with `embassy_futures::join` gives fully deterministic edge timestamps.

use core::cell::{Cell, RefCell};
use std::rc::Rc;
use std::vec::Vec;

use embassy_futures::yield_now;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use strobe_hal::{
    BlinkPin, Level, OutputPin, PinMode, SchedulerSpawner, SpawnError, TickClock, WaitOutcome,
    WakeSignal,
};

use crate::config::BlinkConfig;
use crate::Blinker;

/// Blinker wired to the fakes in this module
pub(crate) type SimBlinker<const N: usize> = Blinker<NoopRawMutex, MockPin, SimWake, MockSpawner, N>;

/// Config with one tick per millisecond
pub(crate) fn millisecond_config() -> BlinkConfig {
    BlinkConfig {
        ticks_per_second: 1000,
        ..BlinkConfig::default()
    }
}

pub(crate) fn sim_blinker<const N: usize>(clock: &SimClock) -> SimBlinker<N> {
    Blinker::new(millisecond_config(), SimWake::new(clock), MockSpawner::new())
}

/// Manually advanced tick counter
#[derive(Debug, Clone, Default)]
pub(crate) struct SimClock {
    now: Rc<Cell<u64>>,
}

impl SimClock {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Advance one tick at a time, yielding after each so the scheduler
    /// observes every intermediate instant
    pub(crate) async fn advance(&self, ticks: u64) {
        for _ in 0..ticks {
            self.now.set(self.now.get() + 1);
            yield_now().await;
        }
    }
}

impl TickClock for SimClock {
    fn now_ticks(&self) -> u64 {
        self.now.get()
    }
}

/// Wake signal that waits in simulated time
#[derive(Debug)]
pub(crate) struct SimWake {
    clock: SimClock,
    pending: Cell<bool>,
    signals: Cell<u32>,
}

impl SimWake {
    pub(crate) fn new(clock: &SimClock) -> Self {
        Self {
            clock: clock.clone(),
            pending: Cell::new(false),
            signals: Cell::new(0),
        }
    }

    pub(crate) fn signal_count(&self) -> u32 {
        self.signals.get()
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.pending.get()
    }
}

impl WakeSignal for SimWake {
    fn signal(&self) {
        self.pending.set(true);
        self.signals.set(self.signals.get() + 1);
    }

    async fn wait(&self, timeout_ticks: u64) -> WaitOutcome {
        let deadline = self.clock.now_ticks().saturating_add(timeout_ticks);
        loop {
            if self.pending.replace(false) {
                return WaitOutcome::Signaled;
            }
            if self.clock.now_ticks() >= deadline {
                return WaitOutcome::TimedOut;
            }
            yield_now().await;
        }
    }

    fn reset(&self) {
        self.pending.set(false);
    }
}

/// Counts scheduler spawn requests
#[derive(Debug, Default)]
pub(crate) struct MockSpawner {
    spawned: Cell<u32>,
    refuse: Cell<bool>,
}

impl MockSpawner {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn spawn_count(&self) -> u32 {
        self.spawned.get()
    }

    pub(crate) fn refuse(&self, refuse: bool) {
        self.refuse.set(refuse);
    }
}

impl SchedulerSpawner for MockSpawner {
    fn spawn_scheduler(&self) -> Result<(), SpawnError> {
        if self.refuse.get() {
            return Err(SpawnError::Busy);
        }
        self.spawned.set(self.spawned.get() + 1);
        Ok(())
    }
}

#[derive(Debug)]
struct ProbeState {
    level: Level,
    mode: PinMode,
    /// Level changes with the tick they happened at
    edges: Vec<(u64, Level)>,
}

/// Observer side of a [`MockPin`]
#[derive(Debug, Clone)]
pub(crate) struct PinProbe {
    state: Rc<RefCell<ProbeState>>,
    clock: SimClock,
}

impl PinProbe {
    /// Pin starts low and floating
    pub(crate) fn new(clock: &SimClock) -> Self {
        Self {
            state: Rc::new(RefCell::new(ProbeState {
                level: Level::Low,
                mode: PinMode::Input,
                edges: Vec::new(),
            })),
            clock: clock.clone(),
        }
    }

    pub(crate) fn pin(&self) -> MockPin {
        MockPin {
            probe: self.clone(),
        }
    }

    pub(crate) fn level(&self) -> Level {
        self.state.borrow().level
    }

    pub(crate) fn mode(&self) -> PinMode {
        self.state.borrow().mode
    }

    pub(crate) fn edges(&self) -> Vec<(u64, Level)> {
        self.state.borrow().edges.clone()
    }

    /// Number of low-to-high transitions
    pub(crate) fn rising_edges(&self) -> usize {
        self.state
            .borrow()
            .edges
            .iter()
            .filter(|(_, level)| *level == Level::High)
            .count()
    }

    fn write(&self, level: Level) {
        let now = self.clock.now_ticks();
        let mut state = self.state.borrow_mut();
        if state.level != level {
            state.edges.push((now, level));
            state.level = level;
        }
    }
}

/// Pin handed to the blinker
#[derive(Debug)]
pub(crate) struct MockPin {
    probe: PinProbe,
}

impl OutputPin for MockPin {
    fn set_high(&mut self) {
        self.probe.write(Level::High);
    }

    fn set_low(&mut self) {
        self.probe.write(Level::Low);
    }

    fn is_set_high(&self) -> bool {
        self.probe.level() == Level::High
    }
}

impl BlinkPin for MockPin {
    fn set_mode(&mut self, mode: PinMode) {
        self.probe.state.borrow_mut().mode = mode;
    }
}
