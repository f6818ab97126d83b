//! Public blink operations
//!
//! A [`Blinker`] owns the channel pool behind an `embassy_sync` mutex and
//! is shared by reference between the scheduler task and every context
//! that issues requests. Requests mutate the pool under the lock and then
//! signal the scheduler; the scheduler never holds the lock while it
//! sleeps.
//!
//! ```ignore
//! let id = blinker.init_channel(pin, Level::High).await?;
//! blinker.start_blink(id, BlinkCount::Finite(3), 200, 500).await?;
//! ```

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use strobe_hal::{BlinkPin, Level, SchedulerSpawner, WakeSignal};

use crate::channel::{BlinkCount, ChannelId, ChannelStore, Sequence, Transitions};
use crate::config::BlinkConfig;
use crate::error::BlinkError;
use crate::fmt::{debug, info, warn};

/// Shared blink scheduler state for up to `N` channels
pub struct Blinker<M: RawMutex, P, W, S, const N: usize> {
    config: BlinkConfig,
    pub(crate) transitions: Transitions,
    pub(crate) store: Mutex<M, ChannelStore<P, N>>,
    pub(crate) wake: W,
    pub(crate) spawner: S,
}

impl<M, P, W, S, const N: usize> Blinker<M, P, W, S, N>
where
    M: RawMutex,
    P: BlinkPin,
    W: WakeSignal,
    S: SchedulerSpawner,
{
    pub fn new(config: BlinkConfig, wake: W, spawner: S) -> Self {
        Self {
            transitions: config.transitions(),
            config,
            store: Mutex::new(ChannelStore::new()),
            wake,
            spawner,
        }
    }

    pub fn config(&self) -> &BlinkConfig {
        &self.config
    }

    /// Maximum number of channels
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Claim a channel for `pin`
    ///
    /// The output is forced to its off level and switched to output mode.
    /// The scheduler task is spawned if it is not already running; if that
    /// fails the channel is released again.
    pub async fn init_channel(&self, pin: P, active_level: Level) -> Result<ChannelId, BlinkError> {
        let mut store = self.store.lock().await;

        let id = store.allocate(pin, active_level).map_err(|_| {
            warn!("no free blink channel ({} in use)", N);
            BlinkError::CapacityExceeded
        })?;

        if !store.scheduler_running {
            if let Err(err) = self.spawner.spawn_scheduler() {
                warn!("blink scheduler spawn failed: {}", err);
                store.release(id);
                return Err(BlinkError::SchedulerUnavailable);
            }
            store.scheduler_running = true;
            info!("blink scheduler spawned");
        }

        debug!("channel {} initialized", id.index());
        Ok(id)
    }

    /// Release a channel and hand its pin back
    ///
    /// The output is floated. Releasing the last channel lets the
    /// scheduler task exit.
    ///
    /// # Panics
    /// If `id` is not initialized.
    pub async fn deinit_channel(&self, id: ChannelId) -> P {
        let mut store = self.store.lock().await;
        let pin = store.release(id);
        debug!("channel {} released", id.index());

        if store.is_empty() {
            self.wake.signal();
        }
        pin
    }

    /// Blink `count` pulses of `pulse_ms` every `period_ms`
    ///
    /// An idle channel starts immediately. A running infinite pattern is
    /// paused, resumed once this request finishes. A running finite
    /// pattern completes first; only the latest request waits behind it.
    ///
    /// # Panics
    /// If `id` is not initialized.
    pub async fn start_blink(
        &self,
        id: ChannelId,
        count: BlinkCount,
        pulse_ms: u32,
        period_ms: u32,
    ) -> Result<(), BlinkError> {
        let sequence = self.sequence_for(count, pulse_ms, period_ms)?;
        let mut store = self.store.lock().await;
        self.apply(&mut store, id, sequence);
        Ok(())
    }

    /// [`Self::start_blink`] for contexts that cannot wait for the lock
    pub fn try_start_blink(
        &self,
        id: ChannelId,
        count: BlinkCount,
        pulse_ms: u32,
        period_ms: u32,
    ) -> Result<(), BlinkError> {
        let sequence = self.sequence_for(count, pulse_ms, period_ms)?;
        let mut store = self
            .store
            .try_lock()
            .map_err(|_| BlinkError::LockUnavailable)?;
        self.apply(&mut store, id, sequence);
        Ok(())
    }

    /// Force the output off and drop any running or staged pattern
    ///
    /// # Panics
    /// If `id` is not initialized.
    pub async fn stop_blink(&self, id: ChannelId) {
        self.store.lock().await.slot_mut(id).stop();
    }

    /// [`Self::stop_blink`] for contexts that cannot wait for the lock
    pub fn try_stop_blink(&self, id: ChannelId) -> Result<(), BlinkError> {
        self.store
            .try_lock()
            .map_err(|_| BlinkError::LockUnavailable)?
            .slot_mut(id)
            .stop();
        Ok(())
    }

    /// Light the output now. A running pattern overrides it at its next edge.
    pub async fn force_on(&self, id: ChannelId) {
        self.store.lock().await.slot_mut(id).drive_on();
    }

    /// Turn the output off now. A running pattern overrides it at its next
    /// edge.
    pub async fn force_off(&self, id: ChannelId) {
        self.store.lock().await.slot_mut(id).drive_off();
    }

    /// Invert the output now
    pub async fn toggle(&self, id: ChannelId) {
        self.store.lock().await.slot_mut(id).toggle();
    }

    /// Whether a pattern is running on the channel
    pub async fn is_blinking(&self, id: ChannelId) -> bool {
        self.store.lock().await.slot(id).is_running()
    }

    /// Handle of the channel in pool slot `index`, if claimed
    pub async fn channel_at(&self, index: usize) -> Option<ChannelId> {
        self.store.lock().await.channel_at(index)
    }

    pub(crate) fn sequence_for(
        &self,
        count: BlinkCount,
        pulse_ms: u32,
        period_ms: u32,
    ) -> Result<Sequence, BlinkError> {
        if pulse_ms > period_ms {
            return Err(BlinkError::InvalidParameters);
        }
        let on_ticks = self.config.ms_to_ticks(pulse_ms);
        let off_ticks = self.config.ms_to_ticks(period_ms - pulse_ms);
        // A zero-tick period never lets the scheduler sleep
        if on_ticks == 0 && off_ticks == 0 {
            return Err(BlinkError::InvalidParameters);
        }
        Ok(Sequence::new(count, on_ticks, off_ticks))
    }

    pub(crate) fn apply(&self, store: &mut ChannelStore<P, N>, id: ChannelId, sequence: Sequence) {
        let outcome = store.slot_mut(id).reconfigure(sequence, self.transitions);
        debug!("channel {}: {}", id.index(), outcome);
        if outcome.needs_wake() {
            self.wake.signal();
        }
    }
}
