//! Scheduler loop

use embassy_sync::blocking_mutex::raw::RawMutex;
use strobe_hal::{BlinkPin, SchedulerSpawner, TickClock, WaitOutcome, WakeSignal};

use crate::blinker::Blinker;
use crate::channel::ChannelStore;
use crate::fmt::{info, trace};

impl<M, P, W, S, const N: usize> Blinker<M, P, W, S, N>
where
    M: RawMutex,
    P: BlinkPin,
    W: WakeSignal,
    S: SchedulerSpawner,
{
    /// Body of the scheduler task
    ///
    /// Returns once no channel is initialized. `clock` must tick at the
    /// configured `ticks_per_second`, the same unit the wake signal's
    /// timeout is expressed in.
    pub async fn run<C: TickClock>(&self, clock: &C) {
        info!("blink scheduler running");

        let mut deadline = {
            let mut store = self.store.lock().await;
            if self.shutdown_if_empty(&mut store) {
                return;
            }
            store.correct_and_get_min(0, false)
        };

        loop {
            while deadline > 0 {
                let started = clock.now_ticks();
                match self.wake.wait(deadline).await {
                    WaitOutcome::TimedOut => break,
                    WaitOutcome::Signaled => {
                        let mut store = self.store.lock().await;
                        // Includes time spent waiting for the lock
                        let elapsed = clock.elapsed_since(started);
                        if self.shutdown_if_empty(&mut store) {
                            return;
                        }
                        deadline = store.correct_and_get_min(elapsed, true);
                        trace!("woken after {} ticks, next edge in {}", elapsed, deadline);
                    }
                }
            }

            let mut store = self.store.lock().await;
            if self.shutdown_if_empty(&mut store) {
                return;
            }
            store.advance_due(deadline, self.transitions);
            deadline = store.correct_and_get_min(0, false);
        }
    }

    /// Mark the scheduler stopped if the pool is empty
    fn shutdown_if_empty(&self, store: &mut ChannelStore<P, N>) -> bool {
        if !store.is_empty() {
            return false;
        }
        store.scheduler_running = false;
        self.wake.reset();
        info!("blink scheduler stopped");
        true
    }
}
