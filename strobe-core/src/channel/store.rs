//! Fixed-capacity channel pool
//!
//! Slots are claimed by linear scan for the first free entry. A claimed
//! slot owns its output pin until it is released.

use strobe_hal::{BlinkPin, Level, OutputPin, PinMode};

use super::sequence::{BlinkCount, ChannelState, Sequence};

/// Index handle to a claimed channel slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelId(u8);

impl ChannelId {
    /// Slot index in the pool (0-based)
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// One claimed channel
#[derive(Debug)]
pub struct ChannelSlot<P> {
    pub(crate) pin: P,
    /// Level that lights the output
    pub(crate) active_level: Level,
    pub(crate) state: ChannelState,
    /// Sequence currently being played
    pub(crate) sequence: Sequence,
    /// Ticks until the next edge; negative while overdue
    pub(crate) countdown: i64,
    /// Sequence to load when the current one runs out
    pub(crate) staged: Option<Sequence>,
}

impl<P: OutputPin> ChannelSlot<P> {
    fn new(pin: P, active_level: Level) -> Self {
        Self {
            pin,
            active_level,
            state: ChannelState::Idle,
            sequence: Sequence::new(BlinkCount::Finite(0), 0, 0),
            countdown: 0,
            staged: None,
        }
    }

    /// Drive the output to its "on" level
    pub fn drive_on(&mut self) {
        self.pin.set_level(self.active_level);
    }

    /// Drive the output to its "off" level
    pub fn drive_off(&mut self) {
        self.pin.set_level(!self.active_level);
    }

    /// Invert the physical output level
    pub fn toggle(&mut self) {
        self.pin.toggle();
    }

    /// Whether the output is currently lit
    pub fn is_lit(&self) -> bool {
        self.pin.output_level() == self.active_level
    }
}

impl<P> ChannelSlot<P> {
    pub fn state(&self) -> ChannelState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, ChannelState::Running { .. })
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn staged(&self) -> Option<&Sequence> {
        self.staged.as_ref()
    }

    pub fn countdown(&self) -> i64 {
        self.countdown
    }

    pub fn active_level(&self) -> Level {
        self.active_level
    }
}

/// Fixed pool of `N` channel slots
#[derive(Debug)]
pub struct ChannelStore<P, const N: usize> {
    slots: [Option<ChannelSlot<P>>; N],
    /// Whether a scheduler task currently owns this pool
    pub(crate) scheduler_running: bool,
}

impl<P, const N: usize> Default for ChannelStore<P, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, const N: usize> ChannelStore<P, N> {
    /// Create an empty pool
    pub fn new() -> Self {
        Self {
            slots: core::array::from_fn(|_| None),
            scheduler_running: false,
        }
    }

    /// Number of slots in the pool
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of claimed slots
    pub fn initialized_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Whether no slot is claimed
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|s| s.is_none())
    }

    /// Look up a claimed slot by pool index
    pub fn channel_at(&self, index: usize) -> Option<ChannelId> {
        match self.slots.get(index) {
            Some(Some(_)) => Some(ChannelId(index as u8)),
            _ => None,
        }
    }

    /// Access a claimed slot
    ///
    /// # Panics
    /// If `id` does not refer to a claimed slot.
    pub fn slot(&self, id: ChannelId) -> &ChannelSlot<P> {
        match self.slots.get(id.index()) {
            Some(Some(slot)) => slot,
            _ => panic!("channel {} is not initialized", id.index()),
        }
    }

    /// Mutably access a claimed slot
    ///
    /// # Panics
    /// If `id` does not refer to a claimed slot.
    pub fn slot_mut(&mut self, id: ChannelId) -> &mut ChannelSlot<P> {
        match self.slots.get_mut(id.index()) {
            Some(Some(slot)) => slot,
            _ => panic!("channel {} is not initialized", id.index()),
        }
    }

    /// Iterate over slots with a running sequence
    pub(crate) fn running_mut(&mut self) -> impl Iterator<Item = &mut ChannelSlot<P>> {
        self.slots
            .iter_mut()
            .flatten()
            .filter(|slot| slot.is_running())
    }
}

impl<P: BlinkPin, const N: usize> ChannelStore<P, N> {
    /// Claim the first free slot for `pin`
    ///
    /// The output is driven to its "off" level before being switched to
    /// output mode. Returns the pin back if the pool is full.
    pub fn allocate(&mut self, pin: P, active_level: Level) -> Result<ChannelId, P> {
        let Some(index) = self.slots.iter().position(|s| s.is_none()) else {
            return Err(pin);
        };

        let mut slot = ChannelSlot::new(pin, active_level);
        slot.drive_off();
        slot.pin.set_mode(PinMode::Output);
        self.slots[index] = Some(slot);

        Ok(ChannelId(index as u8))
    }

    /// Release a claimed slot and float its output
    ///
    /// # Panics
    /// If `id` does not refer to a claimed slot.
    pub fn release(&mut self, id: ChannelId) -> P {
        let slot = match self.slots.get_mut(id.index()).and_then(Option::take) {
            Some(slot) => slot,
            None => panic!("channel {} is not initialized", id.index()),
        };

        let mut pin = slot.pin;
        pin.set_mode(PinMode::Input);
        pin
    }
}
