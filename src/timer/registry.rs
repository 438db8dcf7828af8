use std::collections::HashMap;
use std::time::Duration;

use tracing::debug;

use super::{Fired, Scheduler, Timer, TimerId, TimerSlot};

/// Tracks the single active timer of every [`TimerSlot`]
pub struct TimerRegistry {
    scheduler: Box<dyn Scheduler>,
    next_id: u64,
    active: HashMap<TimerSlot, TimerId>,
}

impl TimerRegistry {
    pub fn new(scheduler: Box<dyn Scheduler>) -> Self {
        Self {
            scheduler,
            next_id: 0,
            active: HashMap::new(),
        }
    }

    /// Arm `timer` after `delay`, replacing whatever its slot held
    pub fn arm(&mut self, delay: Duration, timer: Timer) -> TimerId {
        let slot = timer.action.slot();
        let id = TimerId(self.next_id);
        self.next_id += 1;

        if let Some(old) = self.active.insert(slot, id) {
            debug!(?slot, ?old, "replacing armed timer");
            self.scheduler.cancel(old);
        }

        self.scheduler.schedule(id, delay, timer);
        id
    }

    /// Cancel the slot's timer. Returns whether one was armed.
    pub fn cancel(&mut self, slot: TimerSlot) -> bool {
        match self.active.remove(&slot) {
            Some(id) => {
                self.scheduler.cancel(id);
                true
            }
            None => false,
        }
    }

    #[cfg(test)]
    pub fn is_armed(&self, slot: TimerSlot) -> bool {
        self.active.contains_key(&slot)
    }

    /// Accept a fired timer if it is still the active one for its slot.
    ///
    /// A timer can fire after being replaced or cancelled when its delivery
    /// was already queued; those return `false`.
    pub fn claim(&mut self, fired: &Fired) -> bool {
        let slot = fired.timer.action.slot();
        if self.active.get(&slot) == Some(&fired.id) {
            self.active.remove(&slot);
            true
        } else {
            false
        }
    }
}
