//! Virtual-time scheduler for tests

use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{Fired, Scheduler, Timer, TimerId};

#[derive(Default)]
struct Queue {
    now: Duration,
    entries: Vec<(Duration, TimerId, Timer)>,
}

pub struct ManualScheduler {
    queue: Arc<Mutex<Queue>>,
}

/// Test-side handle onto a [`ManualScheduler`]'s virtual clock
#[derive(Clone)]
pub struct ManualClock {
    queue: Arc<Mutex<Queue>>,
}

impl ManualScheduler {
    pub fn new() -> (Self, ManualClock) {
        let queue = Arc::new(Mutex::new(Queue::default()));
        (
            Self {
                queue: Arc::clone(&queue),
            },
            ManualClock { queue },
        )
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, id: TimerId, delay: Duration, timer: Timer) {
        let mut queue = self.queue.lock().unwrap();
        let due = queue.now + delay;
        queue.entries.push((due, id, timer));
    }

    fn cancel(&mut self, id: TimerId) {
        self.queue
            .lock()
            .unwrap()
            .entries
            .retain(|(_, entry, _)| *entry != id);
    }
}

impl ManualClock {
    pub fn now(&self) -> Duration {
        self.queue.lock().unwrap().now
    }

    pub fn pending(&self) -> usize {
        self.queue.lock().unwrap().entries.len()
    }

    /// Remove the earliest timer due at or before `deadline` and move the
    /// clock to its due time.
    pub fn pop_due(&self, deadline: Duration) -> Option<Fired> {
        let mut queue = self.queue.lock().unwrap();
        let index = queue
            .entries
            .iter()
            .enumerate()
            .filter(|(_, (due, _, _))| *due <= deadline)
            .min_by_key(|(_, (due, id, _))| (*due, *id))
            .map(|(index, _)| index)?;

        let (due, id, timer) = queue.entries.remove(index);
        queue.now = queue.now.max(due);
        Some(Fired { id, timer })
    }

    /// Move the clock forward, returning every timer that came due in order.
    /// Timers scheduled by the caller in response are not included.
    pub fn advance(&self, by: Duration) -> Vec<Fired> {
        let deadline = self.now() + by;
        let mut fired = Vec::new();
        while let Some(next) = self.pop_due(deadline) {
            fired.push(next);
        }
        self.queue.lock().unwrap().now = deadline;
        fired
    }

    pub fn set_now(&self, now: Duration) {
        let mut queue = self.queue.lock().unwrap();
        queue.now = queue.now.max(now);
    }
}
