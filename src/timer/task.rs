//! Scheduler backed by one sleeping tokio task per armed timer

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::trace;

use super::{Fired, Scheduler, Timer, TimerId};

pub struct TokioScheduler {
    fired_tx: mpsc::UnboundedSender<Fired>,
    tasks: HashMap<TimerId, AbortHandle>,
}

impl TokioScheduler {
    /// Create a scheduler and the receiver its fired timers arrive on
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Fired>) {
        let (fired_tx, fired_rx) = mpsc::unbounded_channel();
        (
            Self {
                fired_tx,
                tasks: HashMap::new(),
            },
            fired_rx,
        )
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&mut self, id: TimerId, delay: Duration, timer: Timer) {
        self.tasks.retain(|_, task| !task.is_finished());

        let tx = self.fired_tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            trace!(?id, ?timer, "timer fired");
            let _ = tx.send(Fired { id, timer });
        });
        self.tasks.insert(id, handle.abort_handle());
    }

    fn cancel(&mut self, id: TimerId) {
        if let Some(task) = self.tasks.remove(&id) {
            task.abort();
        }
    }
}
