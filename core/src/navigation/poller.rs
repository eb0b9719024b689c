use crate::announcer::{Announcement, Announcer};
use std::sync::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Host-state poller driven on a fixed interval
pub trait Poller: Send + 'static {
    fn name(&self) -> &'static str;

    /// Read current state; return what to say if it changed.
    fn tick(&mut self) -> Option<Announcement>;
}

/// Stops a running poller; stopping twice is harmless.
pub struct PollHandle {
    name: &'static str,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl PollHandle {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn dispose(&self) {
        let task = self
            .task
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take();
        if let Some(task) = task {
            task.abort();
            info!(target: "navigation", poller = self.name, "Poller disposed");
        }
    }

    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .as_ref()
            .is_some_and(|t| !t.is_finished())
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Run `poller` every `period` on the current runtime, announcing what it yields.
pub fn spawn_poller<P: Poller>(mut poller: P, announcer: Announcer, period: Duration) -> PollHandle {
    let name = poller.name();
    let period = if period.is_zero() {
        Duration::from_millis(1)
    } else {
        period
    };
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            if let Some(a) = poller.tick() {
                debug!(target: "navigation", poller = name, text = %a.text, "Poll produced announcement");
                announcer.announce(a.text, a.priority);
            }
        }
    });
    info!(target: "navigation", poller = name, period_ms = period.as_millis() as u64, "Poller started");
    PollHandle {
        name,
        task: Mutex::new(Some(task)),
    }
}
