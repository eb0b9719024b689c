//! Utterance scheduler
//!
//! Every component that wants something spoken goes through an [`Announcer`].
//! Requests are handled one at a time, in order, by a single scheduler task
//! that owns the speech output:
//! - a "speaking" slot holding the current session
//! - a "pending" slot holding at most one queued utterance (newest wins)
//! - timers for the interruption grace period and device settle delays

mod output;
mod scheduler;

pub use output::{OutputReporter, SessionId, SpeechOutput};

use crate::config::SchedulerConfig;
use crate::settings::SpeechSettings;
use scheduler::{Command, Scheduler};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

/// Preemption class of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Priority {
    /// Descriptive narration
    #[default]
    Normal,
    /// Orientation feedback the user is waiting for (navigation)
    High,
}

/// One discrete unit of text scheduled for speech
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub priority: Priority,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Utterance {
    pub fn new(text: impl Into<String>, priority: Priority) -> Self {
        Self {
            text: text.into(),
            priority,
            created_at: chrono::Utc::now(),
        }
    }
}

/// Text plus priority, as produced by listeners and pollers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub text: String,
    pub priority: Priority,
}

impl Announcement {
    pub fn normal(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            priority: Priority::Normal,
        }
    }

    pub fn high(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            priority: Priority::High,
        }
    }
}

/// Scheduler state for diagnostics and tests
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchedulerSnapshot {
    /// Text of the current session, including one still waiting out its settle delay
    pub speaking: Option<String>,
    pub pending: Option<String>,
    pub enabled: bool,
    pub available: bool,
}

/// Handle to the scheduler task; cheap to clone.
///
/// All methods are fire-and-forget and never fail. The scheduler task stops
/// once every handle is dropped.
#[derive(Clone)]
pub struct Announcer {
    commands: mpsc::UnboundedSender<Command>,
    enabled: Arc<AtomicBool>,
}

impl Announcer {
    /// Spawn the scheduler task on the current tokio runtime.
    pub fn start(
        output: Arc<dyn SpeechOutput>,
        cfg: SchedulerConfig,
        settings: SpeechSettings,
    ) -> Self {
        let settings = settings.clamped();
        let enabled = Arc::new(AtomicBool::new(settings.enabled));
        let (tx, rx) = mpsc::unbounded_channel();
        let (scheduler, signals) = Scheduler::new(output, cfg, settings, Arc::clone(&enabled));
        tokio::spawn(scheduler.run(rx, signals));
        Self {
            commands: tx,
            enabled,
        }
    }

    pub fn announce(&self, text: impl Into<String>, priority: Priority) {
        let text = text.into();
        if text.trim().is_empty() {
            return;
        }
        if !self.is_enabled() {
            debug!(target: "announcer", text = %text, "Speech disabled; dropping announcement");
            return;
        }
        self.send(Command::Announce(Utterance::new(text, priority)));
    }

    pub fn announce_all(&self, announcements: impl IntoIterator<Item = Announcement>) {
        for a in announcements {
            self.announce(a.text, a.priority);
        }
    }

    /// Cancel everything and speak `text` after the force settle delay.
    pub fn force_announce(&self, text: impl Into<String>) {
        let text = text.into();
        if text.trim().is_empty() {
            return;
        }
        if !self.is_enabled() {
            debug!(target: "announcer", text = %text, "Speech disabled; dropping forced announcement");
            return;
        }
        self.send(Command::Force(Utterance::new(text, Priority::High)));
    }

    /// Stop playback and drop anything pending.
    pub fn cancel(&self) {
        self.send(Command::Cancel);
    }

    /// Voice settings for the next utterance onward.
    pub fn configure(&self, settings: SpeechSettings) {
        let settings = settings.clamped();
        self.enabled.store(settings.enabled, Ordering::SeqCst);
        self.send(Command::Configure(settings));
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
        self.send(Command::SetEnabled(enabled));
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    pub async fn snapshot(&self) -> SchedulerSnapshot {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Snapshot(tx));
        rx.await.unwrap_or_default()
    }

    fn send(&self, cmd: Command) {
        if self.commands.send(cmd).is_err() {
            warn!(target: "announcer", "Scheduler task has stopped; request ignored");
        }
    }
}
