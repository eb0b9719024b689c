// Scheduler task: owns the speaking/pending slots and the speech output
use super::output::{OutputReporter, OutputSignal, SessionId, SpeechOutput};
use super::{Priority, SchedulerSnapshot, Utterance};
use crate::config::SchedulerConfig;
use crate::settings::SpeechSettings;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

pub(crate) enum Command {
    Announce(Utterance),
    Force(Utterance),
    Cancel,
    Configure(SpeechSettings),
    SetEnabled(bool),
    Snapshot(oneshot::Sender<SchedulerSnapshot>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Waiting for the device to register a cancellation
    Settling { until: Instant },
    Speaking,
}

#[derive(Debug)]
struct Session {
    id: SessionId,
    utterance: Utterance,
    /// Minimum speak time and the high priority threshold count from here
    started_at: Instant,
    phase: Phase,
}

pub(crate) struct Scheduler {
    output: Arc<dyn SpeechOutput>,
    cfg: SchedulerConfig,
    settings: SpeechSettings,
    enabled: Arc<AtomicBool>,
    session: Option<Session>,
    pending: Option<Utterance>,
    grace_deadline: Option<Instant>,
    last_session: SessionId,
    signals: mpsc::UnboundedSender<OutputSignal>,
}

impl Scheduler {
    pub(crate) fn new(
        output: Arc<dyn SpeechOutput>,
        cfg: SchedulerConfig,
        settings: SpeechSettings,
        enabled: Arc<AtomicBool>,
    ) -> (Self, mpsc::UnboundedReceiver<OutputSignal>) {
        let (signals, signals_rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            output,
            cfg,
            settings,
            enabled,
            session: None,
            pending: None,
            grace_deadline: None,
            last_session: 0,
            signals,
        };
        (scheduler, signals_rx)
    }

    pub(crate) async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut signals: mpsc::UnboundedReceiver<OutputSignal>,
    ) {
        info!(target: "announcer", available = self.output.is_available(), "Announcer started");
        loop {
            let deadline = self.next_deadline();
            tokio::select! {
                biased;
                Some(signal) = signals.recv() => self.on_signal(signal, Instant::now()),
                cmd = commands.recv() => match cmd {
                    Some(cmd) => self.on_command(cmd, Instant::now()),
                    None => break,
                },
                _ = wait_until(deadline) => self.on_timer(Instant::now()),
            }
        }
        self.clear("announcer stopped");
        info!(target: "announcer", "Announcer stopped");
    }

    fn on_command(&mut self, cmd: Command, now: Instant) {
        match cmd {
            Command::Announce(utterance) => self.announce(utterance, now),
            Command::Force(utterance) => self.force(utterance, now),
            Command::Cancel => {
                if self.output_ready("cancel") {
                    self.clear("cancel requested");
                }
            }
            Command::Configure(settings) => self.configure(settings),
            Command::SetEnabled(enabled) => self.set_enabled(enabled),
            Command::Snapshot(tx) => {
                let _ = tx.send(self.snapshot());
            }
        }
    }

    fn announce(&mut self, utterance: Utterance, now: Instant) {
        if !self.output_ready("announce") || !self.speech_enabled(&utterance) {
            return;
        }
        let high = utterance.priority == Priority::High;
        if high && self.pending.take().is_some() {
            self.grace_deadline = None;
            debug!(target: "announcer", "High priority request cleared the pending utterance");
        }

        let Some(started_at) = self.session.as_ref().map(|s| s.started_at) else {
            self.start(utterance, now);
            return;
        };
        let elapsed = now.saturating_duration_since(started_at);

        if high && elapsed > self.cfg.high_preempt_threshold {
            self.preempt(utterance, now, self.cfg.settle_delay);
        } else if elapsed < self.cfg.min_speak_time {
            let pending_high = matches!(&self.pending, Some(p) if p.priority == Priority::High);
            if pending_high && !high {
                debug!(target: "announcer", text = %utterance.text, "Queued high priority utterance kept; normal request dropped");
                return;
            }
            debug!(target: "announcer", text = %utterance.text, elapsed_ms = elapsed.as_millis() as u64, "Deferring utterance");
            self.pending = Some(utterance);
            self.grace_deadline =
                Some(started_at + self.cfg.min_speak_time + self.cfg.interruption_delay);
        } else {
            self.preempt(utterance, now, self.cfg.settle_delay);
        }
    }

    fn force(&mut self, utterance: Utterance, now: Instant) {
        if !self.output_ready("force_announce") || !self.speech_enabled(&utterance) {
            return;
        }
        self.preempt(utterance, now, self.cfg.force_settle_delay);
    }

    fn configure(&mut self, settings: SpeechSettings) {
        if !self.output_ready("configure") {
            return;
        }
        let settings = settings.clamped();
        debug!(target: "announcer", ?settings, "Speech settings updated");
        let enabled = settings.enabled;
        self.settings = settings;
        self.set_enabled(enabled);
    }

    fn set_enabled(&mut self, enabled: bool) {
        if !self.output_ready("set_enabled") {
            return;
        }
        self.enabled.store(enabled, Ordering::SeqCst);
        self.settings.enabled = enabled;
        if !enabled {
            self.clear("speech disabled");
        }
    }

    /// Start speaking right away; only valid when nothing is audible.
    fn start(&mut self, utterance: Utterance, now: Instant) {
        let id = self.next_session_id();
        self.session = Some(Session {
            id,
            utterance,
            started_at: now,
            phase: Phase::Speaking,
        });
        self.begin_output();
    }

    /// Cut off the current session (and anything pending) in favour of `utterance`.
    fn preempt(&mut self, utterance: Utterance, now: Instant, settle: Duration) {
        self.stop_current();
        self.pending = None;
        self.grace_deadline = None;

        if settle.is_zero() {
            self.start(utterance, now);
            return;
        }
        let id = self.next_session_id();
        debug!(target: "announcer", session = id, text = %utterance.text, "Preempting after settle delay");
        self.session = Some(Session {
            id,
            utterance,
            started_at: now,
            phase: Phase::Settling {
                until: now + settle,
            },
        });
    }

    fn begin_output(&mut self) {
        let available = self.output.is_available();
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if !available {
            debug!(target: "announcer", "Speech output unavailable; dropping session");
            self.session = None;
            return;
        }
        session.phase = Phase::Speaking;
        let reporter = OutputReporter::new(session.id, self.signals.clone());
        info!(target: "announcer", session = session.id, text = %session.utterance.text, "Speaking");
        if let Err(e) = self
            .output
            .speak(&session.utterance, &self.settings, reporter)
        {
            warn!(target: "announcer", error = %e, "Speech output failed to start");
            self.session = None;
        }
    }

    fn on_timer(&mut self, now: Instant) {
        let settled = matches!(
            self.session.as_ref().map(|s| s.phase),
            Some(Phase::Settling { until }) if now >= until
        );
        if settled {
            self.begin_output();
        }

        if matches!(self.grace_deadline, Some(deadline) if now >= deadline) {
            self.grace_deadline = None;
            if let Some(next) = self.pending.take() {
                debug!(target: "announcer", text = %next.text, "Grace period over; interrupting");
                if self.session.is_some() {
                    self.preempt(next, now, self.cfg.settle_delay);
                } else {
                    self.start(next, now);
                }
            }
        }
    }

    fn on_signal(&mut self, signal: OutputSignal, now: Instant) {
        let (id, failure) = match signal {
            OutputSignal::Ended(id) => (id, None),
            OutputSignal::Failed(id, reason) => (id, Some(reason)),
        };
        let current = matches!(
            &self.session,
            Some(s) if s.id == id && s.phase == Phase::Speaking
        );
        if !current {
            debug!(target: "announcer", session = id, "Ignoring signal from a stale session");
            return;
        }

        match failure {
            Some(reason) => {
                warn!(target: "announcer", session = id, reason = %reason, "Speech output error")
            }
            None => debug!(target: "announcer", session = id, "Utterance finished"),
        }
        self.session = None;
        self.grace_deadline = None;
        if let Some(next) = self.pending.take() {
            self.start(next, now);
        }
    }

    /// Cancel playback and forget everything pending.
    fn clear(&mut self, reason: &str) {
        if self.session.is_some() || self.pending.is_some() {
            debug!(target: "announcer", reason, "Clearing speech state");
        }
        self.stop_current();
        self.pending = None;
        self.grace_deadline = None;
    }

    fn stop_current(&mut self) {
        if let Some(session) = self.session.take() {
            if session.phase == Phase::Speaking {
                self.output.cancel();
            }
            debug!(target: "announcer", session = session.id, "Session stopped");
        }
    }

    fn output_ready(&self, op: &str) -> bool {
        let available = self.output.is_available();
        if !available {
            debug!(target: "announcer", op, "Speech output unavailable; ignoring");
        }
        available
    }

    fn speech_enabled(&self, utterance: &Utterance) -> bool {
        let enabled = self.enabled.load(Ordering::SeqCst);
        if !enabled {
            debug!(target: "announcer", text = %utterance.text, "Speech disabled; dropping");
        }
        enabled
    }

    fn next_deadline(&self) -> Option<Instant> {
        let settle = match self.session.as_ref().map(|s| s.phase) {
            Some(Phase::Settling { until }) => Some(until),
            _ => None,
        };
        match (settle, self.grace_deadline) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn next_session_id(&mut self) -> SessionId {
        self.last_session += 1;
        self.last_session
    }

    fn snapshot(&self) -> SchedulerSnapshot {
        SchedulerSnapshot {
            speaking: self.session.as_ref().map(|s| s.utterance.text.clone()),
            pending: self.pending.as_ref().map(|u| u.text.clone()),
            enabled: self.enabled.load(Ordering::SeqCst),
            available: self.output.is_available(),
        }
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(d) => sleep_until(d).await,
        None => std::future::pending::<()>().await,
    }
}
