//! Speech output seam
//!
//! The announcer is the only caller of a [`SpeechOutput`]. A device starts
//! playback in `speak` and later reports completion or failure through the
//! [`OutputReporter`] it was handed; reports for sessions that were cancelled
//! in the meantime are ignored.

use super::Utterance;
use crate::settings::SpeechSettings;
use crate::Result;
use tokio::sync::mpsc;

/// Identifies one playback session
pub type SessionId = u64;

/// Platform text-to-speech device
pub trait SpeechOutput: Send + Sync {
    /// False when the platform has no speech capability at all.
    fn is_available(&self) -> bool;

    /// Begin speaking `utterance`; must not block until playback ends.
    fn speak(
        &self,
        utterance: &Utterance,
        settings: &SpeechSettings,
        reporter: OutputReporter,
    ) -> Result<()>;

    /// Stop whatever is playing.
    fn cancel(&self);
}

#[derive(Debug)]
pub(crate) enum OutputSignal {
    Ended(SessionId),
    Failed(SessionId, String),
}

/// Completion callback for one playback session
#[derive(Clone, Debug)]
pub struct OutputReporter {
    session: SessionId,
    tx: mpsc::UnboundedSender<OutputSignal>,
}

impl OutputReporter {
    pub(crate) fn new(session: SessionId, tx: mpsc::UnboundedSender<OutputSignal>) -> Self {
        Self { session, tx }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Playback finished naturally.
    pub fn ended(&self) {
        let _ = self.tx.send(OutputSignal::Ended(self.session));
    }

    /// Playback stopped with a device error.
    pub fn failed(&self, reason: impl Into<String>) {
        let _ = self.tx.send(OutputSignal::Failed(self.session, reason.into()));
    }
}
