use blockspeak_core::{OutputReporter, SpeechOutput, SpeechSettings, Utterance};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Words per minute at rate 1.0
const BASE_WPM: f32 = 175.0;

/// Prints utterances and reports them finished after a reading-time estimate
#[derive(Default)]
pub struct ConsoleOutput {
    active: Arc<AtomicU64>,
}

impl ConsoleOutput {
    fn reading_time(text: &str, rate: f32) -> Duration {
        let words = text.split_whitespace().count().max(1) as f32;
        Duration::from_secs_f32(words * 60.0 / (BASE_WPM * rate.max(0.1)))
    }
}

impl SpeechOutput for ConsoleOutput {
    fn is_available(&self) -> bool {
        true
    }

    fn speak(
        &self,
        utterance: &Utterance,
        settings: &SpeechSettings,
        reporter: OutputReporter,
    ) -> blockspeak_core::Result<()> {
        let session = reporter.session();
        self.active.store(session, Ordering::SeqCst);
        println!("🔊 [{:?}] {}", utterance.priority, utterance.text);

        let active = Arc::clone(&self.active);
        let duration = Self::reading_time(&utterance.text, settings.rate);
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            if active.load(Ordering::SeqCst) == session {
                reporter.ended();
            }
        });
        Ok(())
    }

    fn cancel(&self) {
        if self.active.swap(0, Ordering::SeqCst) != 0 {
            println!("🔇 (interrupted)");
        }
    }
}
