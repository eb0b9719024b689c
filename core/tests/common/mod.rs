#![allow(dead_code)]

use blockspeak_core::{
    Announcer, OutputReporter, SchedulerConfig, SpeechError, SpeechOutput, SpeechSettings,
    Utterance,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub enum OutputEvent {
    Speak(String),
    Cancel,
}

/// Speech device that records calls and finishes only when told to
pub struct FakeOutput {
    available: AtomicBool,
    fail_next_speak: AtomicBool,
    events: Mutex<Vec<OutputEvent>>,
    reporters: Mutex<Vec<OutputReporter>>,
    settings: Mutex<Vec<SpeechSettings>>,
}

impl FakeOutput {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            available: AtomicBool::new(true),
            fail_next_speak: AtomicBool::new(false),
            events: Mutex::new(Vec::new()),
            reporters: Mutex::new(Vec::new()),
            settings: Mutex::new(Vec::new()),
        })
    }

    pub fn unavailable() -> Arc<Self> {
        let out = Self::new();
        out.available.store(false, Ordering::SeqCst);
        out
    }

    pub fn fail_next_speak(&self) {
        self.fail_next_speak.store(true, Ordering::SeqCst);
    }

    pub fn events(&self) -> Vec<OutputEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn spoken(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                OutputEvent::Speak(t) => Some(t),
                OutputEvent::Cancel => None,
            })
            .collect()
    }

    /// Settings passed with each speak call.
    pub fn settings_used(&self) -> Vec<SpeechSettings> {
        self.settings.lock().unwrap().clone()
    }

    pub fn reporter(&self, index: usize) -> OutputReporter {
        self.reporters.lock().unwrap()[index].clone()
    }

    /// Report natural end of the most recent utterance.
    pub fn finish(&self) {
        if let Some(r) = self.reporters.lock().unwrap().last() {
            r.ended();
        }
    }

    /// Report a device error on the most recent utterance.
    pub fn fail(&self, reason: &str) {
        if let Some(r) = self.reporters.lock().unwrap().last() {
            r.failed(reason);
        }
    }
}

impl SpeechOutput for FakeOutput {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn speak(
        &self,
        utterance: &Utterance,
        settings: &SpeechSettings,
        reporter: OutputReporter,
    ) -> blockspeak_core::Result<()> {
        if self.fail_next_speak.swap(false, Ordering::SeqCst) {
            return Err(SpeechError::Synthesis("engine crashed".into()));
        }
        self.events
            .lock()
            .unwrap()
            .push(OutputEvent::Speak(utterance.text.clone()));
        self.settings.lock().unwrap().push(settings.clone());
        self.reporters.lock().unwrap().push(reporter);
        Ok(())
    }

    fn cancel(&self) {
        self.events.lock().unwrap().push(OutputEvent::Cancel);
    }
}

pub fn start(output: &Arc<FakeOutput>) -> Announcer {
    Announcer::start(
        output.clone(),
        SchedulerConfig::builtin(),
        SpeechSettings::default(),
    )
}

pub async fn advance_ms(ms: u64) {
    tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
}
