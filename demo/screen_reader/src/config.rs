use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use blockspeak_audio::CliSpeechConfig;
use blockspeak_core::{SchedulerConfig, SpeechSettings, WatcherConfig};

/// Where utterances go
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputKind {
    /// Local TTS engine, falling back to the console when none is installed
    Cli,
    Console,
}

/// High-level configuration for the screen reader demo
#[derive(Clone, Debug)]
pub struct ScreenReaderConfig {
    pub output: OutputKind,
    pub scheduler: SchedulerConfig,
    pub watcher: WatcherConfig,
    pub speech: SpeechSettings,
    pub tts: CliSpeechConfig,
    /// Pause between scripted steps
    pub step_delay: Duration,
}

impl Default for ScreenReaderConfig {
    fn default() -> Self {
        // Start from module defaults (which already consider env vars)
        let output = match std::env::var("SCREEN_READER_OUTPUT").as_deref() {
            Ok("console") => OutputKind::Console,
            _ => OutputKind::Cli,
        };
        Self {
            output,
            scheduler: SchedulerConfig::default(),
            watcher: WatcherConfig::default(),
            speech: SpeechSettings::default(),
            tts: CliSpeechConfig::default(),
            step_delay: Duration::from_millis(
                std::env::var("SCREEN_READER_STEP_MS")
                    .ok()
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(1500),
            ),
        }
    }
}

impl ScreenReaderConfig {
    /// Load configuration from a TOML file (path via SCREEN_READER_CONFIG or ./screen_reader.toml),
    /// overlaying values onto env-driven defaults.
    pub fn load() -> Self {
        let default = Self::default();
        let path =
            std::env::var("SCREEN_READER_CONFIG").unwrap_or_else(|_| "screen_reader.toml".into());
        let p = Path::new(&path);
        if !p.exists() {
            tracing::info!(target: "screen_reader", path = %path, "No TOML config found; using defaults/env");
            return default;
        }
        match fs::read_to_string(p) {
            Ok(s) => Self::from_toml_str(&s, default.clone()).unwrap_or_else(|e| {
                tracing::warn!(target: "screen_reader", error = %e, "Failed to parse TOML; using defaults");
                default
            }),
            Err(e) => {
                tracing::warn!(target: "screen_reader", error = %e, "Failed to read TOML; using defaults");
                default
            }
        }
    }

    pub fn from_toml_str(s: &str, base: Self) -> Result<Self, toml::de::Error> {
        toml::from_str::<ScreenReaderToml>(s).map(|t| t.overlay(base))
    }
}

// =========================
// TOML overlay definitions
// =========================

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct ScreenReaderToml {
    pub output: Option<String>,
    pub step_delay_ms: Option<u64>,
    pub scheduler: Option<SchedulerToml>,
    pub watcher: Option<WatcherToml>,
    pub speech: Option<SpeechToml>,
    pub tts: Option<TtsToml>,
}

impl ScreenReaderToml {
    fn overlay(self, mut base: ScreenReaderConfig) -> ScreenReaderConfig {
        match self.output.as_deref() {
            Some("console") => base.output = OutputKind::Console,
            Some("cli") => base.output = OutputKind::Cli,
            Some(other) => {
                tracing::warn!(target: "screen_reader", output = other, "Unknown output kind; keeping default")
            }
            None => {}
        }
        if let Some(v) = self.step_delay_ms {
            base.step_delay = Duration::from_millis(v);
        }
        if let Some(s) = self.scheduler {
            s.apply(&mut base.scheduler);
        }
        if let Some(w) = self.watcher {
            w.apply(&mut base.watcher);
        }
        if let Some(s) = self.speech {
            s.apply(&mut base.speech);
        }
        if let Some(t) = self.tts {
            t.apply(&mut base.tts);
        }
        base
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct SchedulerToml {
    pub min_speak_ms: Option<u64>,
    pub high_preempt_ms: Option<u64>,
    pub interruption_delay_ms: Option<u64>,
    pub settle_ms: Option<u64>,
    pub force_settle_ms: Option<u64>,
}
impl SchedulerToml {
    fn apply(self, s: &mut SchedulerConfig) {
        if let Some(v) = self.min_speak_ms {
            s.min_speak_time = Duration::from_millis(v);
        }
        if let Some(v) = self.high_preempt_ms {
            s.high_preempt_threshold = Duration::from_millis(v);
        }
        if let Some(v) = self.interruption_delay_ms {
            s.interruption_delay = Duration::from_millis(v);
        }
        if let Some(v) = self.settle_ms {
            s.settle_delay = Duration::from_millis(v);
        }
        if let Some(v) = self.force_settle_ms {
            s.force_settle_delay = Duration::from_millis(v);
        }
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct WatcherToml {
    pub poll_ms: Option<u64>,
    pub palette_poll_ms: Option<u64>,
}
impl WatcherToml {
    fn apply(self, w: &mut WatcherConfig) {
        if let Some(v) = self.poll_ms {
            w.poll_interval = Duration::from_millis(v);
        }
        if let Some(v) = self.palette_poll_ms {
            w.palette_poll_interval = Duration::from_millis(v);
        }
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct SpeechToml {
    pub enabled: Option<bool>,
    pub rate: Option<f32>,
    pub pitch: Option<f32>,
    pub volume: Option<f32>,
    pub voice_index: Option<usize>,
}
impl SpeechToml {
    fn apply(self, s: &mut SpeechSettings) {
        if let Some(v) = self.enabled {
            s.enabled = v;
        }
        if let Some(v) = self.rate {
            s.rate = v;
        }
        if let Some(v) = self.pitch {
            s.pitch = v;
        }
        if let Some(v) = self.volume {
            s.volume = v;
        }
        if let Some(v) = self.voice_index {
            s.voice_index = v;
        }
        *s = s.clone().clamped();
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct TtsToml {
    pub piper_bin: Option<PathBuf>,
    pub piper_voice: Option<PathBuf>,
    pub espeak_bin: Option<PathBuf>,
    pub voices: Option<Vec<String>>,
    pub player: Option<String>,
    pub timeout_ms: Option<u64>,
    pub temp_dir: Option<PathBuf>,
}
impl TtsToml {
    fn apply(self, t: &mut CliSpeechConfig) {
        if let Some(x) = self.piper_bin {
            t.piper_bin = Some(x);
        }
        if let Some(x) = self.piper_voice {
            t.piper_voice = Some(x);
        }
        if let Some(x) = self.espeak_bin {
            t.espeak_bin = Some(x);
        }
        if let Some(x) = self.voices {
            t.voices = x.into_iter().filter(|v| !v.trim().is_empty()).collect();
        }
        if let Some(x) = self.player {
            t.player = Some(x);
        }
        if let Some(x) = self.timeout_ms {
            t.timeout_ms = x;
        }
        if let Some(x) = self.temp_dir {
            t.temp_dir = x;
        }
    }
}
