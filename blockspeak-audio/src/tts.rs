//! Speech output backed by local CLI engines
//!
//! Synthesizes each utterance with a local engine, with graceful degradation:
//! - Prefer Piper (higher quality, needs a voice model, played through a WAV player)
//! - Fallback to espeak-ng (widely available, plays directly)
//! - If neither is present the output reports itself unavailable
//!
//! Voice settings map onto engine flags:
//! - rate: Piper `--length_scale`, espeak-ng `-s` words per minute
//! - pitch: espeak-ng `-p` (Piper has no pitch control)
//! - volume: Piper post-scales the WAV, espeak-ng `-a`
//! - voice_index: entry of the configured voice list
//!
//! Env overrides:
//! - PIPER_BIN, PIPER_VOICE
//! - ESPEAK_BIN
//! - BLOCKSPEAK_VOICES (comma separated model paths or espeak voice codes)
//! - BLOCKSPEAK_PLAYER (aplay|paplay|ffplay)
//! - TTS_TIMEOUT_MS, TTS_TEMP_DIR

use crate::wav::scale_wav_file;
use blockspeak_core::{
    OutputReporter, Result, SpeechError, SpeechOutput, SpeechSettings, Utterance,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

const PLAYERS: [&str; 3] = ["aplay", "paplay", "ffplay"];

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CliSpeechConfig {
    pub temp_dir: PathBuf,
    pub timeout_ms: u64,
    pub piper_bin: Option<PathBuf>,
    pub piper_voice: Option<PathBuf>,
    pub espeak_bin: Option<PathBuf>,
    /// Selectable voices, indexed by `SpeechSettings::voice_index`
    pub voices: Vec<String>,
    /// Preferred WAV player for Piper output
    pub player: Option<String>,
}

impl Default for CliSpeechConfig {
    fn default() -> Self {
        let temp_dir = std::env::var("TTS_TEMP_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| std::env::temp_dir());
        let timeout_ms = std::env::var("TTS_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(20_000);

        let piper_bin = get_from_env_or_path("PIPER_BIN", "piper");
        let piper_voice = std::env::var("PIPER_VOICE").ok().map(PathBuf::from);
        let espeak_bin =
            get_from_env_or_path("ESPEAK_BIN", "espeak-ng").or_else(|| get_from_path("espeak"));
        let voices = std::env::var("BLOCKSPEAK_VOICES")
            .map(|s| parse_voices(&s))
            .unwrap_or_default();
        let player = std::env::var("BLOCKSPEAK_PLAYER")
            .ok()
            .filter(|s| !s.is_empty());

        Self {
            temp_dir,
            timeout_ms,
            piper_bin,
            piper_voice,
            espeak_bin,
            voices,
            player,
        }
    }
}

impl CliSpeechConfig {
    /// Config with no engines; the output built from it is unavailable.
    pub fn silent() -> Self {
        Self {
            temp_dir: std::env::temp_dir(),
            timeout_ms: 20_000,
            piper_bin: None,
            piper_voice: None,
            espeak_bin: None,
            voices: Vec::new(),
            player: None,
        }
    }
}

fn parse_voices(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn get_from_env_or_path(env_key: &str, default_bin: &str) -> Option<PathBuf> {
    if let Ok(p) = std::env::var(env_key) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return Some(pb);
        }
    }
    get_from_path(default_bin)
}

fn get_from_path(bin: &str) -> Option<PathBuf> {
    if bin.contains(std::path::MAIN_SEPARATOR) {
        let p = PathBuf::from(bin);
        return if p.exists() { Some(p) } else { None };
    }
    let paths = std::env::var("PATH").ok()?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(bin))
        .find(|candidate| candidate.exists())
}

/// Engine chosen for this output
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Engine {
    Piper { bin: PathBuf, default_voice: PathBuf },
    Espeak { bin: PathBuf },
    None,
}

impl Engine {
    /// Piper needs a voice model; without one espeak-ng is used instead.
    pub fn select(cfg: &CliSpeechConfig) -> Self {
        if let Some(bin) = &cfg.piper_bin {
            let default_voice = cfg
                .piper_voice
                .clone()
                .or_else(|| cfg.voices.first().map(PathBuf::from));
            if let Some(default_voice) = default_voice {
                return Engine::Piper {
                    bin: bin.clone(),
                    default_voice,
                };
            }
            warn!(target: "speech", "Piper found but no voice model configured; set PIPER_VOICE");
        }
        if let Some(bin) = &cfg.espeak_bin {
            return Engine::Espeak { bin: bin.clone() };
        }
        Engine::None
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Engine::Piper { .. } => "piper",
            Engine::Espeak { .. } => "espeak-ng",
            Engine::None => "none",
        }
    }
}

/// Arguments for a Piper run writing `out_wav`; text goes on stdin.
fn piper_args(voice: &Path, rate: f32, out_wav: &Path) -> Vec<String> {
    let length_scale = (1.0f32 / rate).clamp(0.5, 2.0);
    vec![
        "-m".into(),
        voice.to_string_lossy().into_owned(),
        "-f".into(),
        out_wav.to_string_lossy().into_owned(),
        "--length_scale".into(),
        format!("{:.2}", length_scale),
    ]
}

/// Arguments for espeak-ng speaking straight to the audio device.
fn espeak_args(voice: Option<&str>, settings: &SpeechSettings, text: &str) -> Vec<String> {
    let wpm = (175.0 * settings.rate).round().clamp(80.0, 450.0) as i32;
    let pitch = (50.0 * settings.pitch).round().clamp(0.0, 99.0) as i32;
    let amp = (100.0 * settings.volume).round().clamp(0.0, 200.0) as i32;
    let mut args = Vec::with_capacity(10);
    if let Some(v) = voice.filter(|v| !v.is_empty()) {
        args.push("-v".into());
        args.push(v.to_string());
    }
    args.push("-s".into());
    args.push(wpm.to_string());
    args.push("-p".into());
    args.push(pitch.to_string());
    args.push("-a".into());
    args.push(amp.to_string());
    args.push("--".into());
    args.push(text.to_string());
    args
}

fn player_args(player: &Path, wav: &Path) -> Vec<String> {
    let name = player
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("");
    let wav = wav.to_string_lossy().into_owned();
    match name {
        "ffplay" => vec!["-autoexit".into(), "-nodisp".into(), "-loglevel".into(), "quiet".into(), wav],
        _ => vec![wav],
    }
}

fn select_player(pref: Option<&str>) -> Option<PathBuf> {
    pref.and_then(get_from_path)
        .or_else(|| PLAYERS.iter().find_map(|p| get_from_path(p)))
}

/// Everything a background playback task needs
struct SpeakJob {
    engine: Engine,
    text: String,
    settings: SpeechSettings,
    voice: Option<String>,
    wav_path: PathBuf,
    player: Option<PathBuf>,
}

impl SpeakJob {
    /// Piper output is only temporary when a player consumes it.
    fn discards_wav(&self) -> bool {
        matches!(self.engine, Engine::Piper { .. }) && self.player.is_some()
    }

    async fn run(&self) -> Result<()> {
        match &self.engine {
            Engine::Piper { bin, default_voice } => {
                let voice = self
                    .voice
                    .as_ref()
                    .map(PathBuf::from)
                    .unwrap_or_else(|| default_voice.clone());
                self.run_piper(bin, &voice).await
            }
            Engine::Espeak { bin } => self.run_espeak(bin).await,
            Engine::None => Err(SpeechError::OutputUnavailable),
        }
    }

    async fn run_piper(&self, bin: &Path, voice: &Path) -> Result<()> {
        let mut cmd = Command::new(bin);
        cmd.args(piper_args(voice, self.settings.rate, &self.wav_path))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        debug!(target: "speech", command = ?cmd, "Running piper");

        let mut child = cmd.spawn()?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(self.text.as_bytes()).await?;
        }
        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(SpeechError::Synthesis(format!(
                "Piper failed: {}",
                String::from_utf8_lossy(&output.stderr)
            )));
        }

        if (self.settings.volume - 1.0).abs() > f32::EPSILON {
            if let Err(e) = scale_wav_file(&self.wav_path, self.settings.volume).await {
                warn!(target: "speech", error = %e, "Failed to scale volume for WAV");
            }
        }

        let Some(player) = &self.player else {
            info!(target: "speech", path = ?self.wav_path, "No audio player found; kept WAV on disk");
            return Ok(());
        };
        let status = Command::new(player)
            .args(player_args(player, &self.wav_path))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .status()
            .await?;
        if !status.success() {
            return Err(SpeechError::Playback(format!(
                "{} exited with {}",
                player.display(),
                status
            )));
        }
        Ok(())
    }

    async fn run_espeak(&self, bin: &Path) -> Result<()> {
        let mut cmd = Command::new(bin);
        cmd.args(espeak_args(self.voice.as_deref(), &self.settings, &self.text))
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        debug!(target: "speech", command = ?cmd, "Running espeak-ng");
        let output = cmd.output().await?;
        if !output.status.success() {
            return Err(SpeechError::Synthesis(format!(
                "espeak-ng failed: {}",
                String::from_utf8_lossy(&output.stderr)
            )));
        }
        Ok(())
    }
}

/// [`SpeechOutput`] that runs one engine process per utterance.
///
/// Cancelling drops the playback task, which kills the child process.
pub struct CliSpeechOutput {
    cfg: CliSpeechConfig,
    engine: Engine,
    player: Option<PathBuf>,
    current: Mutex<Option<oneshot::Sender<()>>>,
}

impl CliSpeechOutput {
    pub fn new(cfg: CliSpeechConfig) -> Self {
        let engine = Engine::select(&cfg);
        let player = match engine {
            Engine::Piper { .. } => select_player(cfg.player.as_deref()),
            _ => None,
        };
        match &engine {
            Engine::None => warn!(
                target: "speech",
                "No TTS engine detected (Piper/espeak-ng missing); speech output unavailable"
            ),
            e => info!(target: "speech", engine = e.as_str(), player = ?player, "Speech engine selected"),
        }
        Self {
            cfg,
            engine,
            player,
            current: Mutex::new(None),
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn voices(&self) -> &[String] {
        &self.cfg.voices
    }

    fn stop_playback(&self) -> bool {
        let previous = self
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match previous {
            Some(tx) => tx.send(()).is_ok(),
            None => false,
        }
    }
}

impl SpeechOutput for CliSpeechOutput {
    fn is_available(&self) -> bool {
        self.engine != Engine::None
    }

    fn speak(
        &self,
        utterance: &Utterance,
        settings: &SpeechSettings,
        reporter: OutputReporter,
    ) -> Result<()> {
        if !self.is_available() {
            return Err(SpeechError::OutputUnavailable);
        }
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| SpeechError::Config(format!("no tokio runtime: {}", e)))?;

        self.stop_playback();
        let (cancel_tx, cancel_rx) = oneshot::channel();
        *self
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(cancel_tx);

        let session = reporter.session();
        let job = SpeakJob {
            engine: self.engine.clone(),
            text: utterance.text.clone(),
            settings: settings.clone(),
            voice: self.cfg.voices.get(settings.voice_index).cloned(),
            wav_path: self
                .cfg
                .temp_dir
                .join(format!("blockspeak_{}_{}.wav", std::process::id(), session)),
            player: self.player.clone(),
        };
        let limit = Duration::from_millis(self.cfg.timeout_ms);

        runtime.spawn(async move {
            let outcome = tokio::select! {
                r = tokio::time::timeout(limit, job.run()) => Some(match r {
                    Ok(r) => r,
                    Err(_) => Err(SpeechError::Playback(format!(
                        "synthesis/playback timed out after {}ms",
                        limit.as_millis()
                    ))),
                }),
                _ = cancel_rx => None,
            };
            match outcome {
                Some(Ok(())) => {
                    debug!(target: "speech", session, "Playback finished");
                    reporter.ended();
                }
                Some(Err(e)) => {
                    warn!(target: "speech", session, error = %e, "Playback failed");
                    reporter.failed(e.to_string());
                }
                None => debug!(target: "speech", session, "Playback cancelled"),
            }
            if job.discards_wav() {
                let _ = tokio::fs::remove_file(&job.wav_path).await;
            }
        });
        Ok(())
    }

    fn cancel(&self) {
        if self.stop_playback() {
            debug!(target: "speech", "Cancel requested");
        }
    }
}
