// Speech output for Blockspeak using local command-line TTS engines

pub mod tts;
mod wav;

pub use tts::{CliSpeechConfig, CliSpeechOutput, Engine};
