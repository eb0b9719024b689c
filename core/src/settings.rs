//! Speech output settings shared between the dialogs and the announcer.

use serde::{Deserialize, Serialize};

pub const RATE_RANGE: (f32, f32) = (0.1, 10.0);
pub const PITCH_RANGE: (f32, f32) = (0.0, 2.0);
pub const VOLUME_RANGE: (f32, f32) = (0.0, 1.0);

/// Voice parameters applied at the start of each utterance
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechSettings {
    pub enabled: bool,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
    pub voice_index: usize,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            rate: 1.0,
            pitch: 1.0,
            volume: 1.0,
            voice_index: 0,
        }
    }
}

impl SpeechSettings {
    /// Pull every value back into its supported range.
    pub fn clamped(mut self) -> Self {
        self.rate = clamp_or(self.rate, RATE_RANGE, 1.0);
        self.pitch = clamp_or(self.pitch, PITCH_RANGE, 1.0);
        self.volume = clamp_or(self.volume, VOLUME_RANGE, 1.0);
        self
    }
}

fn clamp_or(value: f32, (lo, hi): (f32, f32), fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(lo, hi)
    } else {
        fallback
    }
}
