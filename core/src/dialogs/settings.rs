use crate::announcer::{Announcer, Priority};
use crate::describe::{ControlRole, Describer, Entity, FormControl};
use crate::settings::{SpeechSettings, PITCH_RANGE, RATE_RANGE, VOLUME_RANGE};
use std::sync::Arc;
use tracing::{debug, info};

const INTRO: &str = "Speech settings. Use Tab to move between controls, arrow keys to change a value, Enter to apply and Escape to close.";
const STEP: f32 = 0.1;

/// Controls in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsControl {
    Enabled,
    Rate,
    Pitch,
    Volume,
    Voice,
}

impl SettingsControl {
    const ORDER: [SettingsControl; 5] = [
        SettingsControl::Enabled,
        SettingsControl::Rate,
        SettingsControl::Pitch,
        SettingsControl::Volume,
        SettingsControl::Voice,
    ];
}

/// Speech settings dialog: edits a draft, pushes it to the announcer on apply.
pub struct SettingsDialog {
    announcer: Announcer,
    describer: Arc<Describer>,
    voices: Vec<String>,
    applied: SpeechSettings,
    draft: SpeechSettings,
    focus: usize,
    open: bool,
}

impl SettingsDialog {
    pub fn new(
        announcer: Announcer,
        describer: Arc<Describer>,
        settings: SpeechSettings,
        voices: Vec<String>,
    ) -> Self {
        let settings = settings.clamped();
        Self {
            announcer,
            describer,
            voices,
            applied: settings.clone(),
            draft: settings,
            focus: 0,
            open: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Last applied settings.
    pub fn settings(&self) -> &SpeechSettings {
        &self.applied
    }

    /// Values being edited.
    pub fn draft(&self) -> &SpeechSettings {
        &self.draft
    }

    pub fn focused(&self) -> SettingsControl {
        SettingsControl::ORDER[self.focus]
    }

    pub fn open(&mut self) {
        self.draft = self.applied.clone();
        self.focus = 0;
        self.open = true;
        info!(target: "announcer", "Settings dialog opened");
        let first = self.describe_focused();
        self.announcer.force_announce(format!("{} {}", INTRO, first));
    }

    pub fn focus_next(&mut self) {
        if !self.open {
            return;
        }
        self.focus = (self.focus + 1) % SettingsControl::ORDER.len();
        self.speak_focused();
    }

    pub fn focus_prev(&mut self) {
        if !self.open {
            return;
        }
        let n = SettingsControl::ORDER.len();
        self.focus = (self.focus + n - 1) % n;
        self.speak_focused();
    }

    pub fn increase(&mut self) {
        self.adjust(1);
    }

    pub fn decrease(&mut self) {
        self.adjust(-1);
    }

    /// Step the focused control up (`dir > 0`) or down; checkbox toggles.
    fn adjust(&mut self, dir: i32) {
        if !self.open {
            return;
        }
        let delta = STEP * dir.signum() as f32;
        match self.focused() {
            SettingsControl::Enabled => self.draft.enabled = !self.draft.enabled,
            SettingsControl::Rate => self.draft.rate = step(self.draft.rate, delta, RATE_RANGE),
            SettingsControl::Pitch => self.draft.pitch = step(self.draft.pitch, delta, PITCH_RANGE),
            SettingsControl::Volume => {
                self.draft.volume = step(self.draft.volume, delta, VOLUME_RANGE)
            }
            SettingsControl::Voice => {
                let n = self.voices.len().max(1);
                self.draft.voice_index = if dir >= 0 {
                    (self.draft.voice_index + 1) % n
                } else {
                    (self.draft.voice_index + n - 1) % n
                };
            }
        }
        debug!(target: "announcer", control = ?self.focused(), "Settings value adjusted");
        self.speak_focused();
    }

    /// Push the draft to the announcer and close.
    pub fn apply(&mut self) {
        if !self.open {
            return;
        }
        self.applied = self.draft.clone().clamped();
        self.open = false;
        info!(
            target: "announcer",
            enabled = self.applied.enabled,
            rate = self.applied.rate,
            pitch = self.applied.pitch,
            volume = self.applied.volume,
            voice = self.applied.voice_index,
            "Settings applied"
        );
        self.announcer.configure(self.applied.clone());
        self.announcer.force_announce("Settings applied");
    }

    /// Close without applying.
    pub fn dismiss(&mut self) {
        if !self.open {
            return;
        }
        self.draft = self.applied.clone();
        self.open = false;
        self.announcer.force_announce("Settings closed");
    }

    /// Form control view of the focused setting.
    pub fn focused_control(&self) -> FormControl {
        let slider = |label: &str, value: f32| FormControl {
            role: ControlRole::Slider,
            label: label.to_string(),
            value: Some(format!("{:.1}", value)),
            checked: None,
        };
        match self.focused() {
            SettingsControl::Enabled => FormControl {
                role: ControlRole::Checkbox,
                label: "Speech enabled".to_string(),
                value: None,
                checked: Some(self.draft.enabled),
            },
            SettingsControl::Rate => slider("Rate", self.draft.rate),
            SettingsControl::Pitch => slider("Pitch", self.draft.pitch),
            SettingsControl::Volume => slider("Volume", self.draft.volume),
            SettingsControl::Voice => FormControl {
                role: ControlRole::Select,
                label: "Voice".to_string(),
                value: Some(
                    self.voices
                        .get(self.draft.voice_index)
                        .cloned()
                        .unwrap_or_else(|| "default".to_string()),
                ),
                checked: None,
            },
        }
    }

    fn describe_focused(&self) -> String {
        self.describer
            .describe(&Entity::FormControl(self.focused_control()))
    }

    fn speak_focused(&self) {
        self.announcer
            .announce(self.describe_focused(), Priority::High);
    }
}

fn step(value: f32, delta: f32, (lo, hi): (f32, f32)) -> f32 {
    // round to one decimal so repeated steps do not drift
    (((value + delta) * 10.0).round() / 10.0).clamp(lo, hi)
}
