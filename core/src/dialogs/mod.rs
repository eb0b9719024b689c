//! Keyboard-driven dialogs that talk over whatever is playing.
//!
//! Both controllers speak through [`Announcer::force_announce`](crate::Announcer::force_announce):
//! opening a dialog is a context switch the user must hear immediately.

mod help;
mod settings;

pub use help::{HelpDialog, Shortcut, DEFAULT_SHORTCUTS};
pub use settings::{SettingsControl, SettingsDialog};
