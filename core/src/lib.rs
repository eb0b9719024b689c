// Blockspeak Core Library
// Screen-reader announcement engine for block-programming editors

pub mod announcer;
pub mod config;
pub mod describe;
pub mod dialogs;
pub mod listeners;
pub mod model;
pub mod navigation;
pub mod settings;
pub mod text;

// Export core types
pub use announcer::{
    Announcement, Announcer, OutputReporter, Priority, SchedulerSnapshot, SessionId,
    SpeechOutput, Utterance,
};
pub use config::{SchedulerConfig, WatcherConfig};
pub use describe::{ControlRole, Describer, Entity, FormControl, MenuItem};
pub use dialogs::{HelpDialog, SettingsDialog};
pub use listeners::{
    BulkDeleteGuard, EditorEvent, EventListener, ListenerSet, SurfaceKind, SurfaceSnapshot,
};
pub use model::{
    Block, BlockId, ConnectionRole, CursorSource, EditorModel, FieldKind, InMemoryWorkspace,
    InputKind, Location, PalettePosition, PaletteSource, PaletteState,
};
pub use navigation::{
    spawn_poller, NavigationWatcher, NodeId, PaletteWatcher, PollHandle, Poller,
};
pub use settings::SpeechSettings;
pub use text::normalize;

// Error types
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("Speech output unavailable")]
    OutputUnavailable,

    #[error("Synthesis error: {0}")]
    Synthesis(String),

    #[error("Playback error: {0}")]
    Playback(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SpeechError>;
