use crate::announcer::Announcer;
use tracing::info;

/// Key chord and what it does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortcut {
    pub keys: &'static str,
    pub action: &'static str,
}

pub const DEFAULT_SHORTCUTS: &[Shortcut] = &[
    Shortcut { keys: "Arrow keys", action: "move between blocks and connections" },
    Shortcut { keys: "Enter", action: "edit the field or open the menu under the cursor" },
    Shortcut { keys: "T", action: "open the block palette" },
    Shortcut { keys: "W", action: "return to the workspace" },
    Shortcut { keys: "Control plus Shift plus S", action: "open speech settings" },
    Shortcut { keys: "Control plus Shift plus H", action: "open this help" },
    Shortcut { keys: "Escape", action: "close the current menu or dialog" },
];

/// Spoken keyboard reference
pub struct HelpDialog {
    announcer: Announcer,
    shortcuts: Vec<Shortcut>,
    open: bool,
}

impl HelpDialog {
    pub fn new(announcer: Announcer) -> Self {
        Self::with_shortcuts(announcer, DEFAULT_SHORTCUTS.to_vec())
    }

    pub fn with_shortcuts(announcer: Announcer, shortcuts: Vec<Shortcut>) -> Self {
        Self {
            announcer,
            shortcuts,
            open: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Everything read out on open.
    pub fn text(&self) -> String {
        let mut text = String::from("Keyboard shortcuts.");
        for s in &self.shortcuts {
            text.push_str(&format!(" {}: {}.", s.keys, s.action));
        }
        text.push_str(" Press Escape to close help.");
        text
    }

    pub fn open(&mut self) {
        self.open = true;
        info!(target: "announcer", shortcuts = self.shortcuts.len(), "Help dialog opened");
        self.announcer.force_announce(self.text());
    }

    pub fn close(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        self.announcer.force_announce("Help closed");
    }
}
