use super::identity::NodeId;
use super::poller::Poller;
use crate::announcer::Announcement;
use crate::describe::Describer;
use crate::model::CursorSource;
use std::sync::Arc;
use tracing::debug;

/// Announces the logical cursor each time it lands somewhere new.
///
/// One high priority announcement per move. Returning to the editing surface
/// after focus left it re-announces the current location even if the cursor
/// did not move while away.
pub struct NavigationWatcher {
    cursor: Arc<dyn CursorSource>,
    describer: Arc<Describer>,
    last_node: Option<NodeId>,
    had_focus: bool,
    /// Focus came back and the location has not been re-announced yet
    regain_pending: bool,
}

impl NavigationWatcher {
    pub fn new(cursor: Arc<dyn CursorSource>, describer: Arc<Describer>) -> Self {
        Self {
            cursor,
            describer,
            last_node: None,
            had_focus: false,
            regain_pending: false,
        }
    }

    /// Identity of the most recently announced location.
    pub fn last_node(&self) -> Option<&NodeId> {
        self.last_node.as_ref()
    }

    /// One poll: the phrase to speak, if the cursor moved or focus came back.
    pub fn poll(&mut self) -> Option<String> {
        if !self.cursor.has_focus() {
            if self.had_focus {
                debug!(target: "navigation", "Focus left the editing surface");
            }
            self.had_focus = false;
            return None;
        }
        if !self.had_focus && self.last_node.is_some() {
            self.regain_pending = true;
        }
        self.had_focus = true;

        let location = self.cursor.location()?;
        let node = NodeId::of(&location);
        let regained = self.regain_pending;
        if self.last_node.as_ref() == Some(&node) && !regained {
            return None;
        }
        debug!(target: "navigation", node = %node, regained, "Cursor location changed");
        self.regain_pending = false;
        self.last_node = Some(node);
        Some(self.describer.describe_location(&location))
    }
}

impl Poller for NavigationWatcher {
    fn name(&self) -> &'static str {
        "cursor"
    }

    fn tick(&mut self) -> Option<Announcement> {
        self.poll().map(Announcement::high)
    }
}
