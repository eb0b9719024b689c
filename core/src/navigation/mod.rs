//! Cursor and palette watchers
//!
//! Both watchers are [`Poller`]s: a tick reads host state, compares it with
//! what was last announced and yields at most one [`Announcement`]. The
//! [`spawn_poller`] driver runs a poller on a fixed interval until disposed.
//!
//! [`Announcement`]: crate::announcer::Announcement

mod identity;
mod palette;
mod poller;
mod watcher;

pub use identity::NodeId;
pub use palette::PaletteWatcher;
pub use poller::{spawn_poller, PollHandle, Poller};
pub use watcher::NavigationWatcher;
