use super::poller::Poller;
use crate::announcer::Announcement;
use crate::model::{PaletteSource, PaletteState};
use std::sync::Arc;

/// Announces the block palette (flyout) opening, switching category and closing
pub struct PaletteWatcher {
    source: Arc<dyn PaletteSource>,
    last: Option<PaletteState>,
}

impl PaletteWatcher {
    pub fn new(source: Arc<dyn PaletteSource>) -> Self {
        Self { source, last: None }
    }

    fn opened(state: &PaletteState) -> Announcement {
        let noun = if state.item_count == 1 { "block" } else { "blocks" };
        Announcement::high(format!(
            "{} palette opened, {} {}",
            state.category, state.item_count, noun
        ))
    }
}

impl Poller for PaletteWatcher {
    fn name(&self) -> &'static str {
        "palette"
    }

    fn tick(&mut self) -> Option<Announcement> {
        let now = self.source.open_palette();
        let announcement = match (&self.last, &now) {
            (None, Some(state)) => Some(Self::opened(state)),
            (Some(prev), Some(state)) if prev.category != state.category => {
                Some(Self::opened(state))
            }
            (Some(_), None) => Some(Announcement::normal("Palette closed")),
            _ => None,
        };
        self.last = now;
        announcement
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct FakePalette(Mutex<Option<PaletteState>>);

    impl PaletteSource for FakePalette {
        fn open_palette(&self) -> Option<PaletteState> {
            self.0.lock().unwrap().clone()
        }
    }

    fn state(category: &str, n: usize) -> Option<PaletteState> {
        Some(PaletteState {
            category: category.into(),
            item_count: n,
        })
    }

    #[test]
    fn test_open_switch_close() {
        let src = Arc::new(FakePalette(Mutex::new(None)));
        let mut w = PaletteWatcher::new(src.clone());
        assert_eq!(w.tick(), None);

        *src.0.lock().unwrap() = state("Logic", 6);
        assert_eq!(w.tick(), Some(Announcement::high("Logic palette opened, 6 blocks")));
        assert_eq!(w.tick(), None);

        *src.0.lock().unwrap() = state("Loops", 1);
        assert_eq!(w.tick(), Some(Announcement::high("Loops palette opened, 1 block")));

        *src.0.lock().unwrap() = None;
        assert_eq!(w.tick(), Some(Announcement::normal("Palette closed")));
        assert_eq!(w.tick(), None);
    }
}
