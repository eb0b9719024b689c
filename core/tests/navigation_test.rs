mod common;

use blockspeak_core::{
    spawn_poller, Block, ConnectionRole, CursorSource, Describer, FieldKind, InMemoryWorkspace,
    InputKind, Location, NavigationWatcher, PalettePosition, WatcherConfig,
};
use common::{advance_ms, start, FakeOutput};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

struct ScriptedCursor {
    location: Mutex<Option<Location>>,
    focus: AtomicBool,
}

impl ScriptedCursor {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            location: Mutex::new(None),
            focus: AtomicBool::new(true),
        })
    }

    fn move_to(&self, location: Location) {
        *self.location.lock().unwrap() = Some(location);
    }

    fn clear(&self) {
        *self.location.lock().unwrap() = None;
    }

    fn set_focus(&self, focus: bool) {
        self.focus.store(focus, Ordering::SeqCst);
    }
}

impl CursorSource for ScriptedCursor {
    fn location(&self) -> Option<Location> {
        self.location.lock().unwrap().clone()
    }

    fn has_focus(&self) -> bool {
        self.focus.load(Ordering::SeqCst)
    }
}

fn workspace() -> Arc<Describer> {
    let ws = InMemoryWorkspace::new();
    ws.insert(Block::value("t1", "text").with_field("TEXT", FieldKind::Text, "hello"));
    ws.insert(
        Block::statement("a", "text_print")
            .with_input("TEXT", InputKind::Value, Some("t1"))
            .with_next("b"),
    );
    ws.insert(Block::statement("b", "text_print").with_input("TEXT", InputKind::Value, None));
    Arc::new(Describer::new(Arc::new(ws)))
}

fn block(id: &str) -> Location {
    Location::Block {
        id: id.into(),
        palette: None,
    }
}

fn empty_input_on_b() -> Location {
    Location::Connection {
        id: "b".into(),
        role: ConnectionRole::Input("TEXT".into()),
    }
}

#[test]
fn test_each_move_announced_once() {
    let cursor = ScriptedCursor::new();
    let mut watcher = NavigationWatcher::new(cursor.clone(), workspace());

    assert_eq!(watcher.poll(), None);

    cursor.move_to(block("a"));
    assert_eq!(watcher.poll().as_deref(), Some("print text hello"));
    assert_eq!(watcher.poll(), None);

    cursor.move_to(empty_input_on_b());
    assert_eq!(
        watcher.poll().as_deref(),
        Some("Value input on print value. Connect a value here.")
    );
    assert_eq!(watcher.poll(), None);
    assert_eq!(
        watcher.last_node().map(|n| n.as_str()),
        Some("connection:1:b:input:4:TEXT")
    );
}

#[test]
fn test_focus_regain_repeats_location() {
    let cursor = ScriptedCursor::new();
    let mut watcher = NavigationWatcher::new(cursor.clone(), workspace());

    cursor.move_to(Location::Stack { id: "a".into() });
    assert_eq!(
        watcher.poll().as_deref(),
        Some("Stack of 2 blocks, starting with print text hello")
    );

    cursor.set_focus(false);
    assert_eq!(watcher.poll(), None);
    assert_eq!(watcher.poll(), None);

    cursor.set_focus(true);
    assert_eq!(
        watcher.poll().as_deref(),
        Some("Stack of 2 blocks, starting with print text hello")
    );
    assert_eq!(watcher.poll(), None);
}

#[test]
fn test_focus_regain_waits_for_location() {
    let cursor = ScriptedCursor::new();
    let mut watcher = NavigationWatcher::new(cursor.clone(), workspace());

    cursor.move_to(block("t1"));
    assert_eq!(watcher.poll().as_deref(), Some("text hello"));

    cursor.set_focus(false);
    assert_eq!(watcher.poll(), None);

    cursor.clear();
    cursor.set_focus(true);
    assert_eq!(watcher.poll(), None);
    assert_eq!(watcher.poll(), None);

    cursor.move_to(block("t1"));
    assert_eq!(watcher.poll().as_deref(), Some("text hello"));
    assert_eq!(watcher.poll(), None);
}

#[test]
fn test_palette_block_position() {
    let cursor = ScriptedCursor::new();
    let mut watcher = NavigationWatcher::new(cursor.clone(), workspace());

    cursor.move_to(Location::Block {
        id: "t1".into(),
        palette: Some(PalettePosition { index: 3, total: 9 }),
    });
    assert_eq!(watcher.poll().as_deref(), Some("text hello, 3 of 9"));
}

#[tokio::test(start_paused = true)]
async fn test_polled_moves_reach_speech_output() {
    let out = FakeOutput::new();
    let announcer = start(&out);
    let cursor = ScriptedCursor::new();
    cursor.move_to(block("a"));

    let period = WatcherConfig::default().poll_interval;
    let handle = spawn_poller(
        NavigationWatcher::new(cursor.clone(), workspace()),
        announcer.clone(),
        period,
    );
    assert_eq!(handle.name(), "cursor");

    advance_ms(10).await;
    announcer.snapshot().await;
    assert_eq!(out.spoken(), vec!["print text hello"]);

    cursor.move_to(empty_input_on_b());
    advance_ms(400).await;
    announcer.snapshot().await;
    assert_eq!(
        out.spoken(),
        vec![
            "print text hello",
            "Value input on print value. Connect a value here."
        ]
    );

    // no duplicate while the cursor rests
    advance_ms(2000).await;
    announcer.snapshot().await;
    assert_eq!(out.spoken().len(), 2);

    assert!(handle.is_running());
    handle.dispose();
    handle.dispose();
    assert!(!handle.is_running());

    cursor.move_to(Location::Workspace);
    advance_ms(2000).await;
    announcer.snapshot().await;
    assert_eq!(out.spoken().len(), 2);
}
