// Sample program and the scripted editing session played against it
use blockspeak_core::{
    Block, BlockId, ConnectionRole, CursorSource, EditorEvent, FieldKind, InMemoryWorkspace,
    InputKind, Location, MenuItem, PalettePosition, PaletteSource, PaletteState, SurfaceKind,
    SurfaceSnapshot,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Cursor and palette state driven by the script
pub struct ScriptedHost {
    location: Mutex<Option<Location>>,
    focus: AtomicBool,
    palette: Mutex<Option<PaletteState>>,
}

impl ScriptedHost {
    pub fn new() -> Self {
        Self {
            location: Mutex::new(None),
            focus: AtomicBool::new(true),
            palette: Mutex::new(None),
        }
    }

    pub fn move_to(&self, location: Location) {
        *self
            .location
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(location);
    }

    pub fn set_focus(&self, focus: bool) {
        self.focus.store(focus, Ordering::SeqCst);
    }

    pub fn set_palette(&self, palette: Option<PaletteState>) {
        *self
            .palette
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = palette;
    }
}

impl Default for ScriptedHost {
    fn default() -> Self {
        Self::new()
    }
}

impl CursorSource for ScriptedHost {
    fn location(&self) -> Option<Location> {
        self.location
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    fn has_focus(&self) -> bool {
        self.focus.load(Ordering::SeqCst)
    }
}

impl PaletteSource for ScriptedHost {
    fn open_palette(&self) -> Option<PaletteState> {
        self.palette
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

/// One user action or host event
pub enum Step {
    Move(Location),
    Focus(bool),
    Palette(Option<PaletteState>),
    Event(EditorEvent),
    DeleteAll(Vec<BlockId>),
    Help,
    Settings,
}

/// `count = 0; repeat 3 times { print "hello" }` plus a stray comparison.
pub fn sample_workspace() -> InMemoryWorkspace {
    let ws = InMemoryWorkspace::new();
    ws.set_variable("v_count", "count");
    ws.insert(Block::value("zero", "math_number").with_field("NUM", FieldKind::Number, "0"));
    ws.insert(Block::value("three", "math_number").with_field("NUM", FieldKind::Number, "3"));
    ws.insert(Block::value("hello", "text").with_field("TEXT", FieldKind::Text, "hello"));
    ws.insert(
        Block::statement("set", "variables_set")
            .with_field("VAR", FieldKind::Variable, "v_count")
            .with_input("VALUE", InputKind::Value, Some("zero"))
            .with_next("repeat"),
    );
    ws.insert(
        Block::statement("repeat", "controls_repeat_ext")
            .with_input("TIMES", InputKind::Value, Some("three"))
            .with_input("DO", InputKind::Statement, Some("print")),
    );
    ws.insert(Block::statement("print", "text_print").with_input("TEXT", InputKind::Value, Some("hello")));
    ws.insert(
        Block::value("compare", "logic_compare")
            .with_field("OP", FieldKind::Dropdown, "GTE")
            .with_input("A", InputKind::Value, None)
            .with_input("B", InputKind::Value, None),
    );
    ws.insert(Block::statement("empty_print", "text_print").with_input("TEXT", InputKind::Value, None));
    ws
}

pub fn script() -> Vec<Step> {
    let block = |id: &str| Location::Block {
        id: id.into(),
        palette: None,
    };
    vec![
        Step::Move(Location::Workspace),
        Step::Move(Location::Stack { id: "set".into() }),
        Step::Move(block("set")),
        Step::Move(Location::Field {
            id: "set".into(),
            field: "VAR".into(),
        }),
        Step::Move(block("repeat")),
        Step::Move(Location::Connection {
            id: "repeat".into(),
            role: ConnectionRole::Input("DO".into()),
        }),
        Step::Move(Location::Connection {
            id: "empty_print".into(),
            role: ConnectionRole::Input("TEXT".into()),
        }),
        Step::Focus(false),
        Step::Focus(true),
        Step::Palette(Some(PaletteState {
            category: "Math".into(),
            item_count: 12,
        })),
        Step::Move(Location::Block {
            id: "three".into(),
            palette: Some(PalettePosition { index: 1, total: 12 }),
        }),
        Step::Palette(None),
        Step::Event(EditorEvent::BlockChanged {
            block: "compare".into(),
            field: "OP".into(),
            new_value: "GTE".into(),
        }),
        Step::Event(EditorEvent::SurfaceAppeared(SurfaceSnapshot {
            kind: SurfaceKind::ContextMenu,
            title: None,
            items: vec![
                MenuItem::new("Duplicate"),
                MenuItem::new("Add Comment"),
                MenuItem::new("Delete 2 Blocks"),
            ],
            highlighted: Some(0),
        })),
        Step::Event(EditorEvent::DropdownOptionFocused {
            label: "Delete 2 Blocks".into(),
            index: 3,
            total: 3,
        }),
        Step::Event(EditorEvent::SurfaceDisappeared {
            kind: SurfaceKind::ContextMenu,
        }),
        Step::Event(EditorEvent::FieldTextEdited {
            block: "hello".into(),
            field: "TEXT".into(),
            text: "x² ≥ 10".into(),
        }),
        Step::Help,
        Step::Settings,
        Step::DeleteAll(vec![
            "set".into(),
            "zero".into(),
            "repeat".into(),
            "three".into(),
            "print".into(),
            "hello".into(),
        ]),
    ]
}
