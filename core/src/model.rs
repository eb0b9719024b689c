//! Host editor model as seen by the announcer.
//!
//! The host owns the real block tree; Blockspeak only reads snapshots of it
//! through [`EditorModel`] and the cursor through [`CursorSource`].

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

pub type BlockId = String;

/// Kind of a block field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    Label,
    Text,
    Number,
    Dropdown,
    Variable,
    Colour,
    Checkbox,
    Image,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
    /// Raw value; variable fields hold the variable id
    pub value: String,
}

impl Field {
    pub fn is_editable(&self) -> bool {
        !matches!(self.kind, FieldKind::Label | FieldKind::Image)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputKind {
    Value,
    Statement,
    Dummy,
}

/// A named input slot on a block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Input {
    pub name: String,
    pub kind: InputKind,
    /// Block plugged into this slot (first block of the stack for statements)
    pub connected: Option<BlockId>,
}

/// Snapshot of one block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub block_type: String,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub inputs: Vec<Input>,
    /// Block attached below
    #[serde(default)]
    pub next: Option<BlockId>,
    /// Block this one is attached to, through an input or its previous connection
    #[serde(default)]
    pub parent: Option<BlockId>,
    #[serde(default)]
    pub has_previous: bool,
    #[serde(default)]
    pub has_next: bool,
    #[serde(default)]
    pub has_output: bool,
}

impl Block {
    /// A value block (output connection only).
    pub fn value(id: impl Into<BlockId>, block_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            block_type: block_type.into(),
            fields: Vec::new(),
            inputs: Vec::new(),
            next: None,
            parent: None,
            has_previous: false,
            has_next: false,
            has_output: true,
        }
    }

    /// A statement block (previous and next connections).
    pub fn statement(id: impl Into<BlockId>, block_type: impl Into<String>) -> Self {
        Self {
            has_previous: true,
            has_next: true,
            has_output: false,
            ..Self::value(id, block_type)
        }
    }

    pub fn with_field(mut self, name: &str, kind: FieldKind, value: &str) -> Self {
        self.fields.push(Field {
            name: name.to_string(),
            kind,
            value: value.to_string(),
        });
        self
    }

    pub fn with_input(mut self, name: &str, kind: InputKind, connected: Option<&str>) -> Self {
        self.inputs.push(Input {
            name: name.to_string(),
            kind,
            connected: connected.map(str::to_string),
        });
        self
    }

    pub fn with_next(mut self, next: &str) -> Self {
        self.next = Some(next.to_string());
        self
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn input(&self, name: &str) -> Option<&Input> {
        self.inputs.iter().find(|i| i.name == name)
    }

    pub fn editable_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.is_editable())
    }
}

/// Role of a connection point relative to its block
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionRole {
    /// Top of a statement block
    Previous,
    /// Bottom of a statement block
    Next,
    /// Left edge of a value block
    Output,
    /// A named input slot
    Input(String),
}

/// Ordinal of a block inside a scrollable palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PalettePosition {
    /// 1-based
    pub index: usize,
    pub total: usize,
}

/// A place the logical cursor can rest on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Location {
    Workspace,
    Block {
        id: BlockId,
        palette: Option<PalettePosition>,
    },
    Stack {
        id: BlockId,
    },
    Connection {
        id: BlockId,
        role: ConnectionRole,
    },
    Field {
        id: BlockId,
        field: String,
    },
    Input {
        id: BlockId,
        input: String,
    },
    /// Anything the host reports that Blockspeak has no phrase for
    Other {
        kind: String,
    },
}

/// Read access to the host's block tree
#[cfg_attr(test, mockall::automock)]
pub trait EditorModel: Send + Sync {
    fn block(&self, id: &str) -> Option<Block>;
    fn variable_name(&self, id: &str) -> Option<String>;
}

/// Logical cursor and editor focus
pub trait CursorSource: Send + Sync {
    fn location(&self) -> Option<Location>;
    /// Whether keyboard focus is on the editing surface
    fn has_focus(&self) -> bool;
}

/// Open palette category, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteState {
    pub category: String,
    pub item_count: usize,
}

pub trait PaletteSource: Send + Sync {
    fn open_palette(&self) -> Option<PaletteState>;
}

/// Thread-safe in-memory block tree.
///
/// Parent links are derived on lookup, so blocks can be inserted in any order.
#[derive(Debug, Default)]
pub struct InMemoryWorkspace {
    blocks: DashMap<BlockId, Block>,
    variables: DashMap<String, String>,
}

impl InMemoryWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, block: Block) {
        self.blocks.insert(block.id.clone(), block);
    }

    pub fn remove(&self, id: &str) -> Option<Block> {
        self.blocks.remove(id).map(|(_, b)| b)
    }

    pub fn set_variable(&self, id: &str, name: &str) {
        self.variables.insert(id.to_string(), name.to_string());
    }

    pub fn set_field(&self, id: &str, field: &str, value: &str) -> bool {
        let Some(mut block) = self.blocks.get_mut(id) else {
            return false;
        };
        match block.fields.iter_mut().find(|f| f.name == field) {
            Some(f) => {
                f.value = value.to_string();
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    fn parent_of(&self, id: &str) -> Option<BlockId> {
        self.blocks.iter().find_map(|entry| {
            let b = entry.value();
            let holds = b.next.as_deref() == Some(id)
                || b.inputs.iter().any(|i| i.connected.as_deref() == Some(id));
            holds.then(|| b.id.clone())
        })
    }
}

impl EditorModel for InMemoryWorkspace {
    fn block(&self, id: &str) -> Option<Block> {
        let mut block = self.blocks.get(id).map(|b| b.value().clone())?;
        if block.parent.is_none() {
            block.parent = self.parent_of(id);
        }
        Some(block)
    }

    fn variable_name(&self, id: &str) -> Option<String> {
        self.variables.get(id).map(|v| v.value().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_derived() {
        let ws = InMemoryWorkspace::new();
        ws.insert(Block::value("n1", "math_number").with_field("NUM", FieldKind::Number, "3"));
        ws.insert(
            Block::statement("p1", "text_print").with_input("TEXT", InputKind::Value, Some("n1")),
        );

        assert_eq!(ws.block("n1").unwrap().parent.as_deref(), Some("p1"));
        assert_eq!(ws.block("p1").unwrap().parent, None);
        assert!(ws.block("missing").is_none());
    }

    #[test]
    fn test_set_field_and_variables() {
        let ws = InMemoryWorkspace::new();
        ws.insert(Block::value("v", "variables_get").with_field("VAR", FieldKind::Variable, "id1"));
        ws.set_variable("id1", "score");

        assert!(ws.set_field("v", "VAR", "id2"));
        assert!(!ws.set_field("v", "NOPE", "x"));
        assert_eq!(ws.block("v").unwrap().field("VAR").unwrap().value, "id2");
        assert_eq!(ws.variable_name("id1").as_deref(), Some("score"));
        assert_eq!(ws.variable_name("id2"), None);
    }

    #[test]
    fn test_editable_fields() {
        let b = Block::statement("s", "controls_repeat_ext")
            .with_field("LABEL", FieldKind::Label, "repeat")
            .with_field("TIMES", FieldKind::Number, "10");
        let names: Vec<_> = b.editable_fields().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["TIMES"]);
    }
}
