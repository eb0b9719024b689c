//! Entity describer
//!
//! Maps blocks, connections, fields, menu items and form controls to the
//! phrase a screen-reader user hears. Every entry point returns non-empty text;
//! missing children and unknown types degrade to placeholder nouns.

mod blocks;
pub mod colour;
pub mod emoji;
mod location;

pub use blocks::{fallback_phrase, BlockContext, BlockDescriber, BlockTemplates};
pub use colour::ColourHeuristic;
pub use location::WORKSPACE_PHRASE;

use crate::model::{Block, BlockId, ConnectionRole, EditorModel, Field, FieldKind, InputKind};
use crate::text::normalize;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Nested blocks deeper than this are spoken as their placeholder noun
const MAX_DEPTH: usize = 6;

/// Anything the describer can put into words
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Block(BlockId),
    Connection { block: BlockId, role: ConnectionRole },
    Field { block: BlockId, field: String },
    MenuItem(MenuItem),
    FormControl(FormControl),
}

/// Entry of a context menu or dropdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub label: String,
    /// 1-based position and total, when the host knows them
    #[serde(default)]
    pub position: Option<(usize, usize)>,
    #[serde(default)]
    pub checked: Option<bool>,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
}

fn enabled_default() -> bool {
    true
}

impl MenuItem {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            position: None,
            checked: None,
            enabled: true,
        }
    }

    pub fn at(mut self, index: usize, total: usize) -> Self {
        self.position = Some((index, total));
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlRole {
    Button,
    Checkbox,
    Slider,
    TextInput,
    Select,
}

/// A generic form control outside the block canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormControl {
    pub role: ControlRole,
    pub label: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub checked: Option<bool>,
}

pub struct Describer {
    model: Arc<dyn EditorModel>,
    templates: BlockTemplates,
    heuristic: ColourHeuristic,
}

impl Describer {
    pub fn new(model: Arc<dyn EditorModel>) -> Self {
        Self::with_templates(model, BlockTemplates::standard())
    }

    pub fn with_templates(model: Arc<dyn EditorModel>, templates: BlockTemplates) -> Self {
        Self {
            model,
            templates,
            heuristic: ColourHeuristic::default(),
        }
    }

    pub fn with_colour_heuristic(mut self, heuristic: ColourHeuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn model(&self) -> &Arc<dyn EditorModel> {
        &self.model
    }

    pub fn templates_mut(&mut self) -> &mut BlockTemplates {
        &mut self.templates
    }

    /// Describe any entity.
    pub fn describe(&self, entity: &Entity) -> String {
        let text = match entity {
            Entity::Block(id) => self.describe_block(id),
            Entity::Connection { block, role } => match self.model.block(block) {
                Some(b) => self.describe_connection(&b, role),
                None => "connection".to_string(),
            },
            Entity::Field { block, field } => {
                let found = self
                    .model
                    .block(block)
                    .and_then(|b| b.field(field).cloned().map(|f| (b, f)));
                match found {
                    Some((b, f)) => self.describe_field(&b, &f),
                    None => "field".to_string(),
                }
            }
            Entity::MenuItem(item) => self.describe_menu_item(item),
            Entity::FormControl(control) => self.describe_control(control),
        };
        if text.trim().is_empty() {
            "item".to_string()
        } else {
            text
        }
    }

    pub fn describe_block(&self, id: &str) -> String {
        match self.model.block(id) {
            Some(block) => self.block_phrase(&block),
            None => {
                debug!(target: "describe", block = %id, "Block not found in model");
                "unknown block".to_string()
            }
        }
    }

    /// Phrase for a block, recursing into connected children.
    pub fn block_phrase(&self, block: &Block) -> String {
        self.phrase_at(block, 0)
    }

    fn phrase_at(&self, block: &Block, depth: usize) -> String {
        let phrase = match self.templates.get(&block.block_type) {
            Some(template) => template(&BlockContext {
                describer: self,
                block,
                depth,
            }),
            None => fallback_phrase(&block.block_type),
        };
        let phrase = phrase.split_whitespace().collect::<Vec<_>>().join(" ");
        if phrase.is_empty() {
            fallback_phrase(&block.block_type)
        } else {
            phrase
        }
    }

    pub(crate) fn child_phrase(&self, id: Option<&str>, depth: usize, placeholder: &str) -> String {
        if depth > MAX_DEPTH {
            return placeholder.to_string();
        }
        match id.and_then(|id| self.model.block(id)) {
            Some(child) => self.phrase_at(&child, depth),
            None => placeholder.to_string(),
        }
    }

    /// Spoken value of a field: variable names, colours and emoji resolved.
    pub fn field_value(&self, field: &Field) -> String {
        let spoken = match field.kind {
            FieldKind::Variable => self
                .model
                .variable_name(&field.value)
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| "variable".to_string()),
            FieldKind::Colour => colour::colour_name_with(&field.value, self.heuristic),
            FieldKind::Checkbox => {
                if field.value.eq_ignore_ascii_case("true") {
                    "checked".to_string()
                } else {
                    "unchecked".to_string()
                }
            }
            FieldKind::Dropdown => humanize_option(&field.value),
            _ => {
                if let Some(name) = emoji::emoji_name(&field.value) {
                    name.to_string()
                } else if colour::is_hex_colour(&field.value) {
                    colour::colour_name_with(&field.value, self.heuristic)
                } else {
                    normalize(&emoji::replace_emoji(&field.value))
                }
            }
        };
        if spoken.trim().is_empty() {
            "blank".to_string()
        } else {
            spoken
        }
    }

    /// Field under the cursor: value plus how to interact with it.
    pub fn describe_field(&self, _block: &Block, field: &Field) -> String {
        let value = self.field_value(field);
        match field.kind {
            FieldKind::Dropdown => format!("{}, dropdown. Press Enter to choose an option.", value),
            FieldKind::Variable => {
                format!("{}, variable dropdown. Press Enter to choose a variable.", value)
            }
            FieldKind::Colour => format!("{}, colour picker. Press Enter to choose a colour.", value),
            FieldKind::Checkbox => format!("{} checkbox. Press Enter to toggle.", value),
            FieldKind::Text => format!("{}, editable text field", value),
            FieldKind::Number => format!("{}, editable number field", value),
            FieldKind::Label | FieldKind::Image => value,
        }
    }

    /// Connection point, with a call to action when nothing is attached.
    pub fn describe_connection(&self, block: &Block, role: &ConnectionRole) -> String {
        let owner = self.block_phrase(block);
        match role {
            ConnectionRole::Previous => match &block.parent {
                Some(parent) => format!(
                    "Top of {}, attached to {}.",
                    owner,
                    self.describe_block(parent)
                ),
                None => format!("Top of {}. Attach a block above here.", owner),
            },
            ConnectionRole::Next => match &block.next {
                Some(next) => format!(
                    "Bottom of {}, followed by {}.",
                    owner,
                    self.describe_block(next)
                ),
                None => format!("Bottom of {}. Attach a block below here.", owner),
            },
            ConnectionRole::Output => match &block.parent {
                Some(parent) => format!(
                    "Output of {}, plugged into {}.",
                    owner,
                    self.describe_block(parent)
                ),
                None => format!("Output of {}. Plug it into an input.", owner),
            },
            ConnectionRole::Input(name) => {
                let Some(input) = block.input(name) else {
                    return format!("{} input on {}.", humanize_option(name), owner);
                };
                let label = match input.kind {
                    InputKind::Value => "Value input",
                    InputKind::Statement => "Statement input",
                    InputKind::Dummy => "Input",
                };
                match (&input.connected, input.kind) {
                    (Some(child), _) => format!(
                        "{} on {}, connected to {}.",
                        label,
                        owner,
                        self.describe_block(child)
                    ),
                    (None, InputKind::Value) => {
                        format!("{} on {}. Connect a value here.", label, owner)
                    }
                    (None, InputKind::Statement) => {
                        format!("{} on {}. Connect a statement here.", label, owner)
                    }
                    (None, InputKind::Dummy) => format!("{} on {}.", label, owner),
                }
            }
        }
    }

    pub fn describe_menu_item(&self, item: &MenuItem) -> String {
        let mut text = normalize(&emoji::replace_emoji(&item.label));
        if text.is_empty() {
            text.push_str("unlabeled item");
        }
        match item.checked {
            Some(true) => text.push_str(", checked"),
            Some(false) => text.push_str(", not checked"),
            None => {}
        }
        if !item.enabled {
            text.push_str(", unavailable");
        }
        if let Some((index, total)) = item.position {
            text.push_str(&format!(", {} of {}", index, total));
        }
        text
    }

    pub fn describe_control(&self, control: &FormControl) -> String {
        let label = match normalize(&control.label) {
            l if l.is_empty() => "unlabeled".to_string(),
            l => l,
        };
        let value = control
            .value
            .as_deref()
            .map(normalize)
            .filter(|v| !v.is_empty());
        match control.role {
            ControlRole::Button => format!("{}, button", label),
            ControlRole::Checkbox => {
                let state = if control.checked.unwrap_or(false) {
                    "checked"
                } else {
                    "not checked"
                };
                format!("{}, checkbox, {}", label, state)
            }
            ControlRole::Slider => match value {
                Some(v) => format!("{}, slider, {}", label, v),
                None => format!("{}, slider", label),
            },
            ControlRole::TextInput => {
                format!("{}, edit text, {}", label, value.unwrap_or_else(|| "blank".into()))
            }
            ControlRole::Select => match value {
                Some(v) => format!("{}, combo box, {}", label, v),
                None => format!("{}, combo box", label),
            },
        }
    }
}

/// `GOLDEN_RATIO` → "golden ratio"; mixed-case option text is only normalized.
pub(crate) fn humanize_option(value: &str) -> String {
    let trimmed = value.trim();
    let shouty = trimmed.chars().any(|c| c.is_ascii_uppercase())
        && !trimmed.chars().any(|c| c.is_ascii_lowercase());
    if shouty {
        trimmed
            .split('_')
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        normalize(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldKind, InputKind, MockEditorModel};

    fn block(id: &str) -> Block {
        Block::statement(id, "text_print").with_input("TEXT", InputKind::Value, Some("t1"))
    }

    #[test]
    fn test_child_lookup_through_model() {
        let mut model = MockEditorModel::new();
        model
            .expect_block()
            .withf(|id| id == "t1")
            .times(1)
            .returning(|_| {
                Some(Block::value("t1", "text").with_field("TEXT", FieldKind::Text, "hi"))
            });

        let describer = Describer::new(Arc::new(model));
        assert_eq!(describer.block_phrase(&block("p1")), "print text hi");
    }

    #[test]
    fn test_missing_child_uses_placeholder() {
        let mut model = MockEditorModel::new();
        model.expect_block().returning(|_| None);

        let describer = Describer::new(Arc::new(model));
        assert_eq!(describer.block_phrase(&block("p1")), "print value");
    }

    #[test]
    fn test_unresolved_variable() {
        let mut model = MockEditorModel::new();
        model.expect_variable_name().returning(|_| None);

        let describer = Describer::new(Arc::new(model));
        let var = Block::value("v", "variables_get").with_field("VAR", FieldKind::Variable, "x9");
        assert_eq!(describer.block_phrase(&var), "variable");
    }

    #[test]
    fn test_humanize_option() {
        assert_eq!(humanize_option("GOLDEN_RATIO"), "golden ratio");
        assert_eq!(humanize_option("≤"), "less than or equal");
        assert_eq!(humanize_option("Blue"), "Blue");
    }

    #[test]
    fn test_controls_and_menu_items() {
        let model = MockEditorModel::new();
        let describer = Describer::new(Arc::new(model));

        let item = MenuItem {
            checked: Some(true),
            enabled: false,
            ..MenuItem::new("Duplicate").at(2, 5)
        };
        assert_eq!(
            describer.describe(&Entity::MenuItem(item)),
            "Duplicate, checked, unavailable, 2 of 5"
        );

        let slider = FormControl {
            role: ControlRole::Slider,
            label: "Speech rate".into(),
            value: Some("1.5".into()),
            checked: None,
        };
        assert_eq!(
            describer.describe(&Entity::FormControl(slider)),
            "Speech rate, slider, 1.5"
        );
    }
}
