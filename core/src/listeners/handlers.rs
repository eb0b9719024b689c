// Built-in listeners
use super::{EditorEvent, EventListener, SurfaceKind, SurfaceSnapshot};
use crate::announcer::Announcement;
use crate::describe::{humanize_option, Describer, Entity, MenuItem};
use crate::text::normalize;

/// Selected block on the canvas
pub struct SelectionListener;

impl EventListener for SelectionListener {
    fn name(&self) -> &'static str {
        "selection"
    }

    fn on_event(&mut self, event: &EditorEvent, describer: &Describer) -> Option<Announcement> {
        let EditorEvent::SelectionChanged { block: Some(id) } = event else {
            return None;
        };
        Some(Announcement::normal(format!(
            "{} selected",
            describer.describe_block(id)
        )))
    }
}

/// Blocks created, deleted or edited
pub struct BlockLifecycleListener;

impl EventListener for BlockLifecycleListener {
    fn name(&self) -> &'static str {
        "block_lifecycle"
    }

    fn on_event(&mut self, event: &EditorEvent, describer: &Describer) -> Option<Announcement> {
        match event {
            EditorEvent::BlockCreated { ids } => match ids.as_slice() {
                [] => None,
                [id] => Some(Announcement::normal(format!(
                    "{} added",
                    describer.describe_block(id)
                ))),
                many => Some(Announcement::normal(format!("{} blocks added", many.len()))),
            },
            EditorEvent::BlockDeleted { ids } => match ids.len() {
                0 | 1 => Some(Announcement::normal("Block deleted")),
                n => Some(Announcement::normal(format!("{} blocks deleted", n))),
            },
            EditorEvent::BlockChanged {
                block,
                field,
                new_value,
            } => {
                let value = describer
                    .model()
                    .block(block)
                    .and_then(|b| b.field(field).map(|f| describer.field_value(f)))
                    .unwrap_or_else(|| humanize_option(new_value));
                Some(Announcement::normal(format!(
                    "{} set to {}",
                    humanize_option(field),
                    value
                )))
            }
            _ => None,
        }
    }
}

/// Block picked inside the palette
pub struct PaletteListener;

impl EventListener for PaletteListener {
    fn name(&self) -> &'static str {
        "palette"
    }

    fn on_event(&mut self, event: &EditorEvent, describer: &Describer) -> Option<Announcement> {
        let EditorEvent::PaletteItemSelected {
            block,
            index,
            total,
        } = event
        else {
            return None;
        };
        Some(Announcement::high(format!(
            "{}, {} of {}",
            describer.describe_block(block),
            index,
            total
        )))
    }
}

/// Menus, pickers and dialogs appearing and disappearing
#[derive(Default)]
pub struct SurfaceListener {
    open: Vec<SurfaceKind>,
}

impl SurfaceListener {
    fn opened(snapshot: &SurfaceSnapshot, describer: &Describer) -> String {
        let name = match &snapshot.title {
            Some(t) if !t.trim().is_empty() => normalize(t),
            _ => surface_name(snapshot.kind).to_string(),
        };
        let mut text = match snapshot.items.len() {
            0 => format!("{} opened", name),
            1 => format!("{} opened, 1 item", name),
            n => format!("{} opened, {} items", name, n),
        };
        let highlighted = snapshot
            .highlighted
            .and_then(|i| snapshot.items.get(i).map(|item| (i, item)));
        if let Some((i, item)) = highlighted {
            let item = MenuItem {
                position: item.position.or(Some((i + 1, snapshot.items.len()))),
                ..item.clone()
            };
            text.push_str(". ");
            text.push_str(&describer.describe(&Entity::MenuItem(item)));
        }
        text
    }
}

impl EventListener for SurfaceListener {
    fn name(&self) -> &'static str {
        "surface"
    }

    fn on_event(&mut self, event: &EditorEvent, describer: &Describer) -> Option<Announcement> {
        match event {
            EditorEvent::SurfaceAppeared(snapshot) => {
                self.open.push(snapshot.kind);
                Some(Announcement::high(Self::opened(snapshot, describer)))
            }
            EditorEvent::SurfaceDisappeared { kind } => {
                // a close without a matching open is host noise
                let pos = self.open.iter().rposition(|k| k == kind)?;
                self.open.remove(pos);
                Some(Announcement::normal(format!("{} closed", surface_name(*kind))))
            }
            _ => None,
        }
    }
}

fn surface_name(kind: SurfaceKind) -> &'static str {
    match kind {
        SurfaceKind::ContextMenu => "Context menu",
        SurfaceKind::DropdownMenu => "Dropdown menu",
        SurfaceKind::ColourPicker => "Colour picker",
        SurfaceKind::Dialog => "Dialog",
    }
}

/// Option focus inside an open dropdown
pub struct DropdownListener;

impl EventListener for DropdownListener {
    fn name(&self) -> &'static str {
        "dropdown"
    }

    fn on_event(&mut self, event: &EditorEvent, describer: &Describer) -> Option<Announcement> {
        let EditorEvent::DropdownOptionFocused {
            label,
            index,
            total,
        } = event
        else {
            return None;
        };
        let item = MenuItem::new(label.clone()).at(*index, *total);
        Some(Announcement::high(
            describer.describe(&Entity::MenuItem(item)),
        ))
    }
}

/// Focus moving onto a form control outside the canvas
pub struct FormControlListener;

impl EventListener for FormControlListener {
    fn name(&self) -> &'static str {
        "form_control"
    }

    fn on_event(&mut self, event: &EditorEvent, describer: &Describer) -> Option<Announcement> {
        let EditorEvent::FormControlFocused(control) = event else {
            return None;
        };
        Some(Announcement::high(
            describer.describe(&Entity::FormControl(control.clone())),
        ))
    }
}

/// Echo of text typed into a field editor
pub struct FieldEditListener;

impl EventListener for FieldEditListener {
    fn name(&self) -> &'static str {
        "field_edit"
    }

    fn on_event(&mut self, event: &EditorEvent, _describer: &Describer) -> Option<Announcement> {
        let EditorEvent::FieldTextEdited { text, .. } = event else {
            return None;
        };
        let spoken = normalize(text);
        Some(Announcement::normal(if spoken.is_empty() {
            "blank".to_string()
        } else {
            spoken
        }))
    }
}
