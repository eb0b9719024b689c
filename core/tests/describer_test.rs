use blockspeak_core::describe::BlockTemplates;
use blockspeak_core::{
    Block, ConnectionRole, ControlRole, Describer, Entity, FieldKind, FormControl,
    InMemoryWorkspace, InputKind, MenuItem,
};
use std::sync::Arc;

fn describer(ws: InMemoryWorkspace) -> Describer {
    Describer::new(Arc::new(ws))
}

#[test]
fn test_variable_and_value_children() {
    let ws = InMemoryWorkspace::new();
    ws.set_variable("v1", "count");
    ws.insert(Block::value("n", "math_number").with_field("NUM", FieldKind::Number, "5"));
    ws.insert(
        Block::statement("s", "variables_set")
            .with_field("VAR", FieldKind::Variable, "v1")
            .with_input("VALUE", InputKind::Value, Some("n")),
    );
    let d = describer(ws);

    assert_eq!(d.describe_block("s"), "set count to 5");
    assert_eq!(d.describe(&Entity::Block("missing".into())), "unknown block");
}

#[test]
fn test_deep_nesting_is_cut_off() {
    let ws = InMemoryWorkspace::new();
    for i in 0..10 {
        let next = format!("n{}", i + 1);
        ws.insert(Block::value(format!("n{}", i), "logic_negate").with_input(
            "BOOL",
            InputKind::Value,
            Some(next.as_str()),
        ));
    }
    ws.insert(Block::value("n10", "logic_boolean").with_field("BOOL", FieldKind::Dropdown, "TRUE"));
    let d = describer(ws);

    let phrase = d.describe_block("n0");
    assert_eq!(phrase.matches("not").count(), 7);
    assert!(phrase.ends_with("value"));
}

#[test]
fn test_unknown_type_and_custom_template() {
    let ws = InMemoryWorkspace::new();
    ws.insert(Block::statement("m", "motor_spin"));
    let model = Arc::new(ws);

    let d = Describer::new(model.clone());
    assert_eq!(d.describe_block("m"), "motor spin block");

    let mut templates = BlockTemplates::standard();
    templates.register("motor_spin", |_| "spin the motor".to_string());
    let d = Describer::with_templates(model, templates);
    assert_eq!(d.describe_block("m"), "spin the motor");
}

#[test]
fn test_colour_field_and_connections() {
    let ws = InMemoryWorkspace::new();
    ws.insert(Block::value("c", "colour_picker").with_field("COLOUR", FieldKind::Colour, "#008000"));
    ws.insert(
        Block::statement("loop", "controls_repeat_ext")
            .with_input("TIMES", InputKind::Value, None)
            .with_input("DO", InputKind::Statement, None),
    );
    let d = describer(ws);

    assert_eq!(d.describe_block("c"), "colour green");
    assert_eq!(
        d.describe(&Entity::Field {
            block: "c".into(),
            field: "COLOUR".into()
        }),
        "green, colour picker. Press Enter to choose a colour."
    );
    assert_eq!(
        d.describe(&Entity::Connection {
            block: "loop".into(),
            role: ConnectionRole::Input("DO".into()),
        }),
        "Statement input on repeat value times. Connect a statement here."
    );
    assert_eq!(
        d.describe(&Entity::Connection {
            block: "loop".into(),
            role: ConnectionRole::Next,
        }),
        "Bottom of repeat value times. Attach a block below here."
    );
}

#[test]
fn test_menu_items_and_controls() {
    let d = describer(InMemoryWorkspace::new());

    let item = MenuItem {
        checked: Some(false),
        enabled: false,
        ..MenuItem::new("Inline Inputs").at(2, 7)
    };
    assert_eq!(
        d.describe(&Entity::MenuItem(item)),
        "Inline Inputs, not checked, unavailable, 2 of 7"
    );

    let control = FormControl {
        role: ControlRole::TextInput,
        label: "Project name".into(),
        value: None,
        checked: None,
    };
    assert_eq!(
        d.describe(&Entity::FormControl(control)),
        "Project name, edit text, blank"
    );
}
