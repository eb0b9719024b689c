//! Phrase templates keyed by block type.

use super::Describer;
use crate::model::{Block, InputKind};
use std::collections::HashMap;

/// Builds the phrase for one block type
pub type BlockDescriber = fn(&BlockContext<'_>) -> String;

/// View of a block handed to a template, with helpers that never fail
pub struct BlockContext<'a> {
    pub(super) describer: &'a Describer,
    pub block: &'a Block,
    pub(super) depth: usize,
}

impl<'a> BlockContext<'a> {
    /// Raw field value.
    pub fn raw(&self, name: &str) -> Option<&'a str> {
        self.block.field(name).map(|f| f.value.as_str())
    }

    /// Spoken field value, or "value" when the field is missing.
    pub fn field(&self, name: &str) -> String {
        match self.block.field(name) {
            Some(f) => self.describer.field_value(f),
            None => "value".to_string(),
        }
    }

    /// Phrase of the block plugged into a value input, or "value".
    pub fn value(&self, input: &str) -> String {
        self.child(input, "value")
    }

    /// Like [`value`](Self::value) but the placeholder is "list".
    pub fn list(&self, input: &str) -> String {
        self.child(input, "list")
    }

    /// Phrase of the first block in a statement input, or "statement".
    pub fn statement(&self, input: &str) -> String {
        self.child(input, "statement")
    }

    /// Number of inputs whose name starts with `prefix` (ADD0, ADD1, ...).
    pub fn count_inputs(&self, prefix: &str) -> usize {
        self.block
            .inputs
            .iter()
            .filter(|i| i.kind != InputKind::Dummy && i.name.starts_with(prefix))
            .count()
    }

    fn child(&self, input: &str, placeholder: &str) -> String {
        let connected = self
            .block
            .input(input)
            .and_then(|i| i.connected.as_deref());
        self.describer.child_phrase(connected, self.depth + 1, placeholder)
    }
}

/// Lookup table from block type to template
#[derive(Clone)]
pub struct BlockTemplates {
    table: HashMap<String, BlockDescriber>,
}

impl Default for BlockTemplates {
    fn default() -> Self {
        Self::standard()
    }
}

impl BlockTemplates {
    pub fn empty() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    /// Templates for the stock block library
    pub fn standard() -> Self {
        let mut t = Self::empty();
        t.register("controls_if", controls_if);
        t.register("controls_repeat_ext", |c| format!("repeat {} times", c.value("TIMES")));
        t.register("controls_repeat", |c| format!("repeat {} times", c.field("TIMES")));
        t.register("controls_whileUntil", |c| {
            let mode = if c.raw("MODE") == Some("UNTIL") { "until" } else { "while" };
            format!("repeat {} {}", mode, c.value("BOOL"))
        });
        t.register("controls_for", |c| {
            format!(
                "count with {} from {} to {} by {}",
                c.field("VAR"),
                c.value("FROM"),
                c.value("TO"),
                c.value("BY")
            )
        });
        t.register("controls_forEach", |c| {
            format!("for each item {} in {}", c.field("VAR"), c.list("LIST"))
        });
        t.register("controls_flow_statements", |c| match c.raw("FLOW") {
            Some("CONTINUE") => "continue with next iteration of loop".to_string(),
            _ => "break out of loop".to_string(),
        });
        t.register("logic_compare", |c| {
            let op = match c.raw("OP").unwrap_or("EQ") {
                "NEQ" => "not equal",
                "LT" => "less than",
                "LTE" => "less than or equal",
                "GT" => "greater than",
                "GTE" => "greater than or equal",
                _ => "equals",
            };
            format!("{} {} {}", c.value("A"), op, c.value("B"))
        });
        t.register("logic_operation", |c| {
            let op = if c.raw("OP") == Some("OR") { "or" } else { "and" };
            format!("{} {} {}", c.value("A"), op, c.value("B"))
        });
        t.register("logic_negate", |c| format!("not {}", c.value("BOOL")));
        t.register("logic_boolean", |c| {
            let value = if c.raw("BOOL") == Some("FALSE") { "false" } else { "true" };
            value.to_string()
        });
        t.register("logic_null", |_| "null".to_string());
        t.register("logic_ternary", |c| {
            format!(
                "test {}, if true {}, if false {}",
                c.value("IF"),
                c.value("THEN"),
                c.value("ELSE")
            )
        });
        t.register("math_number", |c| c.field("NUM"));
        t.register("math_arithmetic", |c| {
            let op = match c.raw("OP").unwrap_or("ADD") {
                "MINUS" => "minus",
                "MULTIPLY" => "times",
                "DIVIDE" => "divided by",
                "POWER" => "to the power of",
                _ => "plus",
            };
            format!("{} {} {}", c.value("A"), op, c.value("B"))
        });
        t.register("math_single", |c| {
            let op = match c.raw("OP").unwrap_or("ROOT") {
                "ABS" => "absolute value of",
                "NEG" => "negative",
                "LN" => "natural log of",
                "LOG10" => "log base 10 of",
                "EXP" => "e to the power of",
                "POW10" => "10 to the power of",
                _ => "square root of",
            };
            format!("{} {}", op, c.value("NUM"))
        });
        t.register("math_trig", |c| {
            let op = match c.raw("OP").unwrap_or("SIN") {
                "COS" => "cosine of",
                "TAN" => "tangent of",
                "ASIN" => "arc sine of",
                "ACOS" => "arc cosine of",
                "ATAN" => "arc tangent of",
                _ => "sine of",
            };
            format!("{} {} degrees", op, c.value("NUM"))
        });
        t.register("math_constant", |c| {
            let constant = match c.raw("CONSTANT").unwrap_or("PI") {
                "E" => "e",
                "GOLDEN_RATIO" => "golden ratio",
                "SQRT2" => "square root of 2",
                "SQRT1_2" => "square root of one half",
                "INFINITY" => "infinity",
                _ => "pi",
            };
            constant.to_string()
        });
        t.register("math_round", |c| {
            let op = match c.raw("OP").unwrap_or("ROUND") {
                "ROUNDUP" => "round up",
                "ROUNDDOWN" => "round down",
                _ => "round",
            };
            format!("{} {}", op, c.value("NUM"))
        });
        t.register("math_modulo", |c| {
            format!(
                "remainder of {} divided by {}",
                c.value("DIVIDEND"),
                c.value("DIVISOR")
            )
        });
        t.register("math_random_int", |c| {
            format!("random integer from {} to {}", c.value("FROM"), c.value("TO"))
        });
        t.register("math_change", |c| {
            format!("change {} by {}", c.field("VAR"), c.value("DELTA"))
        });
        t.register("text", |c| match c.raw("TEXT") {
            Some(s) if !s.trim().is_empty() => format!("text {}", c.field("TEXT")),
            _ => "empty text".to_string(),
        });
        t.register("text_join", |c| match c.count_inputs("ADD") {
            0 => "create empty text".to_string(),
            n => {
                let parts: Vec<String> = (0..n).map(|i| c.value(&format!("ADD{}", i))).collect();
                format!("create text with {}", parts.join(", "))
            }
        });
        t.register("text_length", |c| format!("length of {}", c.value("VALUE")));
        t.register("text_print", |c| format!("print {}", c.value("TEXT")));
        t.register("variables_get", |c| c.field("VAR"));
        t.register("variables_set", |c| {
            format!("set {} to {}", c.field("VAR"), c.value("VALUE"))
        });
        t.register("lists_create_empty", |_| "create empty list".to_string());
        t.register("lists_create_with", |c| match c.count_inputs("ADD") {
            0 => "create empty list".to_string(),
            1 => "create list with 1 item".to_string(),
            n => format!("create list with {} items", n),
        });
        t.register("lists_length", |c| format!("length of {}", c.list("VALUE")));
        t.register("lists_isEmpty", |c| format!("{} is empty", c.list("VALUE")));
        t.register("colour_picker", |c| format!("colour {}", c.field("COLOUR")));
        t.register("procedures_defnoreturn", |c| {
            format!("to {} do {}", c.field("NAME"), c.statement("STACK"))
        });
        t.register("procedures_callnoreturn", |c| format!("call {}", c.field("NAME")));
        t.register("procedures_callreturn", |c| format!("call {}", c.field("NAME")));
        t
    }

    pub fn register(&mut self, block_type: &str, describer: BlockDescriber) {
        self.table.insert(block_type.to_string(), describer);
    }

    pub fn get(&self, block_type: &str) -> Option<BlockDescriber> {
        self.table.get(block_type).copied()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

fn controls_if(c: &BlockContext<'_>) -> String {
    let branches = c
        .block
        .inputs
        .iter()
        .filter(|i| i.name.starts_with("IF"))
        .count()
        .max(1);
    let mut parts = Vec::with_capacity(branches + 1);
    for i in 0..branches {
        let keyword = if i == 0 { "if" } else { "else if" };
        parts.push(format!(
            "{} {} do {}",
            keyword,
            c.value(&format!("IF{}", i)),
            c.statement(&format!("DO{}", i))
        ));
    }
    if c.block.input("ELSE").is_some() {
        parts.push(format!("else {}", c.statement("ELSE")));
    }
    parts.join(", ")
}

/// Generic phrase for block types without a template: `my_block` → "my block block".
pub fn fallback_phrase(block_type: &str) -> String {
    let name = block_type
        .split('_')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if name.is_empty() {
        "block".to_string()
    } else {
        format!("{} block", name)
    }
}
