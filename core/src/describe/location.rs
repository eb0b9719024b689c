//! Phrases for cursor locations.

use super::{humanize_option, Describer};
use crate::model::{Block, Location};

pub const WORKSPACE_PHRASE: &str = "Workspace. Use the arrow keys to move between block stacks.";

impl Describer {
    /// What the user hears when the cursor lands on `location`.
    pub fn describe_location(&self, location: &Location) -> String {
        match location {
            Location::Workspace => WORKSPACE_PHRASE.to_string(),
            Location::Block { id, palette } => {
                let phrase = self.describe_block(id);
                match palette {
                    Some(pos) => format!("{}, {} of {}", phrase, pos.index, pos.total),
                    None => phrase,
                }
            }
            Location::Stack { id } => match self.model().block(id) {
                Some(top) => {
                    let count = self.stack_len(&top);
                    let noun = if count == 1 { "block" } else { "blocks" };
                    format!(
                        "Stack of {} {}, starting with {}",
                        count,
                        noun,
                        self.block_phrase(&top)
                    )
                }
                None => "Stack".to_string(),
            },
            Location::Connection { id, role } => match self.model().block(id) {
                Some(block) => self.describe_connection(&block, role),
                None => "Connection".to_string(),
            },
            Location::Field { id, field } => {
                let found = self
                    .model()
                    .block(id)
                    .and_then(|b| b.field(field).cloned().map(|f| (b, f)));
                match found {
                    Some((block, f)) => self.describe_field(&block, &f),
                    None => format!("{} field", humanize_option(field)),
                }
            }
            Location::Input { id, input } => {
                let name = match humanize_option(input) {
                    n if n.is_empty() => "unnamed".to_string(),
                    n => n,
                };
                format!("{} input of {}", name, self.describe_block(id))
            }
            Location::Other { kind } => match humanize_option(kind) {
                k if k.is_empty() => "Unknown location".to_string(),
                k => format!("{} location", k),
            },
        }
    }

    /// Blocks in the stack headed by `top`, following next links.
    fn stack_len(&self, top: &Block) -> usize {
        let mut count = 1;
        let mut next = top.next.clone();
        while let Some(id) = next {
            let Some(block) = self.model().block(&id) else {
                break;
            };
            count += 1;
            // cyclic next chain
            if count > 10_000 {
                break;
            }
            next = block.next;
        }
        count
    }
}
