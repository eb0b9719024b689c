use crate::model::{ConnectionRole, Location};
use std::fmt;

/// Stable key for a cursor location.
///
/// Equal locations give equal keys; every workspace location shares one key.
/// Ids and names are length-prefixed, so a `:` inside one cannot shift the
/// component boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeId(String);

impl NodeId {
    pub fn of(location: &Location) -> Self {
        let key = match location {
            Location::Workspace => "workspace".to_string(),
            Location::Block { id, .. } => format!("block:{}", part(id)),
            Location::Stack { id } => format!("stack:{}", part(id)),
            Location::Connection { id, role } => {
                let role = match role {
                    ConnectionRole::Previous => "previous".to_string(),
                    ConnectionRole::Next => "next".to_string(),
                    ConnectionRole::Output => "output".to_string(),
                    ConnectionRole::Input(name) => format!("input:{}", part(name)),
                };
                format!("connection:{}:{}", part(id), role)
            }
            Location::Field { id, field } => format!("field:{}:{}", part(id), part(field)),
            Location::Input { id, input } => format!("input:{}:{}", part(id), part(input)),
            Location::Other { kind } => format!("other:{}", part(kind)),
        };
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn part(raw: &str) -> String {
    format!("{}:{}", raw.len(), raw)
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
