//! The data models for a parsed Zenithal document.
use serde::Serialize;

mod attributes;
mod indent;
mod location;
mod node;

pub use attributes::*;
pub use location::*;
pub use node::*;

/// A `Document` represents the root of a Zenithal document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Document {
    /// The top-level nodes, in source order.
    pub root: Nodes,
    /// The grammar version in effect when parsing finished, if any was given
    /// through the options or a `zml` system instruction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl Document {
    #[must_use]
    pub fn root(&self) -> &Nodes {
        &self.root
    }

    /// The first element at the top level, if any.
    #[must_use]
    pub fn root_element(&self) -> Option<&Element> {
        self.root.iter().find_map(Node::as_element)
    }
}
