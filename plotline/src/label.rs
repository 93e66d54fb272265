//! Node address: a `(flow, node)` pair.
//!
//! Labels are graph keys in a [`Plot`](crate::Plot) and history entries in a
//! [`Context`](crate::Context). Equality is by value. A label is only valid
//! against a concrete plot; dangling labels surface as
//! `ActorError::UnknownLabel`, never as a silent coercion.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Address of one node: flow name + node name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Label {
    pub flow: String,
    pub node: String,
}

impl Label {
    /// Creates a label from flow and node names.
    pub fn new(flow: impl Into<String>, node: impl Into<String>) -> Self {
        Self {
            flow: flow.into(),
            node: node.into(),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.flow, self.node)
    }
}

impl From<(&str, &str)> for Label {
    fn from((flow, node): (&str, &str)) -> Self {
        Label::new(flow, node)
    }
}

impl From<(String, String)> for Label {
    fn from((flow, node): (String, String)) -> Self {
        Label { flow, node }
    }
}
