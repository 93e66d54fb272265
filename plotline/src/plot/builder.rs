//! Plot builder: collect nodes, then build the immutable plot.
//!
//! Add nodes with [`node`](PlotBuilder::node) (flows are created on first
//! use, in authored order), attach the global pseudo-node with
//! [`global`](PlotBuilder::global), then [`build`](PlotBuilder::build).

use crate::label::Label;

use super::build_error::BuildError;
use super::compiled::{Flow, Plot, GLOBAL};
use super::node::Node;

/// Collects flows and nodes in authored order; `build()` runs the structural
/// checks and freezes the plot.
#[derive(Default)]
pub struct PlotBuilder {
    flows: Vec<Flow>,
}

impl PlotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node under the given flow. The flow is created on first use.
    ///
    /// Returns `&mut Self` for method chaining. Defining the same
    /// `(flow, node)` address twice is reported by `build()`.
    pub fn node(
        &mut self,
        flow: impl Into<String>,
        name: impl Into<String>,
        node: Node,
    ) -> &mut Self {
        let flow = flow.into();
        let entry = (name.into(), node);
        match self.flows.iter_mut().find(|f| f.name == flow) {
            Some(existing) => existing.nodes.push(entry),
            None => self.flows.push(Flow {
                name: flow,
                nodes: vec![entry],
            }),
        }
        self
    }

    /// Sets the global pseudo-node. Its transitions join every node's
    /// candidate set; its processing hooks run after every node's local ones.
    pub fn global(&mut self, node: Node) -> &mut Self {
        self.node(GLOBAL, GLOBAL, node)
    }

    /// Runs the structural checks and returns the immutable plot.
    ///
    /// Fails on an empty plot or a duplicated node address. Dangling
    /// transition targets are not checked here; they fail resolution with
    /// `UnknownLabel` at run time.
    pub fn build(self) -> Result<Plot, BuildError> {
        if self.flows.iter().all(|f| f.nodes.is_empty()) {
            return Err(BuildError::Empty);
        }
        for flow in &self.flows {
            for (i, (name, _)) in flow.nodes.iter().enumerate() {
                if flow.nodes[..i].iter().any(|(n, _)| n == name) {
                    return Err(BuildError::DuplicateNode(Label::new(
                        flow.name.clone(),
                        name.clone(),
                    )));
                }
            }
        }
        Ok(Plot { flows: self.flows })
    }
}
