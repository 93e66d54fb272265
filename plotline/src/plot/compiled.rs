//! Built plot: immutable, supports lookup only.
//!
//! Produced by [`PlotBuilder::build`](super::PlotBuilder). Once built, a plot
//! never changes; an actor shares it read-only across any number of
//! concurrent turns over different contexts. Changing the graph means
//! building a new plot.

use crate::label::Label;

use super::node::{Node, Transition};

/// Reserved flow name for the global pseudo-flow.
///
/// Transitions of the node at `(GLOBAL, GLOBAL)` are unioned with every
/// node's local transitions at resolution time, and its processing hooks run
/// after every node's local hooks. The global flow may also hold regular
/// nodes addressable like any other.
pub const GLOBAL: &str = "__global__";

/// A named group of nodes in authored order.
///
/// Node order within a flow is data: the standard `forward()` / `backward()`
/// destinations walk it.
pub struct Flow {
    pub(crate) name: String,
    pub(crate) nodes: Vec<(String, Node)>,
}

impl Flow {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Looks a node up by name.
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, node)| node)
    }

    /// Node names in authored order.
    pub fn node_names(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|(n, _)| n.as_str())
    }
}

/// The authored, immutable dialogue graph: flows of nodes plus the reserved
/// global pseudo-flow.
pub struct Plot {
    pub(crate) flows: Vec<Flow>,
}

impl Plot {
    /// Starts building a plot.
    pub fn builder() -> super::PlotBuilder {
        super::PlotBuilder::new()
    }

    /// Looks a flow up by name.
    pub fn flow(&self, name: &str) -> Option<&Flow> {
        self.flows.iter().find(|f| f.name == name)
    }

    /// Looks a node up by label.
    pub fn node(&self, label: &Label) -> Option<&Node> {
        self.flow(&label.flow)?.node(&label.node)
    }

    /// Whether the label resolves to a node in this plot.
    pub fn contains(&self, label: &Label) -> bool {
        self.node(label).is_some()
    }

    /// The global pseudo-node at `(GLOBAL, GLOBAL)`, if authored.
    pub(crate) fn global_node(&self) -> Option<&Node> {
        self.flow(GLOBAL)?.node(GLOBAL)
    }

    /// Transitions of the global pseudo-node; empty when none was authored.
    pub(crate) fn global_transitions(&self) -> &[Transition] {
        self.global_node()
            .map(|n| n.transitions())
            .unwrap_or_default()
    }
}
