//! The authored dialogue graph: flows, nodes, transitions.
//!
//! Build with [`PlotBuilder`] (or `Plot::builder()`), then hand the immutable
//! [`Plot`] to an [`Actor`](crate::Actor).

mod build_error;
mod builder;
mod compiled;
mod node;

pub use build_error::BuildError;
pub use builder::PlotBuilder;
pub use compiled::{Flow, Plot, GLOBAL};
pub use node::{DynamicTarget, Node, Target, Transition};
