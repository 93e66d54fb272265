//! Plot build errors.

use thiserror::Error;

use crate::label::Label;

/// Structural problem found while building a plot.
///
/// Dangling transition targets are deliberately not a build error; they
/// surface as `ActorError::UnknownLabel` when a turn resolves to them.
#[derive(Debug, Error, PartialEq)]
pub enum BuildError {
    /// The plot has no nodes at all.
    #[error("plot has no nodes")]
    Empty,

    /// The same `(flow, node)` address was defined twice.
    #[error("node {0} defined twice")]
    DuplicateNode(Label),
}
