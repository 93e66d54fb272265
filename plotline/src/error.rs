//! Turn execution error types.
//!
//! Returned by [`Actor::process`](crate::Actor::process) and the transition
//! resolver. Errors raised inside author-supplied capabilities travel as
//! [`CapabilityError`] and are tagged with the stage they occurred in;
//! engine-level conditions (`UnknownLabel`, `NoMatchingTransition`) are their
//! own variants and are never folded into a generic response.

use thiserror::Error;

use crate::context::ContextError;
use crate::label::Label;

/// Error raised by an author-supplied condition, responder or processor.
///
/// Carries a message only; classifying the failure further is the
/// capability's own responsibility.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct CapabilityError(pub String);

impl CapabilityError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<String> for CapabilityError {
    fn from(message: String) -> Self {
        Self(message)
    }
}

impl From<&str> for CapabilityError {
    fn from(message: &str) -> Self {
        Self(message.to_string())
    }
}

/// One turn failed.
///
/// `UnknownLabel` and `NoMatchingTransition` come from label validation and
/// the resolver; the remaining variants wrap a capability failure with the
/// stage it occurred at.
#[derive(Debug, Error)]
pub enum ActorError {
    /// A label does not resolve to a node in the plot (author/data error).
    #[error("unknown label {0}")]
    UnknownLabel(Label),

    /// No transition predicate matched; recoverable via the fallback policy.
    #[error("no transition matched from {0}")]
    NoMatchingTransition(Label),

    /// A pre-transition processor failed. Mutations made earlier in the turn
    /// are retained.
    #[error("pre-processing failed at {label}: {source}")]
    PreProcessing {
        label: Label,
        source: CapabilityError,
    },

    /// A post-transition processor failed. Mutations made earlier in the turn
    /// are retained.
    #[error("post-processing failed at {label}: {source}")]
    PostProcessing {
        label: Label,
        source: CapabilityError,
    },

    /// The winning node's responder failed. The visited-label log does not
    /// advance and the turn's request entry is rolled back.
    #[error("responder failed at {label}: {source}")]
    Responder {
        label: Label,
        source: CapabilityError,
    },

    /// A serialized context could not be normalized at the turn boundary.
    #[error(transparent)]
    Context(#[from] ContextError),
}
