//! Node definition: responder, transitions, processing hooks.
//!
//! Nodes are owned by the [`Plot`](super::Plot) and built with the chaining
//! methods on [`Node`]. Transition targets are either fixed labels or
//! [`DynamicTarget`] capabilities computed from the context at match time
//! (see [`destinations`](crate::destinations) for the standard ones).

use std::sync::Arc;

use async_trait::async_trait;

use crate::actor::Actor;
use crate::capability::{Condition, Processor, Responder};
use crate::context::Context;
use crate::label::Label;

/// Computes a transition target from the context at match time.
///
/// Returning `None` makes the candidate a non-match; the resolver moves on to
/// the next candidate.
#[async_trait]
pub trait DynamicTarget: Send + Sync {
    async fn resolve(&self, ctx: &Context, actor: &Actor) -> Option<Label>;
}

/// Where a transition leads: a fixed label or a dynamic target.
#[derive(Clone)]
pub enum Target {
    Label(Label),
    Dynamic(Arc<dyn DynamicTarget>),
}

impl Target {
    /// Wraps a dynamic target capability.
    pub fn dynamic(target: impl DynamicTarget + 'static) -> Self {
        Target::Dynamic(Arc::new(target))
    }
}

impl From<Label> for Target {
    fn from(label: Label) -> Self {
        Target::Label(label)
    }
}

impl From<(&str, &str)> for Target {
    fn from(pair: (&str, &str)) -> Self {
        Target::Label(pair.into())
    }
}

/// One candidate edge out of a node: target + predicate + optional priority.
///
/// Priority defaults to the actor's configured default when unset.
#[derive(Clone)]
pub struct Transition {
    pub(crate) target: Target,
    pub(crate) condition: Arc<dyn Condition>,
    pub(crate) priority: Option<f64>,
}

impl Transition {
    /// The priority used for candidate ordering.
    pub fn priority_or(&self, default: f64) -> f64 {
        self.priority.unwrap_or(default)
    }

    pub fn target(&self) -> &Target {
        &self.target
    }
}

/// One dialogue state: optional responder, ordered transitions, ordered
/// pre/post processing hooks. Authored order of transitions is a tie-break
/// signal for the resolver.
#[derive(Clone, Default)]
pub struct Node {
    pub(crate) response: Option<Arc<dyn Responder>>,
    pub(crate) transitions: Vec<Transition>,
    pub(crate) pre_processing: Vec<Arc<dyn Processor>>,
    pub(crate) post_processing: Vec<Arc<dyn Processor>>,
}

impl Node {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the responder invoked when a turn lands on this node.
    pub fn response(mut self, responder: impl Responder + 'static) -> Self {
        self.response = Some(Arc::new(responder));
        self
    }

    /// Adds a transition with the default priority.
    pub fn transition(
        mut self,
        target: impl Into<Target>,
        condition: impl Condition + 'static,
    ) -> Self {
        self.transitions.push(Transition {
            target: target.into(),
            condition: Arc::new(condition),
            priority: None,
        });
        self
    }

    /// Adds a transition with an explicit priority. Higher wins.
    pub fn transition_with_priority(
        mut self,
        target: impl Into<Target>,
        condition: impl Condition + 'static,
        priority: f64,
    ) -> Self {
        self.transitions.push(Transition {
            target: target.into(),
            condition: Arc::new(condition),
            priority: Some(priority),
        });
        self
    }

    /// Appends a pre-transition processing hook. Hooks run in authored order.
    pub fn pre_processing(mut self, processor: impl Processor + 'static) -> Self {
        self.pre_processing.push(Arc::new(processor));
        self
    }

    /// Appends a post-transition processing hook. Hooks run in authored order.
    pub fn post_processing(mut self, processor: impl Processor + 'static) -> Self {
        self.post_processing.push(Arc::new(processor));
        self
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn responder(&self) -> Option<&Arc<dyn Responder>> {
        self.response.as_ref()
    }
}
