//! Standard dynamic transition targets.
//!
//! Each helper returns a [`Target`](crate::Target) computing its label from
//! the context at match time instead of naming a fixed node: [`repeat`] and
//! [`previous`] walk the visited-label history, [`to_start`] / [`to_fallback`]
//! use the actor's configuration, and [`forward`] / [`backward`] step through
//! the authored node order of the current flow, cyclically.
//!
//! When history is too short, history-based targets fall back to the actor's
//! fallback label (or the start label when no fallback label is configured).

use async_trait::async_trait;

use crate::actor::Actor;
use crate::context::Context;
use crate::label::Label;
use crate::plot::{DynamicTarget, Target};

/// Target the node visited on the last turn.
pub fn repeat() -> Target {
    Target::dynamic(BackInHistory { turns_ago: 1 })
}

/// Target the node visited on the turn before last.
pub fn previous() -> Target {
    Target::dynamic(BackInHistory { turns_ago: 2 })
}

/// Target the actor's start label.
pub fn to_start() -> Target {
    Target::dynamic(ToStart)
}

/// Target the actor's fallback label (start label when none is configured).
pub fn to_fallback() -> Target {
    Target::dynamic(ToFallback)
}

/// Target the next node in the current flow's authored order, wrapping at the
/// end.
pub fn forward() -> Target {
    Target::dynamic(Shift { step: 1 })
}

/// Target the previous node in the current flow's authored order, wrapping at
/// the start.
pub fn backward() -> Target {
    Target::dynamic(Shift { step: -1 })
}

fn fallback_or_start(actor: &Actor) -> Label {
    actor
        .fallback_label()
        .unwrap_or_else(|| actor.start_label())
        .clone()
}

struct BackInHistory {
    turns_ago: usize,
}

#[async_trait]
impl DynamicTarget for BackInHistory {
    async fn resolve(&self, ctx: &Context, actor: &Actor) -> Option<Label> {
        let len = ctx.labels.len();
        if len >= self.turns_ago {
            Some(ctx.labels[len - self.turns_ago].clone())
        } else {
            Some(fallback_or_start(actor))
        }
    }
}

struct ToStart;

#[async_trait]
impl DynamicTarget for ToStart {
    async fn resolve(&self, _ctx: &Context, actor: &Actor) -> Option<Label> {
        Some(actor.start_label().clone())
    }
}

struct ToFallback;

#[async_trait]
impl DynamicTarget for ToFallback {
    async fn resolve(&self, _ctx: &Context, actor: &Actor) -> Option<Label> {
        Some(fallback_or_start(actor))
    }
}

struct Shift {
    step: i64,
}

#[async_trait]
impl DynamicTarget for Shift {
    async fn resolve(&self, ctx: &Context, actor: &Actor) -> Option<Label> {
        let base = ctx
            .last_label()
            .cloned()
            .unwrap_or_else(|| fallback_or_start(actor));
        let flow = match actor.plot().flow(&base.flow) {
            Some(flow) => flow,
            None => return Some(fallback_or_start(actor)),
        };
        let names: Vec<&str> = flow.node_names().collect();
        let index = match names.iter().position(|name| *name == base.node) {
            Some(index) => index,
            None => return Some(fallback_or_start(actor)),
        };
        let len = names.len() as i64;
        let shifted = (index as i64 + self.step).rem_euclid(len) as usize;
        Some(Label::new(base.flow, names[shifted]))
    }
}
