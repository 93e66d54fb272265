//! Standard transition conditions.
//!
//! Each helper returns a concrete type implementing
//! [`Condition`](crate::Condition); combine them with [`any`], [`all`] and
//! [`negation`], or drop down to a plain closure for anything custom.

use std::sync::Arc;

use async_trait::async_trait;
use regex::Regex;

use crate::actor::Actor;
use crate::capability::Condition;
use crate::context::Context;
use crate::error::CapabilityError;
use crate::label::Label;

/// True when the last request is exactly `text` (case-sensitive).
pub fn exact_match(text: impl Into<String>) -> ExactMatch {
    ExactMatch { text: text.into() }
}

pub struct ExactMatch {
    text: String,
}

#[async_trait]
impl Condition for ExactMatch {
    async fn evaluate(&self, ctx: &Context, _actor: &Actor) -> Result<bool, CapabilityError> {
        Ok(ctx.last_request() == Some(self.text.as_str()))
    }
}

/// True when the last request contains a match for `pattern`.
pub fn regexp(pattern: &str) -> Result<Regexp, regex::Error> {
    Ok(Regexp {
        pattern: Regex::new(pattern)?,
    })
}

pub struct Regexp {
    pattern: Regex,
}

#[async_trait]
impl Condition for Regexp {
    async fn evaluate(&self, ctx: &Context, _actor: &Actor) -> Result<bool, CapabilityError> {
        Ok(ctx
            .last_request()
            .is_some_and(|request| self.pattern.is_match(request)))
    }
}

/// True when any of the conditions is true. Evaluates left to right and
/// short-circuits.
pub fn any(conditions: impl IntoIterator<Item = Arc<dyn Condition>>) -> Aggregate {
    Aggregate {
        conditions: conditions.into_iter().collect(),
        require_all: false,
    }
}

/// True when all of the conditions are true. Evaluates left to right and
/// short-circuits.
pub fn all(conditions: impl IntoIterator<Item = Arc<dyn Condition>>) -> Aggregate {
    Aggregate {
        conditions: conditions.into_iter().collect(),
        require_all: true,
    }
}

pub struct Aggregate {
    conditions: Vec<Arc<dyn Condition>>,
    require_all: bool,
}

#[async_trait]
impl Condition for Aggregate {
    async fn evaluate(&self, ctx: &Context, actor: &Actor) -> Result<bool, CapabilityError> {
        for condition in &self.conditions {
            let fired = condition.evaluate(ctx, actor).await?;
            if fired != self.require_all {
                return Ok(fired);
            }
        }
        Ok(self.require_all)
    }
}

/// Inverts a condition.
pub fn negation(condition: impl Condition + 'static) -> Negation {
    Negation {
        inner: Arc::new(condition),
    }
}

pub struct Negation {
    inner: Arc<dyn Condition>,
}

#[async_trait]
impl Condition for Negation {
    async fn evaluate(&self, ctx: &Context, actor: &Actor) -> Result<bool, CapabilityError> {
        Ok(!self.inner.evaluate(ctx, actor).await?)
    }
}

/// True when any of the last `last_n_turns` visited labels is in `labels`, or
/// its flow name is in `flows`.
pub fn has_last_labels(
    flows: impl IntoIterator<Item = impl Into<String>>,
    labels: impl IntoIterator<Item = Label>,
    last_n_turns: usize,
) -> HasLastLabels {
    HasLastLabels {
        flows: flows.into_iter().map(Into::into).collect(),
        labels: labels.into_iter().collect(),
        last_n_turns,
    }
}

pub struct HasLastLabels {
    flows: Vec<String>,
    labels: Vec<Label>,
    last_n_turns: usize,
}

#[async_trait]
impl Condition for HasLastLabels {
    async fn evaluate(&self, ctx: &Context, _actor: &Actor) -> Result<bool, CapabilityError> {
        let skip = ctx.labels.len().saturating_sub(self.last_n_turns);
        Ok(ctx.labels[skip..]
            .iter()
            .any(|label| self.flows.contains(&label.flow) || self.labels.contains(label)))
    }
}

/// Always true: the usual catch-all transition.
pub fn always_true() -> Always {
    Always { value: true }
}

/// Always false: disables a transition without deleting it.
pub fn always_false() -> Always {
    Always { value: false }
}

pub struct Always {
    value: bool,
}

#[async_trait]
impl Condition for Always {
    async fn evaluate(&self, _ctx: &Context, _actor: &Actor) -> Result<bool, CapabilityError> {
        Ok(self.value)
    }
}
