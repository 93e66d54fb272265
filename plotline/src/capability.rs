//! Author-supplied capabilities: conditions, responders, processors.
//!
//! The engine treats these purely as opaque trait objects it invokes; it
//! never depends on concrete author types. Plain sync closures of the right
//! shape work as capabilities via the blanket impls below, so a plot can mix
//! the standard library types (see [`conditions`](crate::conditions),
//! [`destinations`](crate::destinations), [`responses`](crate::responses))
//! with ad-hoc functions.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::actor::Actor;
use crate::context::Context;
use crate::error::CapabilityError;

/// One outgoing message produced by a turn.
///
/// A node without a responder yields the default (empty) response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub text: String,
}

impl Response {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for Response {
    fn from(text: &str) -> Self {
        Response::new(text)
    }
}

impl From<String> for Response {
    fn from(text: String) -> Self {
        Response { text }
    }
}

/// Transition predicate: decides whether a candidate transition fires.
///
/// Evaluated by the resolver in priority order; evaluation stops at the first
/// `true`. An `Err` is logged by the resolver and treated as `false`.
#[async_trait]
pub trait Condition: Send + Sync {
    async fn evaluate(&self, ctx: &Context, actor: &Actor) -> Result<bool, CapabilityError>;
}

/// Produces the outgoing response for the node a turn lands on.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn respond(&self, ctx: &Context, actor: &Actor) -> Result<Response, CapabilityError>;
}

/// Rewrites context state before or after transition resolution (e.g. slot
/// extraction). A failing processor aborts the turn; mutations made by
/// earlier processors in the same turn remain.
#[async_trait]
pub trait Processor: Send + Sync {
    async fn process(&self, ctx: &mut Context, actor: &Actor) -> Result<(), CapabilityError>;
}

#[async_trait]
impl<F> Condition for F
where
    F: Fn(&Context, &Actor) -> bool + Send + Sync,
{
    async fn evaluate(&self, ctx: &Context, actor: &Actor) -> Result<bool, CapabilityError> {
        Ok(self(ctx, actor))
    }
}

#[async_trait]
impl<F> Responder for F
where
    F: Fn(&Context, &Actor) -> Response + Send + Sync,
{
    async fn respond(&self, ctx: &Context, actor: &Actor) -> Result<Response, CapabilityError> {
        Ok(self(ctx, actor))
    }
}

/// A literal `Response` responds with itself, so plots can carry fixed texts.
#[async_trait]
impl Responder for Response {
    async fn respond(&self, _ctx: &Context, _actor: &Actor) -> Result<Response, CapabilityError> {
        Ok(self.clone())
    }
}

#[async_trait]
impl<F> Processor for F
where
    F: Fn(&mut Context, &Actor) -> Result<(), CapabilityError> + Send + Sync,
{
    async fn process(&self, ctx: &mut Context, actor: &Actor) -> Result<(), CapabilityError> {
        self(ctx, actor)
    }
}
