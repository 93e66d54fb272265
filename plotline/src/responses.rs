//! Standard responders.

use async_trait::async_trait;
use rand::seq::SliceRandom;

use crate::actor::Actor;
use crate::capability::{Responder, Response};
use crate::context::Context;
use crate::error::CapabilityError;

/// Fixed text response. `Response` itself implements `Responder`, so this is
/// just the readable spelling for plot definitions.
pub fn text(text: impl Into<String>) -> Response {
    Response::new(text)
}

/// Responds with one of the variants, chosen at random per turn.
pub fn choice<I, T>(variants: I) -> Choice
where
    I: IntoIterator<Item = T>,
    T: Into<Response>,
{
    Choice {
        variants: variants.into_iter().map(Into::into).collect(),
    }
}

pub struct Choice {
    variants: Vec<Response>,
}

#[async_trait]
impl Responder for Choice {
    async fn respond(&self, _ctx: &Context, _actor: &Actor) -> Result<Response, CapabilityError> {
        self.variants
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or_else(|| CapabilityError::new("choice has no variants"))
    }
}
