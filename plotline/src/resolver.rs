//! Transition resolution: pick exactly one next label per turn.
//!
//! The candidate set is the current node's local transitions followed by the
//! global pseudo-node's transitions. Candidates are ordered by priority
//! descending with a stable sort, so authored order breaks ties and local
//! candidates beat global ones of equal priority. Predicates are evaluated
//! strictly in that order and evaluation stops at the first `true`, so at
//! most one matching predicate's side effects occur.
//!
//! Re-running with identical inputs and side-effect-free predicates yields
//! the identical label.

use tracing::{error, trace};

use crate::actor::Actor;
use crate::context::Context;
use crate::error::ActorError;
use crate::label::Label;
use crate::plot::{Target, Transition};

/// Resolves the winning transition from `current`.
///
/// Fails with `UnknownLabel` when `current` or the winning target does not
/// exist in the plot, and with `NoMatchingTransition` when no predicate
/// fires. The caller (the actor) applies the fallback policy; this function
/// has no fallback of its own.
pub async fn resolve(current: &Label, ctx: &Context, actor: &Actor) -> Result<Label, ActorError> {
    let plot = actor.plot();
    let node = plot
        .node(current)
        .ok_or_else(|| ActorError::UnknownLabel(current.clone()))?;

    let default = actor.default_priority();
    let mut candidates: Vec<&Transition> = node
        .transitions()
        .iter()
        .chain(plot.global_transitions().iter())
        .collect();
    // Stable sort: authored order survives among equal priorities, and local
    // transitions were chained in before global ones.
    candidates.sort_by(|a, b| b.priority_or(default).total_cmp(&a.priority_or(default)));

    for transition in candidates {
        let fired = match transition.condition.evaluate(ctx, actor).await {
            Ok(fired) => fired,
            Err(err) => {
                // A failing predicate counts as false; resolution goes on.
                error!(from = %current, error = %err, "condition failed, treated as false");
                false
            }
        };
        if !fired {
            continue;
        }
        let target = match &transition.target {
            Target::Label(label) => Some(label.clone()),
            Target::Dynamic(dynamic) => dynamic.resolve(ctx, actor).await,
        };
        match target {
            Some(label) if plot.contains(&label) => {
                trace!(from = %current, to = %label, "transition matched");
                return Ok(label);
            }
            Some(label) => return Err(ActorError::UnknownLabel(label)),
            // Dynamic target declined; keep going.
            None => continue,
        }
    }

    Err(ActorError::NoMatchingTransition(current.clone()))
}
