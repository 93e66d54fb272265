//! Turn orchestrator: one `process()` call per user turn.
//!
//! The actor owns the immutable plot for a session group and drives a turn
//! end to end: validate the current label, run pre-transition processing
//! (local then global), resolve the winning transition, run post-transition
//! processing, invoke the winning node's responder, and commit the
//! request/response/label triple atomically.
//!
//! `process()` is synchronous logic over one exclusively-held context; the
//! plot is read-only shared state, so any number of concurrent calls over
//! *different* contexts are safe. Two concurrent calls against the same
//! context are a caller error and must be serialized by the caller.

use std::sync::Arc;

use tracing::debug;

use crate::capability::Response;
use crate::context::Context;
use crate::error::{ActorError, CapabilityError};
use crate::label::Label;
use crate::plot::Plot;
use crate::resolver;

/// Priority used for transitions that do not set one, unless overridden with
/// [`Actor::with_default_priority`].
pub const DEFAULT_PRIORITY: f64 = 1.0;

/// What to do when resolution yields no reachable target.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FallbackPolicy {
    /// Remain at the current label.
    #[default]
    Stay,
    /// Jump to a configured fallback label.
    ToLabel(Label),
    /// Propagate the resolution error to the caller.
    Raise,
}

/// The turn orchestrator. Holds the plot, the start label, the fallback
/// policy and the default transition priority.
pub struct Actor {
    plot: Arc<Plot>,
    start_label: Label,
    fallback: FallbackPolicy,
    default_priority: f64,
}

impl Actor {
    /// Creates an actor over a built plot. The start label is used whenever a
    /// context has no visited-label history yet; it must exist in the plot.
    pub fn new(plot: Plot, start_label: impl Into<Label>) -> Result<Self, ActorError> {
        let start_label = start_label.into();
        if !plot.contains(&start_label) {
            return Err(ActorError::UnknownLabel(start_label));
        }
        Ok(Self {
            plot: Arc::new(plot),
            start_label,
            fallback: FallbackPolicy::default(),
            default_priority: DEFAULT_PRIORITY,
        })
    }

    /// Sets the fallback policy. A `ToLabel` target must exist in the plot.
    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Result<Self, ActorError> {
        if let FallbackPolicy::ToLabel(label) = &fallback {
            if !self.plot.contains(label) {
                return Err(ActorError::UnknownLabel(label.clone()));
            }
        }
        self.fallback = fallback;
        Ok(self)
    }

    /// Sets the priority used by transitions that do not carry one.
    pub fn with_default_priority(mut self, priority: f64) -> Self {
        self.default_priority = priority;
        self
    }

    pub fn plot(&self) -> &Plot {
        &self.plot
    }

    pub fn start_label(&self) -> &Label {
        &self.start_label
    }

    /// The configured fallback label, when the policy is `ToLabel`.
    pub fn fallback_label(&self) -> Option<&Label> {
        match &self.fallback {
            FallbackPolicy::ToLabel(label) => Some(label),
            _ => None,
        }
    }

    pub fn default_priority(&self) -> f64 {
        self.default_priority
    }

    /// Runs one turn: appends the request, resolves the next label, runs the
    /// processing hooks and responder, and commits the triple.
    ///
    /// The winning response is returned and also appended to the context.
    /// On `UnknownLabel` at turn start nothing is committed; on a resolution
    /// failure under the `Raise` policy or a responder failure the turn's
    /// request entry is rolled back; processing failures retain the request
    /// and any mutations made earlier in the turn.
    pub async fn process(
        &self,
        ctx: &mut Context,
        request: impl Into<String>,
    ) -> Result<Response, ActorError> {
        let request = request.into();
        let current = ctx
            .last_label()
            .cloned()
            .unwrap_or_else(|| self.start_label.clone());
        if !self.plot.contains(&current) {
            return Err(ActorError::UnknownLabel(current));
        }
        debug!(context_id = %ctx.id, from = %current, request = %request, "turn started");

        ctx.add_request(request);

        self.run_processing(ctx, &current, Stage::Pre).await?;

        let winning = match resolver::resolve(&current, ctx, self).await {
            Ok(label) => label,
            Err(err) => match &self.fallback {
                FallbackPolicy::Stay => {
                    debug!(from = %current, error = %err, "falling back: stay");
                    current.clone()
                }
                FallbackPolicy::ToLabel(label) => {
                    debug!(from = %current, to = %label, error = %err, "falling back to label");
                    label.clone()
                }
                FallbackPolicy::Raise => {
                    ctx.rollback_request();
                    return Err(err);
                }
            },
        };

        self.run_processing(ctx, &winning, Stage::Post).await?;

        let response = match self.plot.node(&winning).and_then(|n| n.responder()) {
            Some(responder) => match responder.respond(ctx, self).await {
                Ok(response) => response,
                Err(source) => {
                    ctx.rollback_request();
                    return Err(ActorError::Responder {
                        label: winning,
                        source,
                    });
                }
            },
            None => Response::default(),
        };

        ctx.add_response(response.clone());
        ctx.add_label(winning.clone());
        debug!(context_id = %ctx.id, to = %winning, response = %response, "turn committed");
        Ok(response)
    }

    /// Serialized-form turn API: normalizes `raw` (or starts a fresh context
    /// when `None`), runs one turn, and returns the updated serialized
    /// context alongside the response.
    pub async fn process_serialized(
        &self,
        raw: Option<&str>,
        request: &str,
    ) -> Result<(String, Response), ActorError> {
        let mut ctx = match raw {
            Some(raw) => Context::from_json(raw)?,
            None => Context::new(),
        };
        let response = self.process(&mut ctx, request).await?;
        Ok((ctx.to_json()?, response))
    }

    /// Runs the local hooks of the node at `label`, then the global node's
    /// hooks, for the given stage.
    async fn run_processing(
        &self,
        ctx: &mut Context,
        label: &Label,
        stage: Stage,
    ) -> Result<(), ActorError> {
        let local = self.plot.node(label);
        let global = self.plot.global_node();
        let hooks = local
            .into_iter()
            .chain(global)
            .flat_map(|node| stage.hooks_of(node));
        for hook in hooks {
            hook.process(ctx, self)
                .await
                .map_err(|source| stage.error(label.clone(), source))?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy)]
enum Stage {
    Pre,
    Post,
}

impl Stage {
    fn hooks_of(self, node: &crate::plot::Node) -> std::slice::Iter<'_, Arc<dyn crate::capability::Processor>> {
        match self {
            Stage::Pre => node.pre_processing.iter(),
            Stage::Post => node.post_processing.iter(),
        }
    }

    fn error(self, label: Label, source: CapabilityError) -> ActorError {
        match self {
            Stage::Pre => ActorError::PreProcessing { label, source },
            Stage::Post => ActorError::PostProcessing { label, source },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{Responder, Response};
    use crate::conditions::{always_true, exact_match};
    use crate::plot::{Node, Plot};

    fn two_node_builder() -> crate::plot::PlotBuilder {
        let mut builder = Plot::builder();
        builder.node(
            "flow",
            "start",
            Node::new().transition(("flow", "next"), exact_match("go")),
        );
        builder.node(
            "flow",
            "next",
            Node::new().response(Response::from("moved")),
        );
        builder
    }

    /// **Scenario**: Actor construction rejects a start label absent from the plot.
    #[tokio::test]
    async fn new_rejects_unknown_start_label() {
        let result = Actor::new(two_node_builder().build().unwrap(), ("flow", "missing"));
        match result {
            Err(ActorError::UnknownLabel(label)) => {
                assert_eq!(label, Label::new("flow", "missing"));
            }
            _ => panic!("expected UnknownLabel"),
        }
    }

    /// **Scenario**: with_fallback rejects a ToLabel target absent from the plot.
    #[tokio::test]
    async fn with_fallback_rejects_unknown_label() {
        let actor = Actor::new(two_node_builder().build().unwrap(), ("flow", "start")).unwrap();
        let result = actor.with_fallback(FallbackPolicy::ToLabel(Label::new("flow", "missing")));
        assert!(matches!(result, Err(ActorError::UnknownLabel(_))));
    }

    /// **Scenario**: A successful turn grows all three logs by exactly one.
    #[tokio::test]
    async fn successful_turn_commits_one_triple() {
        let actor = Actor::new(two_node_builder().build().unwrap(), ("flow", "start")).unwrap();
        let mut ctx = Context::new();

        let response = actor.process(&mut ctx, "go").await.unwrap();
        assert_eq!(response.text, "moved");
        assert_eq!(ctx.requests.len(), 1);
        assert_eq!(ctx.responses.len(), 1);
        assert_eq!(ctx.labels.len(), 1);
        assert_eq!(ctx.last_label(), Some(&Label::new("flow", "next")));
    }

    /// **Scenario**: No predicate fires and policy is Stay: the turn
    /// commits with the current label repeated.
    #[tokio::test]
    async fn fallback_stay_remains_at_current_label() {
        let actor = Actor::new(two_node_builder().build().unwrap(), ("flow", "start")).unwrap();
        let mut ctx = Context::new();

        let response = actor.process(&mut ctx, "unrelated").await.unwrap();
        assert_eq!(response, Response::default(), "start node has no responder");
        assert_eq!(ctx.last_label(), Some(&Label::new("flow", "start")));
        assert_eq!(ctx.requests.len(), 1);
        assert_eq!(ctx.responses.len(), 1);
    }

    /// **Scenario**: With ToLabel, an unmatched turn lands on
    /// the configured fallback label.
    #[tokio::test]
    async fn fallback_to_label_jumps_there() {
        let mut builder = two_node_builder();
        builder.node(
            "flow",
            "fallback",
            Node::new().response(Response::from("Ooops")),
        );
        let actor = Actor::new(builder.build().unwrap(), ("flow", "start"))
            .unwrap()
            .with_fallback(FallbackPolicy::ToLabel(Label::new("flow", "fallback")))
            .unwrap();
        let mut ctx = Context::new();

        let response = actor.process(&mut ctx, "unrelated").await.unwrap();
        assert_eq!(response.text, "Ooops");
        assert_eq!(ctx.last_label(), Some(&Label::new("flow", "fallback")));
    }

    /// **Scenario**: With Raise, an unmatched turn propagates
    /// NoMatchingTransition and rolls the request back.
    #[tokio::test]
    async fn fallback_raise_propagates_and_rolls_back() {
        let actor = Actor::new(two_node_builder().build().unwrap(), ("flow", "start"))
            .unwrap()
            .with_fallback(FallbackPolicy::Raise)
            .unwrap();
        let mut ctx = Context::new();

        match actor.process(&mut ctx, "unrelated").await {
            Err(ActorError::NoMatchingTransition(label)) => {
                assert_eq!(label, Label::new("flow", "start"));
            }
            other => panic!("expected NoMatchingTransition, got {:?}", other),
        }
        assert!(ctx.requests.is_empty(), "request rolled back");
        assert!(ctx.responses.is_empty());
        assert!(ctx.labels.is_empty());
    }

    /// **Scenario**: A context whose last visited label is not in the plot
    /// fails with UnknownLabel and leaves all logs unchanged.
    #[tokio::test]
    async fn stale_context_label_fails_without_mutation() {
        let actor = Actor::new(two_node_builder().build().unwrap(), ("flow", "start")).unwrap();
        let mut ctx = Context::new();
        ctx.add_request("old");
        ctx.add_response(Response::from("old"));
        ctx.add_label(Label::new("flow", "retired"));

        match actor.process(&mut ctx, "go").await {
            Err(ActorError::UnknownLabel(label)) => {
                assert_eq!(label, Label::new("flow", "retired"));
            }
            other => panic!("expected UnknownLabel, got {:?}", other),
        }
        assert_eq!(ctx.requests.len(), 1);
        assert_eq!(ctx.responses.len(), 1);
        assert_eq!(ctx.labels.len(), 1);
    }

    /// **Scenario**: Pre-processing runs local hooks then global hooks, before
    /// resolution sees the context.
    #[tokio::test]
    async fn pre_processing_runs_local_then_global() {
        let push = |tag: &'static str| {
            move |ctx: &mut Context, _actor: &Actor| -> Result<(), CapabilityError> {
                let trail = ctx
                    .misc
                    .entry("trail")
                    .or_insert_with(|| serde_json::Value::Array(vec![]));
                trail
                    .as_array_mut()
                    .ok_or_else(|| CapabilityError::new("trail is not an array"))?
                    .push(serde_json::Value::from(tag));
                Ok(())
            }
        };
        let mut builder = Plot::builder();
        builder.global(Node::new().pre_processing(push("global")));
        builder.node(
            "flow",
            "start",
            Node::new()
                .pre_processing(push("local"))
                .transition(("flow", "start"), always_true()),
        );
        let actor = Actor::new(builder.build().unwrap(), ("flow", "start")).unwrap();
        let mut ctx = Context::new();

        actor.process(&mut ctx, "x").await.unwrap();
        assert_eq!(
            ctx.misc.get("trail").unwrap(),
            &serde_json::json!(["local", "global"])
        );
    }

    /// **Scenario**: A failing pre-processor aborts the turn with PreProcessing;
    /// the request entry and earlier mutations remain.
    #[tokio::test]
    async fn failing_pre_processor_aborts_and_retains_mutations() {
        let mark = |ctx: &mut Context, _actor: &Actor| -> Result<(), CapabilityError> {
            ctx.misc.insert("seen".into(), serde_json::Value::Bool(true));
            Ok(())
        };
        let boom = |_ctx: &mut Context, _actor: &Actor| -> Result<(), CapabilityError> {
            Err(CapabilityError::new("slot service down"))
        };
        let mut builder = Plot::builder();
        builder.node(
            "flow",
            "start",
            Node::new()
                .pre_processing(mark)
                .pre_processing(boom)
                .transition(("flow", "start"), always_true()),
        );
        let actor = Actor::new(builder.build().unwrap(), ("flow", "start")).unwrap();
        let mut ctx = Context::new();

        match actor.process(&mut ctx, "x").await {
            Err(ActorError::PreProcessing { label, source }) => {
                assert_eq!(label, Label::new("flow", "start"));
                assert!(source.to_string().contains("slot service down"));
            }
            other => panic!("expected PreProcessing, got {:?}", other),
        }
        assert_eq!(ctx.requests.len(), 1, "request retained");
        assert!(ctx.responses.is_empty());
        assert!(ctx.labels.is_empty());
        assert_eq!(ctx.misc.get("seen"), Some(&serde_json::Value::Bool(true)));
    }

    /// **Scenario**: Post-processing failures are tagged with the winning label.
    #[tokio::test]
    async fn failing_post_processor_names_winning_label() {
        let boom = |_ctx: &mut Context, _actor: &Actor| -> Result<(), CapabilityError> {
            Err(CapabilityError::new("late failure"))
        };
        let mut builder = Plot::builder();
        builder.node(
            "flow",
            "start",
            Node::new().transition(("flow", "next"), always_true()),
        );
        builder.node("flow", "next", Node::new().post_processing(boom));
        let actor = Actor::new(builder.build().unwrap(), ("flow", "start")).unwrap();
        let mut ctx = Context::new();

        match actor.process(&mut ctx, "x").await {
            Err(ActorError::PostProcessing { label, .. }) => {
                assert_eq!(label, Label::new("flow", "next"));
            }
            other => panic!("expected PostProcessing, got {:?}", other),
        }
    }

    struct FailingResponder;

    #[async_trait::async_trait]
    impl Responder for FailingResponder {
        async fn respond(&self, _ctx: &Context, _actor: &Actor) -> Result<Response, CapabilityError> {
            Err(CapabilityError::new("template broken"))
        }
    }

    /// **Scenario**: A failing responder aborts after resolution: the label does
    /// not advance and the request is rolled back, keeping the triple balanced.
    #[tokio::test]
    async fn failing_responder_does_not_advance_label() {
        let mut builder = Plot::builder();
        builder.node(
            "flow",
            "start",
            Node::new().transition(("flow", "next"), always_true()),
        );
        builder.node("flow", "next", Node::new().response(FailingResponder));
        let actor = Actor::new(builder.build().unwrap(), ("flow", "start")).unwrap();
        let mut ctx = Context::new();

        match actor.process(&mut ctx, "x").await {
            Err(ActorError::Responder { label, .. }) => {
                assert_eq!(label, Label::new("flow", "next"));
            }
            other => panic!("expected Responder error, got {:?}", other),
        }
        assert!(ctx.labels.is_empty(), "label must not advance");
        assert!(ctx.requests.is_empty(), "request rolled back");
        assert!(ctx.responses.is_empty());
    }

    /// **Scenario**: process_serialized round-trips a context across turns.
    #[tokio::test]
    async fn process_serialized_round_trips() {
        let actor = Actor::new(two_node_builder().build().unwrap(), ("flow", "start")).unwrap();

        let (json, response) = actor.process_serialized(None, "go").await.unwrap();
        assert_eq!(response.text, "moved");

        let restored = Context::from_json(&json).unwrap();
        assert_eq!(restored.last_label(), Some(&Label::new("flow", "next")));
        assert_eq!(restored.turns(), 1);
    }

    /// **Scenario**: process_serialized surfaces a malformed context as a Context error.
    #[tokio::test]
    async fn process_serialized_rejects_bad_json() {
        let actor = Actor::new(two_node_builder().build().unwrap(), ("flow", "start")).unwrap();
        let result = actor.process_serialized(Some("{ nope"), "go").await;
        assert!(matches!(result, Err(ActorError::Context(_))));
    }
}
