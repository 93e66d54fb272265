//! Built-in demo plot: a greeting flow, a small music flow, and a global
//! catch-all dropping unmatched input into a fallback node.

use std::error::Error;

use plotline::actor::FallbackPolicy;
use plotline::conditions::{always_true, exact_match, regexp};
use plotline::destinations::forward;
use plotline::error::CapabilityError;
use plotline::responses::text;
use plotline::{Actor, Context, Label, Node, Plot};

/// Post-transition hook on the greeting entry node: counts how often the
/// user has been greeted, in `misc["greetings"]`.
fn count_greetings(ctx: &mut Context, _actor: &Actor) -> Result<(), CapabilityError> {
    let n = ctx
        .misc
        .get("greetings")
        .and_then(|v| v.as_u64())
        .unwrap_or(0);
    ctx.misc
        .insert("greetings".into(), serde_json::Value::from(n + 1));
    Ok(())
}

/// Builds the demo actor: start at `root:start`, fall back to
/// `root:fallback` both via the low-priority global catch-all and via the
/// configured fallback policy.
pub fn demo_actor() -> Result<Actor, Box<dyn Error>> {
    let hi = || regexp(r"(?i)\b(hi|hello)\b");

    let mut plot = Plot::builder();
    plot.global(Node::new().transition_with_priority(
        ("root", "fallback"),
        always_true(),
        0.5,
    ));
    plot.node(
        "root",
        "start",
        Node::new()
            .transition(("music", "node1"), regexp("(?i)talk about music")?)
            .transition(("greeting", "node1"), hi()?),
    );
    plot.node(
        "root",
        "fallback",
        Node::new()
            .response(text("Ooops"))
            .transition(("greeting", "node1"), hi()?),
    );

    plot.node(
        "greeting",
        "node1",
        Node::new()
            .response(text("Hi, how are you?"))
            .post_processing(count_greetings)
            .transition(("greeting", "node2"), exact_match("i'm fine, how are you?")),
    );
    plot.node(
        "greeting",
        "node2",
        Node::new()
            .response(text("Good. What do you want to talk about?"))
            .transition(forward(), exact_match("Let's talk about music.")),
    );
    plot.node(
        "greeting",
        "node3",
        Node::new()
            .response(text("Sorry, I can not talk about music now."))
            .transition(("greeting", "node4"), exact_match("Ok, goodbye.")),
    );
    plot.node(
        "greeting",
        "node4",
        Node::new()
            .response(text("bye"))
            .transition(("greeting", "node1"), exact_match("Hi")),
    );

    plot.node(
        "music",
        "node1",
        Node::new().response(text("I like music. What genre of music do you like?")),
    );

    let actor = Actor::new(plot.build()?, ("root", "start"))?
        .with_fallback(FallbackPolicy::ToLabel(Label::new("root", "fallback")))?;
    Ok(actor)
}
