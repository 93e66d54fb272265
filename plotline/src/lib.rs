//! # Plotline
//!
//! A dialogue-graph execution engine: conversation logic is authored as data
//! (flows, nodes, transitions, conditions) and executed turn by turn against
//! a per-session [`Context`]. On every turn the engine picks exactly one next
//! node by evaluating transition predicates in a deterministic priority
//! order, runs the node's processing hooks and responder, and commits the
//! request/response/label triple to the context atomically.
//!
//! ## Design Principles
//!
//! - **Graph as data**: a [`Plot`] is built once, is immutable afterwards,
//!   and is shared read-only across any number of sessions.
//! - **Context in, context out**: the caller owns one [`Context`] per
//!   session and lends it mutably to [`Actor::process`] for exactly one
//!   turn; the engine keeps no session state of its own.
//! - **Opaque capabilities**: conditions, responders and processors are
//!   trait objects supplied by the plot author; plain closures work too.
//! - **Deterministic resolution**: priority descending, authored order
//!   breaks ties, local transitions beat global ones, first match wins.
//!
//! ## Main Modules
//!
//! - [`plot`]: [`Plot`], [`PlotBuilder`], [`Node`], [`Target`] — author the graph.
//! - [`actor`]: [`Actor`], [`FallbackPolicy`] — run turns.
//! - [`resolver`]: the transition-resolution algorithm.
//! - [`conditions`] / [`destinations`] / [`responses`]: the standard
//!   capability library.
//!
//! ## Quick Start
//!
//! ```rust
//! use plotline::conditions::{always_true, exact_match};
//! use plotline::responses::text;
//! use plotline::{Actor, Context, Node, Plot};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut plot = Plot::builder();
//! plot.global(
//!     Node::new()
//!         .transition(("flow", "hi"), exact_match("Hi"))
//!         .transition(("flow", "ok"), always_true()),
//! );
//! plot.node("flow", "hi", Node::new().response(text("Hi!!!")));
//! plot.node("flow", "ok", Node::new().response(text("Okey")));
//!
//! let actor = Actor::new(plot.build()?, ("flow", "hi"))?;
//! let mut ctx = Context::new();
//!
//! let response = actor.process(&mut ctx, "Hi").await?;
//! assert_eq!(response.text, "Hi!!!");
//! # Ok(())
//! # }
//! ```

pub mod actor;
pub mod capability;
pub mod conditions;
pub mod context;
pub mod destinations;
pub mod error;
pub mod label;
pub mod plot;
pub mod resolver;
pub mod responses;

pub use actor::{Actor, FallbackPolicy, DEFAULT_PRIORITY};
pub use capability::{Condition, Processor, Responder, Response};
pub use context::{Context, ContextError};
pub use error::{ActorError, CapabilityError};
pub use label::Label;
pub use plot::{BuildError, DynamicTarget, Flow, Node, Plot, PlotBuilder, Target, Transition, GLOBAL};
pub use resolver::resolve;
