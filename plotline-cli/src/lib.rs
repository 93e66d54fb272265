//! Library part of the demo CLI: the built-in demo plot and the REPL helpers
//! used by the `plotline` binary.

pub mod demo;
pub mod run;

pub use demo::demo_actor;
pub use run::{interactive, load_context, save_context};
