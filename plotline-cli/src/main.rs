//! Interactive dialogue REPL over the built-in demo plot.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use plotline_cli::{demo_actor, interactive, load_context, save_context};

#[derive(Parser, Debug)]
#[command(name = "plotline", about = "Interactive dialogue REPL over the demo plot")]
struct Args {
    /// Context snapshot file; the session is resumed from it and saved back on exit.
    #[arg(short, long)]
    context: Option<PathBuf>,

    /// Enable debug logging for the engine.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "plotline=debug"
    } else {
        "plotline=warn"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let actor = match demo_actor() {
        Ok(actor) => actor,
        Err(err) => {
            eprintln!("failed to build the demo plot: {}", err);
            process::exit(1);
        }
    };

    let mut ctx = match args.context.as_deref().map(load_context) {
        Some(Ok(ctx)) => ctx,
        Some(Err(err)) => {
            eprintln!("failed to load the context: {}", err);
            process::exit(1);
        }
        None => plotline::Context::new(),
    };

    println!("plotline demo, /quit to exit");
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    if let Err(err) = interactive(&actor, &mut ctx, stdin.lock(), &mut stdout).await {
        eprintln!("io error: {}", err);
        process::exit(1);
    }

    if let Some(path) = args.context.as_deref() {
        if let Err(err) = save_context(path, &ctx) {
            eprintln!("failed to save the context: {}", err);
            process::exit(1);
        }
    }
}
