//! The REPL loop and context persistence for the `plotline` binary.

use std::error::Error;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use plotline::{Actor, Context};

/// Drives the actor over line-based input until EOF or `/quit`.
///
/// Blank lines are skipped. Failed turns print the error and keep the
/// session alive; the context is only advanced by successful turns.
pub async fn interactive<R, W>(
    actor: &Actor,
    ctx: &mut Context,
    input: R,
    output: &mut W,
) -> io::Result<()>
where
    R: BufRead,
    W: Write,
{
    for line in input.lines() {
        let line = line?;
        let request = line.trim();
        if request.is_empty() {
            continue;
        }
        if request == "/quit" {
            break;
        }
        match actor.process(ctx, request).await {
            Ok(response) => writeln!(output, "bot: {}", response)?,
            Err(err) => writeln!(output, "error: {}", err)?,
        }
    }
    Ok(())
}

/// Loads a context from a JSON file, or starts a fresh one if the file
/// does not exist yet.
pub fn load_context(path: &Path) -> Result<Context, Box<dyn Error>> {
    if !path.exists() {
        return Ok(Context::new());
    }
    let json = fs::read_to_string(path)?;
    Ok(Context::from_json(&json)?)
}

/// Writes the context to a JSON file, replacing any previous snapshot.
pub fn save_context(path: &Path, ctx: &Context) -> Result<(), Box<dyn Error>> {
    fs::write(path, ctx.to_json()?)?;
    Ok(())
}
