//! Interactive read-eval-print loop for the Pokedex
//!
//! Reads one command per line, dispatches it through the command table, and
//! prints results. Command failures are reported inline and never end the
//! loop; only `exit` or end of input does.

pub mod commands;
mod session;

pub use commands::{find_command, Command, CommandError, CommandKind, Flow, COMMANDS};
pub use session::Session;

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Prompt printed before each line of input
pub const PROMPT: &str = "Pokedex > ";

/// Splits a line into lowercase words, dropping surrounding whitespace
pub fn clean_input(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|word| word.to_lowercase())
        .collect()
}

/// Runs the REPL until `exit` or end of input
///
/// # Arguments
/// * `session` - State shared across commands
/// * `input` - Source of command lines (stdin in the binary)
/// * `out` - Sink for prompts and command output (stdout in the binary)
pub async fn run_repl<R, W>(session: &mut Session, input: R, out: &mut W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();

    loop {
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            break;
        };

        let words = clean_input(&line);
        let Some((name, args)) = words.split_first() else {
            continue;
        };

        let Some(command) = find_command(name) else {
            writeln!(out, "Unknown command: {}", name)?;
            continue;
        };

        match session.execute(command, args, out).await {
            Ok(Flow::Exit) => break,
            Ok(Flow::Continue) => {}
            Err(CommandError::Io(e)) => return Err(e),
            Err(e) => {
                tracing::warn!(command = command.name, error = %e, "command failed");
                writeln!(out, "Error: {}", e)?;
            }
        }
    }

    Ok(())
}
