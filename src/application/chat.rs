//! # Interactive Loop
//!
//! Reads one line at a time, runs a completion cycle per line and prints the
//! answer. The session is released exactly once when the loop ends, whichever
//! way it ends.

use std::io::Write;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{error, info};

use crate::application::context::ChatContext;
use crate::application::cycle::run_cycle;
use crate::strings::messages;

/// What a line of input asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Turn {
    Exit,
    Skip,
    Query(String),
}

impl Turn {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            Turn::Skip
        } else if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
            Turn::Exit
        } else {
            Turn::Query(trimmed.to_string())
        }
    }
}

/// Run the loop, then release the session.
///
/// The loop's own error, if any, wins over a release error.
pub async fn run<R, W>(
    mut ctx: ChatContext,
    input: R,
    output: &mut W,
    continue_on_error: bool,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let outcome = chat_loop(&mut ctx, input, output, continue_on_error).await;

    info!("releasing tool session");
    let released = ctx.session.close().await;

    outcome?;
    released?;
    Ok(())
}

async fn chat_loop<R, W>(
    ctx: &mut ChatContext,
    input: R,
    output: &mut W,
    continue_on_error: bool,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();

    loop {
        write!(output, "{}", messages::PROMPT)?;
        output.flush()?;

        // End of input behaves like the exit sentinel.
        let Some(line) = lines.next_line().await? else {
            writeln!(output)?;
            break;
        };

        let query = match Turn::parse(&line) {
            Turn::Exit => break,
            Turn::Skip => continue,
            Turn::Query(query) => query,
        };

        match run_cycle(ctx, &query).await {
            Ok(answer) => writeln!(output, "{}", messages::assistant_answer(&answer))?,
            Err(e) if continue_on_error => {
                error!("Turn failed: {}", e);
                writeln!(output, "{}", messages::turn_failed(&e.to_string()))?;
            }
            Err(e) => return Err(e.into()),
        }
    }

    writeln!(output, "{}", messages::GOODBYE)?;
    Ok(())
}
