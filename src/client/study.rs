//! Terminal study session
//!
//! Drives an [`Orchestrator`] from stdin: the file's text is submitted once,
//! then single-letter commands browse the resulting cards.

use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use super::api::GenerateApi;
use super::orchestrator::{ClientState, Orchestrator, SubmitOutcome};
use crate::error::AppResult;

const HELP: &str = "Commands: [n]ext  [p]revious  [f]lip  [g]enerate again  [r]eset  [q]uit";

/// A parsed terminal command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Next,
    Previous,
    Flip,
    Generate,
    Reset,
    Quit,
    Help,
}

impl Command {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "n" | "next" => Some(Command::Next),
            "p" | "prev" | "previous" => Some(Command::Previous),
            "f" | "flip" => Some(Command::Flip),
            "g" | "generate" => Some(Command::Generate),
            "r" | "reset" => Some(Command::Reset),
            "q" | "quit" | "exit" => Some(Command::Quit),
            "h" | "help" | "?" => Some(Command::Help),
            _ => None,
        }
    }
}

async fn show_card<A: GenerateApi, W: AsyncWrite + Unpin>(
    orchestrator: &Orchestrator<A>,
    out: &mut W,
    flipped: bool,
) -> AppResult<()> {
    let (ClientState::Browsing { index, total }, Some(card)) =
        (orchestrator.state(), orchestrator.current_card())
    else {
        out.write_all(b"No cards yet.\n").await?;
        return Ok(());
    };

    let face = if flipped {
        format!("A: {}", card.back())
    } else {
        format!("Q: {}", card.front())
    };
    out.write_all(format!("\nCard {} of {}\n{}\n", index + 1, total, face).as_bytes())
        .await?;
    Ok(())
}

async fn submit<A: GenerateApi, W: AsyncWrite + Unpin>(
    orchestrator: &mut Orchestrator<A>,
    out: &mut W,
) -> AppResult<()> {
    out.write_all(b"Generating flashcards...\n").await?;
    match orchestrator.submit().await {
        SubmitOutcome::Loaded { cards } => {
            out.write_all(format!("Generated {} cards.\n", cards).as_bytes())
                .await?;
            show_card(orchestrator, out, false).await?;
        }
        SubmitOutcome::Rejected(err) | SubmitOutcome::Failed(err) => {
            out.write_all(format!("{}\n", err).as_bytes()).await?;
            if let Some(missing) = orchestrator.missing_chars() {
                out.write_all(
                    format!("Add at least {} more characters for better cards.\n", missing)
                        .as_bytes(),
                )
                .await?;
            }
        }
        SubmitOutcome::Ignored => {}
    }
    Ok(())
}

/// Run an interactive session over `input` and `out`
///
/// Returns when the user quits, resets, or input ends.
pub async fn run<A, R, W>(
    orchestrator: &mut Orchestrator<A>,
    text: &str,
    input: R,
    out: &mut W,
) -> AppResult<()>
where
    A: GenerateApi,
    R: tokio::io::AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    orchestrator.set_input(text);
    submit(orchestrator, out).await?;
    out.write_all(format!("{}\n", HELP).as_bytes()).await?;
    out.flush().await?;

    let mut lines = BufReader::new(input).lines();
    let mut flipped = false;

    while let Some(line) = lines.next_line().await? {
        let Some(command) = Command::parse(&line) else {
            out.write_all(format!("{}\n", HELP).as_bytes()).await?;
            out.flush().await?;
            continue;
        };

        match command {
            Command::Next => {
                if orchestrator.browsing().has_cards() && !orchestrator.browsing().can_next() {
                    out.write_all(b"Already at the last card.\n").await?;
                } else {
                    orchestrator.next();
                    flipped = false;
                    show_card(orchestrator, out, flipped).await?;
                }
            }
            Command::Previous => {
                if orchestrator.browsing().has_cards() && !orchestrator.browsing().can_previous() {
                    out.write_all(b"Already at the first card.\n").await?;
                } else {
                    orchestrator.previous();
                    flipped = false;
                    show_card(orchestrator, out, flipped).await?;
                }
            }
            Command::Flip => {
                flipped = !flipped;
                show_card(orchestrator, out, flipped).await?;
            }
            Command::Generate => {
                flipped = false;
                submit(orchestrator, out).await?;
            }
            Command::Reset => {
                orchestrator.reset();
                out.write_all(b"Cards cleared.\n").await?;
                out.flush().await?;
                return Ok(());
            }
            Command::Quit => break,
            Command::Help => out.write_all(format!("{}\n", HELP).as_bytes()).await?,
        }
        out.flush().await?;
    }

    Ok(())
}
