//! Line-oriented chat on the terminal

use std::error::Error;
use std::io::{self, Write};

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::info;

use crate::cli::build_pipeline;
use crate::core::config::Config;
use crate::core::message::Message;
use crate::core::pipeline::{ConversationPipeline, PipelineEvent};

const PROMPT: &str = "› ";
pub const WAITING_INDICATOR: &str = "…";
/// Return to column zero and erase the waiting indicator.
pub const CLEAR_LINE: &str = "\r\x1b[K";
const EXIT_COMMANDS: [&str; 2] = ["/quit", "/exit"];

pub async fn run_chat(config: Config) -> Result<(), Box<dyn Error>> {
    let (pipeline, events) = match build_pipeline(&config) {
        Ok(parts) => parts,
        Err(err) => {
            eprintln!("❌ {err}");
            std::process::exit(1);
        }
    };
    info!(route = ?config.chat.route, model = %config.chat.model, "chat session started");

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = io::stdout();
    run_session(&pipeline, events, stdin, &mut stdout).await?;
    Ok(())
}

/// Read lines from `input` until EOF or an exit command, submitting each one
/// and writing the reply to `out` before prompting again.
pub async fn run_session<R, W>(
    pipeline: &ConversationPipeline,
    mut events: UnboundedReceiver<PipelineEvent>,
    input: R,
    out: &mut W,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            break;
        };
        let line = line.trim();
        if EXIT_COMMANDS.contains(&line) {
            break;
        }
        if pipeline.submit(line).is_none() {
            continue;
        }
        render_turn(&mut events, out).await?;
    }
    Ok(())
}

/// Consume events up to the end of the current turn.
async fn render_turn<W: Write>(
    events: &mut UnboundedReceiver<PipelineEvent>,
    out: &mut W,
) -> io::Result<()> {
    while let Some(event) = events.recv().await {
        match event {
            PipelineEvent::AwaitingReply(true) => {
                write!(out, "{WAITING_INDICATOR}")?;
                out.flush()?;
            }
            PipelineEvent::AwaitingReply(false) => break,
            PipelineEvent::MessageAppended(message) if message.is_assistant() => {
                write!(out, "{CLEAR_LINE}")?;
                render_reply(&message, out)?;
            }
            PipelineEvent::MessageAppended(_) => {}
        }
    }
    Ok(())
}

fn render_reply<W: Write>(message: &Message, out: &mut W) -> io::Result<()> {
    for (index, paragraph) in message.paragraphs().enumerate() {
        if index > 0 {
            writeln!(out)?;
        }
        writeln!(out, "{paragraph}")?;
    }
    writeln!(out)
}
