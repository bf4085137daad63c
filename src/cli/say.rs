//! One-shot "say" command

use std::error::Error;

use crate::cli::build_pipeline;
use crate::core::config::Config;
use crate::core::message::Message;
use crate::core::pipeline::ConversationPipeline;

pub async fn run_say(config: Config, prompt: Vec<String>) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");
    if prompt.trim().is_empty() {
        eprintln!("Usage: liaoyu say <prompt>");
        std::process::exit(1);
    }

    // Only the reply handle is read here.
    let (pipeline, _) = match build_pipeline(&config) {
        Ok(parts) => parts,
        Err(err) => {
            eprintln!("❌ {err}");
            std::process::exit(1);
        }
    };

    let reply = say_once(&pipeline, &prompt).await?;
    println!("{}", reply.text);
    Ok(())
}

/// Submit `prompt` on a fresh pipeline and wait for the reply that closes
/// the turn.
pub async fn say_once(
    pipeline: &ConversationPipeline,
    prompt: &str,
) -> Result<Message, Box<dyn Error>> {
    let handle = pipeline
        .submit(prompt)
        .ok_or("message was empty or another reply is still pending")?;
    let reply = handle
        .reply()
        .await
        .ok_or("conversation closed before a reply arrived")?;
    Ok(reply)
}
