//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod chat;
pub mod say;


use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::cli::chat::run_chat;
use crate::cli::say::run_say;
use crate::core::canned::CannedReplyTable;
use crate::core::config::data::path_display;
use crate::core::config::Config;
use crate::core::pipeline::{CompletionSettings, ConversationPipeline, PipelineEvent};
use crate::core::transport::HttpTransport;
use crate::relay::server::startup;
use crate::utils::logging;

#[derive(Parser)]
#[command(name = "liaoyu")]
#[command(version)]
#[command(about = "A gentle chat companion and the relay that carries its requests")]
#[command(
    long_about = "Liaoyu answers a few greetings from a built-in table and sends everything \
else to a hosted chat-completion model, either through the bundled relay or directly.\n\n\
Configuration:\n\
  Settings are read from config.toml in the platform config directory, or from the \
file given with --config. Run 'liaoyu config init' to write the defaults.\n\n\
Environment Variables:\n\
  LIAOYU_API_KEY    Provider API key for the direct route\n\
  RUST_LOG          Log filter for diagnostics on stderr (default: info)"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Read configuration from this file instead of the default location
    #[arg(short = 'c', long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the relay server
    Serve {
        /// Address to bind (overrides [relay] host)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind (overrides [relay] port)
        #[arg(short = 'p', long)]
        port: Option<u16>,
    },
    /// Start a conversation on the terminal (default)
    Chat,
    /// Send a single message and print the reply
    Say {
        /// Message text (can be multiple words)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the configuration file path
    Path,
    /// Print the effective configuration
    Show,
    /// Write the default configuration
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    logging::init(logging::DEFAULT_FILTER);
    let args = Args::parse();

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Serve { host, port } => {
            let mut config = load_or_exit(args.config.as_deref());
            if let Some(host) = host {
                config.relay.host = host;
            }
            if let Some(port) = port {
                config.relay.port = port;
            }
            actix_web::rt::System::new().block_on(startup(config.relay))?;
            Ok(())
        }
        Commands::Chat => {
            let config = load_or_exit(args.config.as_deref());
            tokio::runtime::Runtime::new()?.block_on(run_chat(config))
        }
        Commands::Say { prompt } => {
            let config = load_or_exit(args.config.as_deref());
            tokio::runtime::Runtime::new()?.block_on(run_say(config, prompt))
        }
        Commands::Config { command } => run_config_command(args.config.as_deref(), command),
    }
}

fn load_or_exit(path: Option<&Path>) -> Config {
    match Config::load(path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("❌ {err}");
            std::process::exit(1);
        }
    }
}

fn run_config_command(path: Option<&Path>, command: ConfigCommands) -> Result<(), Box<dyn Error>> {
    let config_path = match path {
        Some(path) => path.to_path_buf(),
        None => Config::get_config_path()?,
    };

    match command {
        ConfigCommands::Path => {
            println!("{}", path_display(&config_path));
        }
        ConfigCommands::Show => {
            let config = load_or_exit(Some(config_path.as_path()));
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigCommands::Init { force } => {
            if config_path.exists() && !force {
                eprintln!(
                    "❌ {} already exists (use --force to overwrite)",
                    path_display(&config_path)
                );
                std::process::exit(1);
            }
            Config::default().save_to_path(&config_path)?;
            println!("✅ Wrote default configuration to {}", path_display(&config_path));
        }
    }
    Ok(())
}

/// Wire a pipeline from configuration: built-in canned replies overlaid with
/// the configured ones, and the transport for the configured route.
pub fn build_pipeline(
    config: &Config,
) -> Result<(ConversationPipeline, UnboundedReceiver<PipelineEvent>), Box<dyn Error>> {
    let replies =
        CannedReplyTable::builtin()?.with_overrides(config.canned_replies.clone());
    let transport = HttpTransport::from_config(&config.chat)?;
    Ok(ConversationPipeline::new(
        Arc::new(transport),
        Arc::new(replies),
        CompletionSettings::from_config(&config.chat),
    ))
}
