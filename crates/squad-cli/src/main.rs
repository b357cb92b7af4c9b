use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod prompt;
mod session;

use commands::panel::PanelCommand;
use squad::agents::setup::SquadSettings;
use squad::panel::{PanelConfig, ServerAction};

#[derive(Parser)]
#[command(author, version, about = "Talk to a squad of routed agents", long_about = None)]
struct Cli {
    /// User id sent along with every request (defaults to $USER)
    #[arg(long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start or resume an interactive chat session
    Session {
        /// Send every message to this agent instead of routing by topic
        #[arg(short, long)]
        agent: Option<String>,

        /// Wait for complete answers instead of streaming them
        #[arg(long)]
        no_stream: bool,

        /// Session name; an existing session with this name is resumed
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Answer a single message and exit
    Run {
        text: String,

        #[arg(short, long)]
        agent: Option<String>,

        #[arg(long)]
        no_stream: bool,
    },

    /// List the registered agents
    Agents,

    /// Query the NeonPanel API directly
    Panel {
        #[command(subcommand)]
        command: PanelSubcommand,
    },

    /// Print a saved session as JSON or as a text transcript
    Export {
        /// Session file written by `squad session`
        file: PathBuf,

        /// Plain-text transcript instead of JSON
        #[arg(long)]
        text: bool,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum PanelSubcommand {
    /// Aggregate server statistics
    Stats,
    /// Account record of a user
    User { user_id: String },
    /// Search panel resources by name
    Search { query: String },
    /// Start, stop, restart or query a server
    Action {
        server_id: String,
        action: ServerAction,
    },
}

impl From<PanelSubcommand> for PanelCommand {
    fn from(command: PanelSubcommand) -> Self {
        match command {
            PanelSubcommand::Stats => PanelCommand::Stats,
            PanelSubcommand::User { user_id } => PanelCommand::User(user_id),
            PanelSubcommand::Search { query } => PanelCommand::Search(query),
            PanelSubcommand::Action { server_id, action } => {
                PanelCommand::Action { server_id, action }
            }
        }
    }
}

fn settings(no_stream: bool) -> SquadSettings {
    let mut settings = SquadSettings::from_env();
    settings.agent.streaming = !no_stream;
    settings
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let user_id = cli
        .user
        .or_else(|| std::env::var("USER").ok())
        .unwrap_or_else(|| "local".to_string());

    match cli.command {
        Command::Session {
            agent,
            no_stream,
            name,
        } => commands::session::execute(settings(no_stream), agent, name, &user_id).await,
        Command::Run {
            text,
            agent,
            no_stream,
        } => commands::run::execute(settings(no_stream), text, agent, &user_id).await,
        Command::Agents => commands::agents::execute(settings(false)).await,
        Command::Panel { command } => {
            commands::panel::execute(PanelConfig::from_env(), command.into()).await
        }
        Command::Export { file, text, output } => {
            commands::export::execute(file, text, output).await
        }
    }
}
