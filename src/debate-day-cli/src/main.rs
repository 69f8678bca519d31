//! Debate Day CLI
//!
//! A command-line tool for starting, watching, and participating in
//! coordinated multi-agent debates over the Debate Day HTTP API.

mod agent;
mod client;
mod config;
mod generator;
mod prompt;
mod render;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use debate_day_core::{Role, SessionStatus};

use crate::client::ApiClient;
use crate::config::AgentConfig;
use crate::generator::OpenAiGenerator;

#[derive(Parser)]
#[command(
    name = "debate-day",
    version,
    about = "Coordinated AI debates - start, watch, and participate",
    long_about = "A CLI for the Debate Day coordination server: create debates, \
        follow transcripts live, and run AI participants over OpenAI-compatible APIs."
)]
struct Cli {
    /// Coordination server base URL
    #[arg(long, global = true, default_value = "http://127.0.0.1:8000")]
    server: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new debate
    Start {
        /// The topic to debate
        #[arg(value_name = "TOPIC")]
        topic: String,

        /// Number of rebuttal rounds after the openings
        #[arg(short, long, default_value = "1")]
        rounds: u32,

        /// Explicit debate id (generated when omitted)
        #[arg(long, value_name = "ID")]
        id: Option<String>,

        /// Follow the transcript live after creating
        #[arg(long)]
        watch: bool,
    },

    /// Print the transcript of a debate
    View {
        #[arg(value_name = "DEBATE_ID")]
        debate_id: String,
    },

    /// Follow a debate live until it finishes
    Watch {
        #[arg(value_name = "DEBATE_ID")]
        debate_id: String,

        /// Seconds between polls
        #[arg(long, default_value = "2")]
        interval: u64,
    },

    /// List known debates
    List,

    /// Run an AI participant for one side of a debate
    Agent {
        #[arg(value_name = "DEBATE_ID")]
        debate_id: String,

        /// Side to argue: pro, con, or mod
        #[arg(long, value_name = "ROLE")]
        role: String,

        /// Display name for this participant
        #[arg(long, value_name = "NAME")]
        name: Option<String>,

        /// Model override (defaults to config / DEBATE_MODEL)
        #[arg(short, long, value_name = "MODEL")]
        model: Option<String>,

        /// Path to a TOML config file
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();
    let client = ApiClient::new(&cli.server);

    match cli.command {
        Command::Start {
            topic,
            rounds,
            id,
            watch,
        } => {
            let session = client.start_debate(&topic, rounds, id.as_deref()).await?;
            println!(
                "{} {} ({} rebuttal {})",
                "Debate created:".bold(),
                session.debate_id.bright_cyan(),
                session.rounds,
                if session.rounds == 1 { "round" } else { "rounds" }
            );
            println!("{} {}", "Topic:".bold(), session.topic.bright_white());
            if watch {
                watch_loop(&client, &session.debate_id, Duration::from_secs(2)).await?;
            }
        }

        Command::View { debate_id } => {
            let snapshot = client.transcript(&debate_id).await?;
            for msg in &snapshot.messages {
                render::print_message(msg);
            }
            if snapshot.session.status == SessionStatus::Finished {
                render::print_result(&snapshot.session);
            }
        }

        Command::Watch {
            debate_id,
            interval,
        } => {
            watch_loop(&client, &debate_id, Duration::from_secs(interval.max(1))).await?;
        }

        Command::List => {
            let debates = client.list_debates().await?;
            if debates.is_empty() {
                println!("No debates yet.");
            }
            for summary in debates {
                let status = match summary.status {
                    SessionStatus::Finished => format!("{:?}", summary.status).green(),
                    SessionStatus::Error => format!("{:?}", summary.status).red(),
                    _ => format!("{:?}", summary.status).yellow(),
                };
                println!(
                    "{}  [{}]  {}",
                    summary.debate_id.bright_cyan(),
                    status,
                    summary.topic
                );
            }
        }

        Command::Agent {
            debate_id,
            role,
            name,
            model,
            config,
        } => {
            let role = Role::parse(&role)
                .ok_or_else(|| format!("unknown role '{role}' (expected pro, con, or mod)"))?;
            let mut agent_config = AgentConfig::load(config.as_deref())?;
            if let Some(model) = model {
                agent_config.model = model;
            }
            if agent_config.api_key.is_empty() {
                eprintln!(
                    "{}",
                    "Warning: no API key configured. API calls may fail.".yellow()
                );
            }

            let name = name.unwrap_or_else(|| default_name(role).to_string());
            let generator = OpenAiGenerator::new(
                &agent_config.model,
                &agent_config.api_base,
                &agent_config.api_key,
                agent_config.max_tokens,
            );
            let opts = agent::AgentOpts {
                debate_id,
                role,
                name,
            };
            agent::run(
                &client,
                &generator,
                &opts,
                Duration::from_secs(agent_config.poll_interval_secs.max(1)),
            )
            .await;
        }
    }

    Ok(())
}

fn default_name(role: Role) -> &'static str {
    match role {
        Role::Pro => "Ava",
        Role::Con => "Ben",
        Role::Mod => "Max",
    }
}

/// Poll the transcript and print messages as they land, until the
/// debate finishes.
async fn watch_loop(
    client: &ApiClient,
    debate_id: &str,
    interval: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut seen = 0;
    loop {
        let snapshot = client.transcript(debate_id).await?;
        for msg in &snapshot.messages[seen..] {
            render::print_message(msg);
        }
        seen = snapshot.messages.len();

        if snapshot.session.status == SessionStatus::Finished {
            render::print_result(&snapshot.session);
            return Ok(());
        }
        tokio::time::sleep(interval).await;
    }
}
