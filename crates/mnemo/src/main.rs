// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mnemo - long-term conversational memory.
//!
//! This is the binary entry point. Each subcommand opens the configured
//! SQLite database, wires the OpenAI-compatible oracles, and performs one
//! memory operation for an owner and thread.

mod runtime;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use mnemo_config::MnemoConfig;
use mnemo_core::MnemoError;

/// How long a command waits for background consolidation before exiting.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// Mnemo - long-term conversational memory.
#[derive(Parser, Debug)]
#[command(name = "mnemo", version, about, long_about = None)]
struct Cli {
    /// Configuration file. Defaults to the standard search locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Identifies one conversation.
#[derive(clap::Args, Debug)]
struct Conversation {
    /// Owner of the memories (the end user).
    #[arg(long)]
    owner: String,
    /// Conversation thread.
    #[arg(long)]
    thread: String,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Log one user/assistant exchange and consolidate if a flush is due.
    Turn {
        #[command(flatten)]
        conversation: Conversation,
        /// The user's message.
        #[arg(long)]
        user: String,
        /// The assistant's reply.
        #[arg(long)]
        assistant: String,
    },
    /// End a conversation, consolidating every outstanding exchange.
    End {
        #[command(flatten)]
        conversation: Conversation,
    },
    /// Print memories relevant to a query.
    Recall {
        #[arg(long)]
        owner: String,
        /// Restrict to one thread; all of the owner's threads by default.
        #[arg(long)]
        thread: Option<String>,
        query: String,
    },
    /// Print the thread's most recent exchanges.
    Recent {
        #[command(flatten)]
        conversation: Conversation,
    },
    /// Print the effective configuration.
    Config,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => mnemo_config::load_and_validate_path(path),
        None => mnemo_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            mnemo_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.agent.log_level);

    match run(cli.command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Option<Commands>, config: MnemoConfig) -> Result<(), MnemoError> {
    match command {
        Some(Commands::Turn {
            conversation,
            user,
            assistant,
        }) => {
            let session = runtime::open_session(&config, &conversation.owner, &conversation.thread)
                .await?;
            session.on_turn_complete(&user, &assistant).await?;
            if !session.shutdown(SHUTDOWN_TIMEOUT).await {
                eprintln!("warning: consolidation still running; exchanges stay pending");
            }
        }
        Some(Commands::End { conversation }) => {
            let session = runtime::open_session(&config, &conversation.owner, &conversation.thread)
                .await?;
            let outcome = session.on_conversation_end().await?;
            println!("{}", runtime::describe_outcome(&outcome));
        }
        Some(Commands::Recall {
            owner,
            thread,
            query,
        }) => {
            // Retrieval never touches the thread's log, so any id will do.
            let session =
                runtime::open_session(&config, &owner, thread.as_deref().unwrap_or("")).await?;
            let context = session.retrieve_context(&query, thread.as_deref()).await;
            if context.is_empty() {
                println!("no relevant memories");
            } else {
                println!("{context}");
            }
        }
        Some(Commands::Recent { conversation }) => {
            let session = runtime::open_session(&config, &conversation.owner, &conversation.thread)
                .await?;
            for message in session.recent_exchanges().await? {
                println!("[{}] {}: {}", message.created_at, message.role, message.content);
            }
        }
        Some(Commands::Config) => {
            print!("{}", runtime::render_config(&config)?);
        }
        None => {
            println!("mnemo: use --help for available commands");
        }
    }
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("mnemo={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn recall_thread_is_optional() {
        let cli = Cli::try_parse_from(["mnemo", "recall", "--owner", "alice", "green tea"]).unwrap();
        match cli.command {
            Some(Commands::Recall {
                owner,
                thread,
                query,
            }) => {
                assert_eq!(owner, "alice");
                assert!(thread.is_none());
                assert_eq!(query, "green tea");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn turn_requires_both_messages() {
        assert!(
            Cli::try_parse_from(["mnemo", "turn", "--owner", "a", "--thread", "t", "--user", "hi"])
                .is_err()
        );
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config = mnemo_config::load_and_validate_str("").expect("default config should be valid");
        assert_eq!(config.agent.log_level, "info");
    }
}
