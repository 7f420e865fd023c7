use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod diff;
pub mod serve;
pub mod sessions;

#[derive(Subcommand)]
enum Command {
    /// Run the log viewer
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Set the server port
        #[arg(short, long, default_value = "8000")]
        port: String,

        /// Directory holding the thread_*.json session logs
        #[arg(long)]
        log_dir: Option<PathBuf>,
    },
    /// List logged sessions as JSON
    Sessions {
        /// Only sessions last active on this day (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        log_dir: Option<PathBuf>,
    },
    /// Print the turn-by-turn view of a session as JSON
    Diff {
        /// Path to a session log file or a session id
        session: String,

        #[arg(long)]
        log_dir: Option<PathBuf>,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();

    // Handle each sub command
    match args.command {
        Some(Command::Serve {
            host,
            port,
            log_dir,
        }) => {
            serve::run(host, port, log_dir).await?;
        }
        Some(Command::Sessions { date, log_dir }) => {
            sessions::run(date, log_dir).await?;
        }
        Some(Command::Diff { session, log_dir }) => {
            diff::run(session, log_dir).await?;
        }
        None => {}
    }

    Ok(())
}
