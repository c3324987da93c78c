use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ed-journal-to-sqlite")]
#[command(version, about = "Normalize Elite Dangerous journal logs into a SQLite database")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import every journal log under a directory, then an optional
    /// market snapshot
    Sync {
        /// Directory containing Journal.*.log files
        journal_dir: PathBuf,

        /// Output SQLite database path
        output_db: PathBuf,

        /// Market snapshot file (Market.json) to ingest after the logs
        #[arg(short, long)]
        market: Option<PathBuf>,
    },

    /// Import specific journal files, in the given order
    Import {
        /// Output SQLite database path
        output_db: PathBuf,

        /// Journal files to import
        files: Vec<PathBuf>,
    },

    /// Ingest one market snapshot file
    Market {
        /// Output SQLite database path
        output_db: PathBuf,

        /// Market snapshot file (Market.json)
        file: PathBuf,
    },

    /// List all entity table names
    ListTables,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
