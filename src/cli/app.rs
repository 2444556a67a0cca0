//! Main CLI application structure

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use super::expense::{self, AddArgs, EditArgs, FilterArgs, ListArgs};
use super::logging;
use super::output::{Output, OutputFormat};
use crate::service::ExpenseService;
use crate::storage::{Config, JsonStore};

#[derive(Parser)]
#[command(name = "tracker")]
#[command(author, version, about = "Track personal expenses in a local JSON file")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Log at debug level
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Path of the expenses JSON file
    #[arg(long, global = true, env = "TRACKER_DATA_FILE")]
    pub data_file: Option<PathBuf>,

    /// Path of the log file
    #[arg(long, global = true, env = "TRACKER_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Config file to use instead of the user config
    #[arg(long, global = true, env = "TRACKER_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new expense
    Add(AddArgs),

    /// List expenses
    List(ListArgs),

    /// Edit an existing expense
    Edit(EditArgs),

    /// Delete an expense
    Delete {
        /// Expense ID to delete
        #[arg(long)]
        id: String,
    },

    /// Show spending totals
    Summary(FilterArgs),
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Add(_) => "add",
            Commands::List(_) => "list",
            Commands::Edit(_) => "edit",
            Commands::Delete { .. } => "delete",
            Commands::Summary(_) => "summary",
        }
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let cwd = std::env::current_dir().context("Failed to read current directory")?;

    let config = Config::load(&cwd, cli.config.as_deref())?.with_overrides(
        &cwd,
        cli.data_file.as_deref(),
        cli.log_file.as_deref(),
    );

    let level = if cli.verbose { "debug" } else { config.log_level.as_str() };
    let subscriber = logging::file_subscriber(&config.log_file, level)?;

    tracing::subscriber::with_default(subscriber, || {
        let command = cli.command.name();
        tracing::debug!(command, data_file = %config.data_file.display(), "running command");

        let result = execute(cli.command, Output::new(cli.format), &config);
        if let Err(e) = &result {
            tracing::error!(command, "{:#}", e);
        }
        result
    })
}

fn execute(command: Commands, output: Output, config: &Config) -> Result<()> {
    let service = ExpenseService::new(JsonStore::new(&config.data_file))
        .with_default_currency(config.default_currency.as_str());

    match command {
        Commands::Add(args) => expense::add(&service, &output, args),
        Commands::List(args) => expense::list(&service, &output, args),
        Commands::Edit(args) => expense::edit(&service, &output, args),
        Commands::Delete { id } => expense::delete(&service, &output, &id),
        Commands::Summary(args) => expense::summary(&service, &output, args),
    }
}
