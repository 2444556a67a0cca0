//! Output formatting for CLI commands

use std::io::{self, Write};

use anyhow::{Context, Result};
use serde::Serialize;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Output helper for consistent formatting
///
/// Handlers branch on [`Output::is_json`]: JSON mode prints records with
/// [`Output::data`], text mode uses [`Output::success`] and [`Output::text`].
pub struct Output {
    format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Prints a one-line confirmation
    pub fn success(&self, message: &str) {
        println!("{}", message);
    }

    /// Prints structured data as a single line of JSON
    pub fn data<T: Serialize>(&self, data: &T) -> Result<()> {
        let json = serde_json::to_string(data).context("Failed to serialize output")?;
        println!("{}", json);
        Ok(())
    }

    /// Prints a pre-rendered text block
    pub fn text(&self, block: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", block).context("Failed to write output")?;
        Ok(())
    }

    /// Returns true if using JSON format
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }
}
