use crate::config::toml_config::AppConfig;
use crate::core::export::ExportFormat;
use crate::domain::model::RowId;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "sheet-checklist")]
#[command(about = "Walk a checklist built from a published Google Sheets CSV link")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the stored sheet data (overrides the config file)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    /// Configuration file values with command line overrides applied.
    pub fn app_config(&self) -> Result<AppConfig> {
        let mut config = AppConfig::load(self.config.as_deref())?;
        if let Some(data_dir) = &self.data_dir {
            config.storage.data_dir = data_dir.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Check a published CSV link and load its rows
    Load { link: String },

    /// List the columns of the loaded sheet
    Columns,

    /// Choose the name column(s) and the columns to keep
    Map {
        /// Column holding the full name
        #[arg(long)]
        name: Option<String>,

        /// Build the name from separate first and last name columns
        #[arg(long)]
        split: bool,

        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,

        /// Extra columns to keep, comma separated
        #[arg(long, value_delimiter = ',')]
        keep: Vec<String>,
    },

    /// Show the first mapped rows, or one row in detail
    Preview {
        #[arg(long)]
        rows: Option<usize>,

        #[arg(long)]
        row: Option<RowId>,
    },

    /// Show the checklist, optionally filtered
    List {
        #[arg(short, long, default_value = "")]
        query: String,

        #[arg(long)]
        unchecked_only: bool,
    },

    /// Show every kept field of one row
    Show { row_id: RowId },

    /// Check or uncheck a row
    Toggle { row_id: RowId },

    /// Write the checklist as CSV, TSV or JSON
    Export {
        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Erase all stored data
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Show what is stored and where the flow stands
    Status,
}
