use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::logic::config::AppConfig;

/// Anomaly scoring CLI (library-facing definitions)
#[derive(Debug, Parser)]
#[command(name = "anomaly-scoring", version, about = "Score CSV records against anomaly-detection models")]
pub struct Cli {
    /// Directory holding model, scaler and threshold artifacts
    #[arg(long, global = true)]
    pub artifact_dir: Option<PathBuf>,
    /// JSON registry file replacing the stock model table
    #[arg(long, global = true)]
    pub registry: Option<PathBuf>,
    /// Keep loaded bundles in memory
    #[arg(long, global = true)]
    pub cache: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Score a CSV file and print the response
    Predict {
        #[arg(long)]
        model: String,
        #[arg(long)]
        input: PathBuf,
        /// Also write the scored table as CSV
        #[arg(long = "export-csv")]
        export_csv: Option<PathBuf>,
        #[arg(long)]
        pretty: bool,
    },
    /// Print the score distribution of a CSV file
    Summary {
        #[arg(long)]
        model: String,
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        pretty: bool,
    },
    /// List registered models
    Models,
}

impl Cli {
    /// Command-line flags win over environment values
    pub fn apply(&self, mut config: AppConfig) -> AppConfig {
        if let Some(dir) = &self.artifact_dir {
            config = config.with_artifact_dir(dir);
        }
        if let Some(path) = &self.registry {
            config = config.with_registry_path(path);
        }
        if self.cache {
            config = config.with_cache(true);
        }
        config
    }
}
