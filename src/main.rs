//! Anomaly Scoring - CLI entry point

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;

use anomaly_scoring::api::commands;
use anomaly_scoring::cli::{Cli, Commands};
use anomaly_scoring::constants::{APP_NAME, APP_VERSION};
use anomaly_scoring::logic::response::ScoreResponse;
use anomaly_scoring::{AppConfig, ModelRegistry, ScoringPipeline};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli.apply(AppConfig::from_env());

    log::info!("Starting {} v{}...", APP_NAME, APP_VERSION);
    log::debug!("Configuration: {:?}", config);

    let registry = ModelRegistry::from_config(&config).context("Failed to build model registry")?;
    log::info!(
        "Registry ready: {} models under {}",
        registry.ids().count(),
        registry.artifact_dir().display()
    );
    let pipeline = ScoringPipeline::new(Arc::new(registry));

    match cli.command {
        Commands::Predict {
            model,
            input,
            export_csv,
            pretty,
        } => {
            let content = read_input(&input)?;
            let response = commands::predict(&pipeline, &model, &content)
                .with_context(|| format!("Scoring {} with {} failed", input.display(), model))?;

            if let (ScoreResponse::Scored(outcome), Some(path)) = (&response, export_csv.as_deref()) {
                let file = std::fs::File::create(path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                outcome.data.write_csv(file)?;
                log::info!("Scored table exported to {}", path.display());
            }

            print_json(&response, pretty)?;
        }
        Commands::Summary {
            model,
            input,
            pretty,
        } => {
            let content = read_input(&input)?;
            let summary = commands::summarize(&pipeline, &model, &content)
                .with_context(|| format!("Summarizing {} with {} failed", input.display(), model))?;
            print_json(&summary, pretty)?;
        }
        Commands::Models => {
            print_json(&commands::list_models(pipeline.registry()), true)?;
        }
    }

    Ok(())
}

fn read_input(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", text);
    Ok(())
}
