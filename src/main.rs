use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use toxicity_classifier::{config::default_config_path, SentimentAnalyzer, Settings};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "toxicity_classifier")]
#[command(about = "Train and run a binary toxicity classifier", long_about = None)]
struct Cli {
    /// Settings file (defaults to sentiment.toml next to the executable)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train on the dataset, evaluate, and save the model
    Train,
    /// Score a single text with the saved model
    Predict {
        /// Text to classify
        text: String,
    },
    /// Score every line of a text file with the saved model
    Batch {
        /// Input file (defaults to data.batch_path from the settings)
        path: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = match cli.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    let settings = Settings::load_or_default(&config_path)
        .with_context(|| format!("failed to load settings from {}", config_path.display()))?;
    let analyzer = SentimentAnalyzer::new(settings);

    match cli.command {
        Commands::Train => {
            let report = analyzer.train().context("training failed")?;
            info!(
                "Trained on {} rows, evaluated on {}",
                report.train_rows, report.test_rows
            );
        }
        Commands::Predict { text } => {
            analyzer.predict_one(&text).context("prediction failed")?;
        }
        Commands::Batch { path } => {
            let path = match path {
                Some(path) => path,
                None => analyzer.settings().batch_path()?,
            };
            let predictions = analyzer
                .predict_batch(&path)
                .with_context(|| format!("batch prediction over {} failed", path.display()))?;
            info!("Scored {} lines", predictions.len());
        }
    }

    Ok(())
}
