//! Binary entry point for whereabouts.
//!
//! Recognizes the location shown in a photo and prints the structured
//! result as JSON.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print macros in the main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use whereabouts::config::WhereaboutsConfig;
use whereabouts::models::GeoPoint;
use whereabouts::observability::{self, LogFormat};
use whereabouts::{Pipeline, RecognitionRequest};

/// Whereabouts - photo location recognition.
#[derive(Parser)]
#[command(name = "whereabouts")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON.
    #[arg(long, global = true)]
    log_json: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Recognize the location shown in a photo.
    Recognize {
        /// Path to the image file.
        image: PathBuf,

        /// Hint latitude in decimal degrees.
        #[arg(long, requires = "lng", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Hint longitude in decimal degrees.
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lng: Option<f64>,

        /// Client identifier for rate limiting.
        #[arg(long)]
        client_id: Option<String>,
    },

    /// Print the effective configuration checks and exit.
    CheckConfig,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Populate API keys from .env during development; silently skipped
    // when the file is absent.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let format = if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    if let Err(e) = observability::init(format, cli.verbose) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    match run_command(cli.command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

fn load_config(path: Option<&std::path::Path>) -> whereabouts::Result<WhereaboutsConfig> {
    path.map_or_else(
        || Ok(WhereaboutsConfig::load_default()),
        WhereaboutsConfig::load_from_file,
    )
}

async fn run_command(
    command: Commands,
    config: WhereaboutsConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Recognize {
            image,
            lat,
            lng,
            client_id,
        } => {
            let bytes = std::fs::read(&image)
                .map_err(|e| format!("cannot read {}: {e}", image.display()))?;

            let mut request = RecognitionRequest::new(bytes);
            if let (Some(lat), Some(lng)) = (lat, lng) {
                request = request.with_hint(GeoPoint::new(lat, lng));
            }
            if let Some(client_id) = client_id {
                request = request.with_client_id(client_id);
            }

            let pipeline = Pipeline::from_config(config)?;
            let result = pipeline.recognize(request).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        },
        Commands::CheckConfig => {
            config.validate()?;
            println!("configuration ok");
            Ok(())
        },
    }
}
