//! # foresight
//!
//! Command-line front end for the forecast analysis pipeline.

use clap::{Args, Parser, Subcommand};
use forecast_insights::{
    AnalysisConfig, AnalysisPipeline, DataLoader, DataStore, Growth, SeasonalityMode,
    SeasonalityToggle,
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "foresight")]
#[command(about = "Forecast, anomaly and insight analysis for tabular time series", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the analysis and print the result as JSON
    Analyze(AnalysisArgs),

    /// Run the analysis and print a plain-text report
    Report(AnalysisArgs),
}

#[derive(Args)]
struct AnalysisArgs {
    /// Input CSV file with a header row
    input: PathBuf,

    /// Number of days to forecast
    #[arg(short, long)]
    days: Option<usize>,

    /// additive or multiplicative
    #[arg(long)]
    seasonality_mode: Option<SeasonalityMode>,

    /// linear or flat
    #[arg(long)]
    growth: Option<Growth>,

    /// auto, true or false
    #[arg(long)]
    daily_seasonality: Option<SeasonalityToggle>,

    /// auto, true or false
    #[arg(long)]
    weekly_seasonality: Option<SeasonalityToggle>,

    /// auto, true or false
    #[arg(long)]
    yearly_seasonality: Option<SeasonalityToggle>,

    /// Simulated draws per timestamp for prediction intervals
    #[arg(long)]
    uncertainty_samples: Option<usize>,

    /// Seed for the interval simulation
    #[arg(long)]
    seed: Option<u64>,

    /// JSON configuration file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for stored tables
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Persist the normalized table into the data directory
    #[arg(long)]
    save: bool,
}

impl AnalysisArgs {
    fn to_config(&self) -> Result<AnalysisConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::from_json_file(path)?,
            None => AnalysisConfig::default(),
        };

        if let Some(days) = self.days {
            config.horizon_days = days;
        }
        if let Some(mode) = self.seasonality_mode {
            config.model.seasonality_mode = mode;
        }
        if let Some(growth) = self.growth {
            config.model.growth = growth;
        }
        if let Some(toggle) = self.daily_seasonality {
            config.model.daily_seasonality = toggle;
        }
        if let Some(toggle) = self.weekly_seasonality {
            config.model.weekly_seasonality = toggle;
        }
        if let Some(toggle) = self.yearly_seasonality {
            config.model.yearly_seasonality = toggle;
        }
        if let Some(samples) = self.uncertainty_samples {
            config.model.uncertainty_samples = samples;
        }
        if self.seed.is_some() {
            config.model.seed = self.seed;
        }
        if let Some(dir) = &self.data_dir {
            config.storage.data_dir = dir.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

fn run(args: &AnalysisArgs, as_json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.to_config()?;
    let table = DataLoader::from_csv(&args.input)?;

    let pipeline = AnalysisPipeline::with_default_model(&config);
    let result = if args.save {
        let store = DataStore::new(config.storage.data_dir.clone());
        let name = args
            .input
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.csv");
        info!(
            "Saving normalized table to {}",
            store.data_dir().display()
        );
        pipeline.analyze_saved(name, &table, &store)?
    } else {
        pipeline.analyze(&table)?
    };

    if as_json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", result);
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "foresight=info,forecast_insights=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Analyze(args) => run(args, true),
        Commands::Report(args) => run(args, false),
    }
}
