mod advice;
mod run;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use salescopy_pipeline::Pipeline;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "salescopy-cli")]
#[command(about = "Sales copy pipeline command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Analyze a product page and carry one angle through copy and adaptation
    Run {
        /// Product page URL
        #[arg(long)]
        url: String,
        /// Backend identifier: openai, gemini or grok
        #[arg(long, default_value = "openai")]
        model: String,
        /// Id of the generated angle to write copy for
        #[arg(long, default_value = "1")]
        angle: String,
        /// Channel to adapt the copy to
        #[arg(long, default_value = "instagram")]
        channel: String,
    },
    /// Ask for media-buying advice on exported ad spend records
    Advice {
        /// JSON file holding an array of spend records
        #[arg(long)]
        records: PathBuf,
        /// Optional JSON file holding an array of profit records
        #[arg(long)]
        profit: Option<PathBuf>,
        /// Backend identifier: openai, gemini or grok
        #[arg(long, default_value = "openai")]
        model: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = salescopy_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let pipeline = Pipeline::from_config(&config)?;

    match cli.command {
        Commands::Run {
            url,
            model,
            angle,
            channel,
        } => run::run_pipeline(&pipeline, &url, &model, &angle, &channel).await,
        Commands::Advice {
            records,
            profit,
            model,
        } => advice::run_advice(&pipeline, &records, profit.as_deref(), &model).await,
    }
}
