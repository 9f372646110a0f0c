use std::path::PathBuf;

use clap::Parser;
use predixa::domain::services::artifact::DEFAULT_ARTIFACT_PATH;
use predixa::domain::services::regression::{DEFAULT_SEED, DEFAULT_TREE_COUNT};
use predixa::domain::services::training::{self, TrainingConfig, DEFAULT_DATA_PATH};
use predixa::logging;

#[derive(Parser, Debug)]
#[command(name = "train", version, about = "Fit the price models and save the best one")]
struct Cli {
    /// CSV file with `day` and `price` columns
    #[arg(long, default_value = DEFAULT_DATA_PATH)]
    data: PathBuf,
    /// Where to write the model artifact
    #[arg(long, default_value = DEFAULT_ARTIFACT_PATH)]
    output: PathBuf,
    #[arg(long, default_value_t = DEFAULT_TREE_COUNT)]
    trees: usize,
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    logging::init();

    let cli = Cli::parse();
    let config = TrainingConfig {
        data_path: cli.data,
        artifact_path: cli.output,
        n_estimators: cli.trees,
        seed: cli.seed,
    };

    training::run(&config)?;
    Ok(())
}
