use anyhow::{Context, Result};
use fire_train::config::Config;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, Clone, StructOpt)]
/// Train a fire detector with the detection framework
struct Args {
    #[structopt(long, default_value = "train.json5")]
    /// configuration file
    pub config_file: PathBuf,
}

pub fn main() -> Result<()> {
    fire_config::init_logging();

    let Args { config_file } = Args::from_args();
    let config = Config::open(&config_file)
        .with_context(|| format!("failed to load config file '{}'", config_file.display()))?;

    fire_train::start(&config)?;

    Ok(())
}
