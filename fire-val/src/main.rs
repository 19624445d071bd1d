use anyhow::{Context, Result};
use fire_val::config::Config;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, Clone, StructOpt)]
/// Report size, FPS and accuracy of the latest trained model
struct Args {
    #[structopt(long, default_value = "val.json5")]
    /// configuration file
    pub config_file: PathBuf,
}

pub fn main() -> Result<()> {
    fire_config::init_logging();

    // parse arguments
    let Args { config_file } = Args::from_args();
    let config = Config::open(&config_file)
        .with_context(|| format!("failed to load config file '{}'", config_file.display()))?;

    // start validation
    fire_val::start(&config)?;

    Ok(())
}
