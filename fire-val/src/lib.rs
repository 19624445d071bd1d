//! The validation program: model size, FPS and accuracy of the latest
//! trained weights.

mod common;
pub mod config;

use crate::{common::*, config::Config};

/// Run the validation driver with the TorchScript backend.
pub fn start(config: &Config) -> Result<Summary> {
    let Config {
        model: ref model_config,
        dataset: ref dataset_config,
        ref benchmark,
        ref validation,
        ..
    } = *config;

    let image_size = benchmark.image_size.get() as u32;
    let device = model_config.device;

    let driver = DriverInit {
        weights_pattern: model_config.weights_pattern.clone(),
        weights_file: model_config.weights_file.clone(),
        benchmark_split: benchmark.split,
        num_samples: benchmark.num_samples,
        image_size,
        seed: benchmark.seed,
        ..DriverInit::new(&model_config.results_dir, &dataset_config.config_file)
    }
    .build()?;

    let mut validator = ExternalValidator {
        program: validation.program.clone(),
        split: validation.split,
        image_size: validation.image_size.get() as u32,
        batch_size: validation.batch_size.get(),
        extra_args: validation.extra_args.clone(),
        ..ExternalValidator::new(&dataset_config.config_file)
    };

    info!("run inference on {:?}", device);
    let summary = driver.run(
        |weights| TorchScriptDetector::load(weights, device, image_size),
        &mut validator,
    )?;

    Ok(summary)
}
