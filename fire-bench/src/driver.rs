//! The validation driver.
//!
//! A run walks through the [`Stage`]s in order. The output of each stage
//! feeds the next one, and a failing stage aborts the whole run.

use crate::{
    common::*,
    detector::Detector,
    size::model_params_mb,
    summary::{performance_table, Summary},
    timer::{Throughput, ThroughputTimer, ThroughputTimerInit},
    validate::AccuracyValidator,
    weights::{resolve_weights, DEFAULT_WEIGHTS_PATTERN},
};

/// Stages of a validation run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    LocateWeights,
    LoadModel,
    ComputeSize,
    ComputeFps,
    RunAccuracyValidation,
    ReportSummary,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::LocateWeights,
        Stage::LoadModel,
        Stage::ComputeSize,
        Stage::ComputeFps,
        Stage::RunAccuracyValidation,
        Stage::ReportSummary,
    ];

    pub fn description(&self) -> &'static str {
        match self {
            Self::LocateWeights => "locating weights",
            Self::LoadModel => "loading model",
            Self::ComputeSize => "calculating model parameters",
            Self::ComputeFps => "calculating FPS",
            Self::RunAccuracyValidation => "running validation",
            Self::ReportSummary => "reporting summary",
        }
    }
}

/// Driver options.
#[derive(Debug, Clone)]
pub struct DriverInit {
    /// The directory holding the framework's training runs.
    pub results_dir: PathBuf,
    /// Glob pattern of weights files under `results_dir`.
    pub weights_pattern: String,
    /// Explicit weights file, bypassing the search.
    pub weights_file: Option<PathBuf>,
    /// The dataset description file.
    pub dataset_config: PathBuf,
    /// The split whose images are timed.
    pub benchmark_split: Split,
    /// Maximum number of timed images.
    pub num_samples: usize,
    pub image_size: u32,
    /// Seed of the sampling and warm-up generator. Unset draws from entropy.
    pub seed: Option<u64>,
    /// Print the summary tables to standard output.
    pub print_tables: bool,
}

impl DriverInit {
    pub fn new(results_dir: impl AsRef<Path>, dataset_config: impl AsRef<Path>) -> Self {
        Self {
            results_dir: results_dir.as_ref().to_owned(),
            weights_pattern: DEFAULT_WEIGHTS_PATTERN.to_owned(),
            weights_file: None,
            dataset_config: dataset_config.as_ref().to_owned(),
            benchmark_split: Split::Test,
            num_samples: 50,
            image_size: 640,
            seed: None,
            print_tables: true,
        }
    }

    pub fn build(self) -> Result<Driver> {
        let timer = ThroughputTimerInit {
            image_size: self.image_size,
            ..Default::default()
        }
        .build()?;

        Ok(Driver { init: self, timer })
    }
}

#[derive(Debug, Clone)]
pub struct Driver {
    init: DriverInit,
    timer: ThroughputTimer,
}

impl Driver {
    /// Run every stage. `load_model` turns the located weights file into a
    /// detector, and `validator` computes the accuracy metrics.
    pub fn run<D, L, V>(&self, load_model: L, validator: &mut V) -> Result<Summary>
    where
        D: Detector,
        L: FnOnce(&Path) -> Result<D>,
        V: AccuracyValidator + ?Sized,
    {
        let DriverInit {
            ref results_dir,
            ref weights_pattern,
            ref weights_file,
            print_tables,
            seed,
            ..
        } = self.init;

        enter(Stage::LocateWeights);
        let weights = resolve_weights(weights_file.as_deref(), results_dir, weights_pattern)?;
        info!("use weights '{}'", weights.display());

        enter(Stage::LoadModel);
        let mut model = load_model(&weights)
            .with_context(|| format!("failed to load model from '{}'", weights.display()))?;

        enter(Stage::ComputeSize);
        let params_mb = model_params_mb(&model)?;
        info!("model parameters: {:.2} MB", params_mb);

        enter(Stage::ComputeFps);
        let mut rng = seeded_rng(seed);
        let throughput = self.compute_fps(&mut model, &mut rng)?;
        info!("FPS: {:.2}", throughput.fps);
        if print_tables {
            performance_table(params_mb, &throughput).printstd();
        }

        enter(Stage::RunAccuracyValidation);
        let accuracy = validator.validate(&weights)?;

        enter(Stage::ReportSummary);
        let summary = Summary {
            weights,
            params_mb,
            throughput,
            accuracy,
        };
        if print_tables {
            summary.final_table().printstd();
        }

        Ok(summary)
    }

    fn compute_fps<D, R>(&self, model: &mut D, rng: &mut R) -> Result<Throughput>
    where
        D: Detector + ?Sized,
        R: Rng + ?Sized,
    {
        let DriverInit {
            ref dataset_config,
            benchmark_split,
            num_samples,
            ..
        } = self.init;

        if !dataset_config.is_file() {
            warn!(
                "dataset config file '{}' not found, FPS is reported as 0",
                dataset_config.display()
            );
            return Ok(Throughput::empty());
        }

        let dataset = DatasetConfig::open(dataset_config)?;
        let images = dataset.resolve(benchmark_split)?;
        if images.is_empty() {
            warn!(
                "no {} images found for FPS calculation, FPS is reported as 0",
                benchmark_split
            );
            return Ok(Throughput::empty());
        }

        let samples = sample_images(&images, num_samples, rng);
        info!(
            "time {} of {} {} images",
            samples.len(),
            images.len(),
            benchmark_split
        );
        self.timer.run(model, &samples, rng)
    }
}

fn enter(stage: Stage) {
    info!("{}", stage.description());
}
