//! Accuracy validation delegated to the external framework.

use crate::{
    common::*,
    external::{YoloCommand, DEFAULT_PROGRAM},
    metrics::AccuracyMetrics,
};

/// Computes accuracy metrics for a weights file.
pub trait AccuracyValidator {
    /// Validate `weights` and return the overall metrics if they were reported.
    fn validate(&mut self, weights: &Path) -> Result<Option<AccuracyMetrics>>;
}

/// Runs `yolo detect val` and scrapes the summary row from its output.
#[derive(Debug, Clone)]
pub struct ExternalValidator {
    pub program: String,
    pub dataset_config: PathBuf,
    pub split: Split,
    pub image_size: u32,
    pub batch_size: usize,
    /// Extra `key=value` arguments passed verbatim.
    pub extra_args: Vec<String>,
}

impl ExternalValidator {
    pub fn new(dataset_config: impl AsRef<Path>) -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_owned(),
            dataset_config: dataset_config.as_ref().to_owned(),
            split: Split::Test,
            image_size: 640,
            batch_size: 16,
            extra_args: vec![],
        }
    }

    pub fn command(&self, weights: &Path) -> YoloCommand {
        YoloCommand::new(&self.program, "detect", "val")
            .path_arg("model", weights)
            .path_arg("data", &self.dataset_config)
            .arg("split", self.split)
            .arg("imgsz", self.image_size)
            .arg("batch", self.batch_size)
            .raw_args(self.extra_args.iter().cloned())
    }
}

impl AccuracyValidator for ExternalValidator {
    fn validate(&mut self, weights: &Path) -> Result<Option<AccuracyMetrics>> {
        let mut metrics = None;
        self.command(weights).run_with_lines(|line| {
            if let Some(parsed) = AccuracyMetrics::parse_summary_row(line) {
                metrics = Some(parsed);
            }
        })?;

        if metrics.is_none() {
            warn!("the validator did not report overall metrics");
        }
        Ok(metrics)
    }
}
