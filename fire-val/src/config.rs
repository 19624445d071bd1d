//! Validation program configuration format.

use crate::common::*;

pub use benchmark::*;
pub use dataset::*;
pub use model::*;
pub use validation::*;

/// The main validation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(deserialize_with = "deserialize_version")]
    pub version: Version,
    pub model: ModelConfig,
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub benchmark: BenchmarkConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
}

impl Config {
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let text = fs::read_to_string(path)?;
        let config = json5::from_str(&text)?;
        Ok(config)
    }
}

mod model {
    use super::*;

    /// Trained model options.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ModelConfig {
        /// The directory where the framework stores training runs.
        pub results_dir: PathBuf,
        /// Glob pattern of weights files relative to `results_dir`.
        #[serde(default = "default_weights_pattern")]
        pub weights_pattern: String,
        /// Use this weights file instead of searching `results_dir`.
        #[serde(default)]
        pub weights_file: Option<PathBuf>,
        /// The device where inference runs.
        #[serde(with = "tch_serde::serde_device")]
        pub device: Device,
    }

    fn default_weights_pattern() -> String {
        DEFAULT_WEIGHTS_PATTERN.to_owned()
    }
}

mod dataset {
    use super::*;

    /// Dataset options.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct DatasetConfig {
        /// The dataset description file shared with the framework.
        pub config_file: PathBuf,
    }
}

mod benchmark {
    use super::*;

    /// Throughput measurement options.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct BenchmarkConfig {
        /// The split whose images are timed.
        #[serde(default = "default_split")]
        pub split: Split,
        /// Side length of the model input.
        #[serde(default = "default_image_size")]
        pub image_size: NonZeroUsize,
        /// Maximum number of timed images.
        #[serde(default = "default_num_samples")]
        pub num_samples: usize,
        /// Fixed seed for image sampling. Every run samples differently if unset.
        #[serde(default)]
        pub seed: Option<u64>,
    }

    impl Default for BenchmarkConfig {
        fn default() -> Self {
            Self {
                split: default_split(),
                image_size: default_image_size(),
                num_samples: default_num_samples(),
                seed: None,
            }
        }
    }

    fn default_num_samples() -> usize {
        50
    }
}

mod validation {
    use super::*;

    /// Accuracy validation options, forwarded to the framework.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ValidationConfig {
        /// The framework's command line program.
        #[serde(default = "default_program")]
        pub program: String,
        #[serde(default = "default_split")]
        pub split: Split,
        #[serde(default = "default_image_size")]
        pub image_size: NonZeroUsize,
        #[serde(default = "default_batch_size")]
        pub batch_size: NonZeroUsize,
        /// Extra `key=value` arguments, e.g. `"iou=0.7"` or `"save_json=True"`.
        #[serde(default)]
        pub extra_args: Vec<String>,
    }

    impl Default for ValidationConfig {
        fn default() -> Self {
            Self {
                program: default_program(),
                split: default_split(),
                image_size: default_image_size(),
                batch_size: default_batch_size(),
                extra_args: vec![],
            }
        }
    }

    fn default_program() -> String {
        DEFAULT_PROGRAM.to_owned()
    }

    fn default_batch_size() -> NonZeroUsize {
        NonZeroUsize::new(16).unwrap()
    }
}

fn default_split() -> Split {
    Split::Test
}

fn default_image_size() -> NonZeroUsize {
    NonZeroUsize::new(640).unwrap()
}
