//! Training program configuration format.

use crate::common::*;

pub use dataset::*;
pub use model::*;
pub use training::*;

/// The main training configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(deserialize_with = "deserialize_version")]
    pub version: Version,
    pub model: ModelConfig,
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub training: TrainingConfig,
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

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ModelConfig {
        /// The model architecture file understood by the framework.
        pub cfg_file: PathBuf,
        /// Weights to start from.
        #[serde(default)]
        pub pretrained: Option<PathBuf>,
    }
}

mod dataset {
    use super::*;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct DatasetConfig {
        pub config_file: PathBuf,
    }
}

mod training {
    use super::*;

    /// Hyperparameters forwarded to `yolo detect train`.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct TrainingConfig {
        #[serde(default = "default_program")]
        pub program: String,
        #[serde(default = "default_epochs")]
        pub epochs: NonZeroUsize,
        #[serde(default = "default_image_size")]
        pub image_size: NonZeroUsize,
        #[serde(default = "default_batch_size")]
        pub batch_size: NonZeroUsize,
        /// Disable mosaic augmentation for this many final epochs.
        #[serde(default = "default_close_mosaic")]
        pub close_mosaic: usize,
        /// Data loader workers.
        #[serde(default = "default_workers")]
        pub workers: usize,
        /// The framework's device string, e.g. `"0"`, `"0,1"` or `"cpu"`.
        #[serde(default = "default_device")]
        pub device: String,
        #[serde(default = "default_optimizer")]
        pub optimizer: String,
        /// Cache decoded images in memory.
        #[serde(default)]
        pub cache: bool,
        /// Output directory of training runs.
        #[serde(default)]
        pub project: Option<PathBuf>,
        /// Run name under `project`.
        #[serde(default)]
        pub name: Option<String>,
        /// Extra `key=value` arguments.
        #[serde(default)]
        pub extra_args: Vec<String>,
    }

    impl Default for TrainingConfig {
        fn default() -> Self {
            Self {
                program: default_program(),
                epochs: default_epochs(),
                image_size: default_image_size(),
                batch_size: default_batch_size(),
                close_mosaic: default_close_mosaic(),
                workers: default_workers(),
                device: default_device(),
                optimizer: default_optimizer(),
                cache: false,
                project: None,
                name: None,
                extra_args: vec![],
            }
        }
    }

    fn default_program() -> String {
        DEFAULT_PROGRAM.to_owned()
    }

    fn default_epochs() -> NonZeroUsize {
        NonZeroUsize::new(100).unwrap()
    }

    fn default_image_size() -> NonZeroUsize {
        NonZeroUsize::new(640).unwrap()
    }

    fn default_batch_size() -> NonZeroUsize {
        NonZeroUsize::new(16).unwrap()
    }

    fn default_close_mosaic() -> usize {
        10
    }

    fn default_workers() -> usize {
        8
    }

    fn default_device() -> String {
        "0".to_owned()
    }

    fn default_optimizer() -> String {
        "SGD".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_example_config() -> Result<()> {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("train.json5");
        let config = Config::open(path)?;

        assert_eq!(config.model.pretrained, None);
        assert_eq!(config.dataset.config_file, Path::new("fire.yaml"));
        assert_eq!(config.training.epochs.get(), 100);
        assert_eq!(config.training.optimizer, "SGD");
        assert!(!config.training.cache);
        Ok(())
    }

    #[test]
    fn training_section_is_optional() -> Result<()> {
        let text = r#"{
            version: "0.1.0",
            model: { cfg_file: "yolov8s.yaml" },
            dataset: { config_file: "fire.yaml" },
        }"#;
        let config: Config = json5::from_str(text)?;

        assert_eq!(config.training.program, "yolo");
        assert_eq!(config.training.image_size.get(), 640);
        assert_eq!(config.training.batch_size.get(), 16);
        assert_eq!(config.training.close_mosaic, 10);
        assert_eq!(config.training.workers, 8);
        assert_eq!(config.training.device, "0");
        Ok(())
    }

    #[test]
    fn zero_epochs_are_rejected() {
        let text = r#"{
            version: "0.1.0",
            model: { cfg_file: "yolov8s.yaml" },
            dataset: { config_file: "fire.yaml" },
            training: { epochs: 0 },
        }"#;
        assert!(json5::from_str::<Config>(text).is_err());
    }
}
