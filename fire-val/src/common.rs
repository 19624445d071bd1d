pub use anyhow::Result;
pub use fire_bench::{
    DriverInit, ExternalValidator, Summary, TorchScriptDetector, DEFAULT_PROGRAM,
    DEFAULT_WEIGHTS_PATTERN,
};
pub use fire_config::{deserialize_version, Version};
pub use fire_dataset::Split;
pub use log::info;
pub use serde::{Deserialize, Serialize};
pub use std::{
    fs,
    num::NonZeroUsize,
    path::{Path, PathBuf},
};
pub use tch::Device;
