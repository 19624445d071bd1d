pub use anyhow::{ensure, Context as _, Result};
pub use fire_bench::{YoloCommand, DEFAULT_PROGRAM};
pub use fire_config::{deserialize_version, Version};
pub use fire_dataset::DatasetConfig as DatasetDescription;
pub use log::{info, warn};
pub use serde::{Deserialize, Serialize};
pub use std::{
    fs,
    num::NonZeroUsize,
    path::{Path, PathBuf},
};
