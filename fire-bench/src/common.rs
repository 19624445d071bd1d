pub use anyhow::{ensure, format_err, Context as _, Result};
pub use fire_dataset::{sample_images, seeded_rng, DatasetConfig, Split};
pub use image::{DynamicImage, Rgb, RgbImage};
pub use itertools::Itertools as _;
pub use log::{debug, info, warn};
pub use once_cell::sync::Lazy;
pub use rand::prelude::*;
pub use regex::Regex;
pub use serde::{Deserialize, Serialize};
pub use std::{
    fmt,
    fs,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    process::{Command, ExitStatus, Stdio},
    time::{Duration, Instant, SystemTime},
};
