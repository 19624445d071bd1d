pub use anyhow::{bail, ensure, format_err, Context as _, Error, Result};
pub use indexmap::IndexMap;
pub use itertools::Itertools as _;
pub use log::{debug, info, warn};
pub use rand::{distributions::WeightedIndex, prelude::*, rngs::StdRng};
pub use serde::{Deserialize, Serialize};
pub use std::{
    ffi::OsStr,
    fmt,
    fs,
    io::{self, BufRead, BufReader},
    iter::FromIterator,
    path::{Component, Path, PathBuf},
    str::FromStr,
};
