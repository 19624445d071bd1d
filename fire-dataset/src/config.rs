//! The dataset description file shared with the detection framework.

use crate::{common::*, resolve::ResolvedImageSet};

/// The split entry used when the dataset file does not name one.
pub const DEFAULT_SPLIT_ENTRY: &str = "images";

/// A dataset partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    Train,
    Val,
    Test,
}

impl Split {
    pub const ALL: [Split; 3] = [Split::Train, Split::Val, Split::Test];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Val => "val",
            Self::Test => "test",
        }
    }

    /// The file name written by autosplit for this partition.
    pub fn autosplit_file_name(&self) -> String {
        format!("autosplit_{}.txt", self.as_str())
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Split {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let split = match text {
            "train" => Self::Train,
            "val" => Self::Val,
            "test" => Self::Test,
            _ => bail!("invalid split name '{}', expect train, val or test", text),
        };
        Ok(split)
    }
}

/// Class names, either as a list or as an index to name mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassNames {
    List(Vec<String>),
    Map(IndexMap<usize, String>),
}

impl ClassNames {
    pub fn len(&self) -> usize {
        match self {
            Self::List(names) => names.len(),
            Self::Map(names) => names.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Deserialize)]
struct DatasetFile {
    path: PathBuf,
    train: Option<String>,
    val: Option<String>,
    test: Option<String>,
    nc: Option<usize>,
    names: Option<ClassNames>,
}

/// The parsed dataset description.
#[derive(Debug, Clone)]
pub struct DatasetConfig {
    /// The dataset root directory.
    pub root: PathBuf,
    /// The directory containing the description file.
    pub config_dir: PathBuf,
    pub train: Option<String>,
    pub val: Option<String>,
    pub test: Option<String>,
    pub num_classes: Option<usize>,
    pub names: Option<ClassNames>,
}

impl DatasetConfig {
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read dataset config '{}'", path.display()))?;
        let config_dir = path.parent().unwrap_or_else(|| Path::new(""));
        let config = Self::from_yaml_str(&text, config_dir)
            .with_context(|| format!("failed to parse dataset config '{}'", path.display()))?;
        Ok(config)
    }

    /// Parse the description text. A relative dataset root is taken
    /// relative to `config_dir`.
    pub fn from_yaml_str(text: &str, config_dir: impl AsRef<Path>) -> Result<Self> {
        let config_dir = config_dir.as_ref();
        let DatasetFile {
            path,
            train,
            val,
            test,
            nc,
            names,
        } = serde_yaml::from_str(text)?;

        let root = if path.is_absolute() {
            path
        } else {
            config_dir.join(path)
        };

        Ok(Self {
            root,
            config_dir: config_dir.to_owned(),
            train,
            val,
            test,
            num_classes: nc,
            names,
        })
    }

    pub fn split_entry(&self, split: Split) -> Option<&str> {
        let entry = match split {
            Split::Train => &self.train,
            Split::Val => &self.val,
            Split::Test => &self.test,
        };
        entry.as_deref()
    }

    /// Number of classes, preferring the explicit count over the name list.
    pub fn num_classes(&self) -> Option<usize> {
        self.num_classes
            .or_else(|| self.names.as_ref().map(|names| names.len()))
    }

    /// Resolve the image files of a split. A split without an entry
    /// resolves the `images` directory under the dataset root.
    pub fn resolve(&self, split: Split) -> Result<ResolvedImageSet> {
        let entry = self.split_entry(split).unwrap_or(DEFAULT_SPLIT_ENTRY);
        crate::resolve::resolve_split(&self.root, entry, &self.config_dir)
    }
}
