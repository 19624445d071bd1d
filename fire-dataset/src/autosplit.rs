//! Split a dataset into train/val/test list files without moving images.

use crate::{common::*, config::Split, inspect::LABEL_EXTENSION, resolve::has_extension};

/// Image extensions picked up by autosplit.
pub const AUTOSPLIT_EXTENSIONS: &[&str] = &[
    "bmp", "dng", "jpeg", "jpg", "mpo", "png", "tif", "tiff", "webp", "pfm",
];

/// Autosplit options.
#[derive(Debug, Clone)]
pub struct AutosplitInit {
    /// Relative weights of the train, val and test partitions.
    pub weights: [f64; 3],
    /// Skip images without a label file.
    pub annotated_only: bool,
    pub seed: u64,
}

impl Default for AutosplitInit {
    fn default() -> Self {
        Self {
            weights: [0.8, 0.1, 0.1],
            annotated_only: true,
            seed: 0,
        }
    }
}

/// What autosplit wrote.
#[derive(Debug, Clone)]
pub struct AutosplitOutput {
    /// Every list file location paired with the number of images written to it.
    pub lists: Vec<(Split, PathBuf, usize)>,
    /// Images left out for lack of a label file.
    pub num_unlabeled: usize,
}

impl AutosplitOutput {
    pub fn num_written(&self) -> usize {
        self.lists.iter().map(|(_, _, count)| count).sum()
    }
}

impl AutosplitInit {
    /// Assign every image under `images_dir` to a split and write the
    /// `autosplit_*.txt` lists next to `images_dir`.
    ///
    /// Images are visited in sorted order and assigned with a generator
    /// seeded by `seed`, so repeated runs produce the same lists. Existing
    /// lists are removed first.
    pub fn run(&self, images_dir: impl AsRef<Path>) -> Result<AutosplitOutput> {
        let images_dir = images_dir.as_ref();
        ensure!(
            images_dir.is_dir(),
            "images directory not found: '{}'",
            images_dir.display()
        );
        let dataset_dir = images_dir
            .parent()
            .ok_or_else(|| format_err!("'{}' has no parent directory", images_dir.display()))?;
        let distribution = WeightedIndex::new(&self.weights)
            .with_context(|| format!("invalid split weights {:?}", self.weights))?;

        let images = list_images(images_dir)?;

        let list_files: Vec<PathBuf> = Split::ALL
            .iter()
            .map(|split| dataset_dir.join(split.autosplit_file_name()))
            .collect();
        for path in &list_files {
            if path.exists() {
                fs::remove_file(path)
                    .with_context(|| format!("failed to remove '{}'", path.display()))?;
            }
        }

        if self.annotated_only {
            info!(
                "autosplitting images from '{}', using labeled images only",
                images_dir.display()
            );
        } else {
            info!("autosplitting images from '{}'", images_dir.display());
        }

        // draw a split for every image before filtering
        let mut rng = StdRng::seed_from_u64(self.seed);
        let assignments: Vec<usize> = images
            .iter()
            .map(|_| distribution.sample(&mut rng))
            .collect();

        let mut lines: [Vec<String>; 3] = Default::default();
        let mut num_unlabeled = 0;

        for (image, split_index) in images.iter().zip(assignments) {
            if self.annotated_only {
                let labeled = label_path_for(image)
                    .map(|label| label.exists())
                    .unwrap_or(false);
                if !labeled {
                    num_unlabeled += 1;
                    continue;
                }
            }

            let relative = image.strip_prefix(dataset_dir)?;
            let line = format!(
                "./{}",
                relative
                    .components()
                    .map(|component| component.as_os_str().to_string_lossy())
                    .join("/")
            );
            lines[split_index].push(line);
        }

        let lists: Vec<_> = Split::ALL
            .iter()
            .zip(list_files)
            .zip(lines.iter())
            .map(|((&split, path), lines)| -> Result<_> {
                if !lines.is_empty() {
                    let mut text = lines.join("\n");
                    text.push('\n');
                    fs::write(&path, text)
                        .with_context(|| format!("failed to write '{}'", path.display()))?;
                }
                Ok((split, path, lines.len()))
            })
            .try_collect()?;

        Ok(AutosplitOutput {
            lists,
            num_unlabeled,
        })
    }
}

/// Image files under `images_dir`, recursively, in sorted order.
fn list_images(images_dir: &Path) -> Result<Vec<PathBuf>> {
    let dir = images_dir
        .to_str()
        .ok_or_else(|| format_err!("non-unicode path '{}'", images_dir.display()))?;
    let pattern = format!("{}/**/*", glob::Pattern::escape(dir));

    let mut images: Vec<PathBuf> = glob::glob(&pattern)?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(err) => {
                warn!("{}", err);
                None
            }
        })
        .filter(|path| path.is_file() && has_extension(path, AUTOSPLIT_EXTENSIONS))
        .collect();
    images.sort();

    Ok(images)
}

/// The label file of an image: the last `images` directory component is
/// replaced by `labels` and the extension by `.txt`.
pub fn label_path_for(image: impl AsRef<Path>) -> Option<PathBuf> {
    let components: Vec<Component> = image.as_ref().components().collect();
    let dirs = &components[..components.len().saturating_sub(1)];
    let index = dirs
        .iter()
        .rposition(|component| component.as_os_str() == "images")?;

    let mut label: PathBuf = components[..index].iter().collect();
    label.push("labels");
    label.extend(&components[(index + 1)..]);
    Some(label.with_extension(LABEL_EXTENSION))
}
