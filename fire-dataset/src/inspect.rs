use crate::{common::*, resolve::has_extension};

/// Image extensions counted by [`inspect_dataset`].
pub const COUNTED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "png"];

/// Label files per image, in the detection framework's text format.
pub const LABEL_EXTENSION: &str = "txt";

/// File counts of a dataset directory with `images/` and `labels/` folders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetStats {
    pub num_images: usize,
    pub num_labels: usize,
}

impl DatasetStats {
    pub fn is_ready(&self) -> bool {
        self.num_images > 0 && self.num_labels > 0
    }
}

pub fn images_dir(dataset_dir: impl AsRef<Path>) -> PathBuf {
    dataset_dir.as_ref().join("images")
}

pub fn labels_dir(dataset_dir: impl AsRef<Path>) -> PathBuf {
    dataset_dir.as_ref().join("labels")
}

/// Count images and labels of a dataset directory. Returns `None` when
/// the directory or one of its `images/` and `labels/` folders is absent.
pub fn inspect_dataset(dataset_dir: impl AsRef<Path>) -> Result<Option<DatasetStats>> {
    let dataset_dir = dataset_dir.as_ref();
    let images_dir = images_dir(dataset_dir);
    let labels_dir = labels_dir(dataset_dir);

    if !(dataset_dir.is_dir() && images_dir.is_dir() && labels_dir.is_dir()) {
        return Ok(None);
    }

    let stats = DatasetStats {
        num_images: count_files(&images_dir, COUNTED_IMAGE_EXTENSIONS)?,
        num_labels: count_files(&labels_dir, &[LABEL_EXTENSION])?,
    };
    Ok(Some(stats))
}

/// Count the regular files directly under `dir` having one of `extensions`.
pub fn count_files(dir: impl AsRef<Path>, extensions: &[&str]) -> Result<usize> {
    let dir = dir.as_ref();
    let mut count = 0;

    for entry in
        fs::read_dir(dir).with_context(|| format!("failed to list directory '{}'", dir.display()))?
    {
        let entry = entry?;
        if entry.file_type()?.is_file() && has_extension(&entry.path(), extensions) {
            count += 1;
        }
    }

    Ok(count)
}
