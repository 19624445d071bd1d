//! Place a dataset copy where the training configuration expects it.

use crate::{
    common::*,
    inspect::{images_dir, inspect_dataset, labels_dir, DatasetStats},
};
use fs_extra::dir::CopyOptions;

/// The result of [`setup_dataset`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupOutcome {
    Copied(DatasetStats),
    /// The target was not empty and overwriting was declined.
    Cancelled,
}

/// Replace `target` by a copy of `source` and verify the copied structure.
///
/// When `target` exists and is not empty, `confirm_overwrite` is asked
/// before anything is deleted.
pub fn setup_dataset<F>(
    source: impl AsRef<Path>,
    target: impl AsRef<Path>,
    confirm_overwrite: F,
) -> Result<SetupOutcome>
where
    F: FnOnce(&Path) -> Result<bool>,
{
    let source = source.as_ref();
    let target = target.as_ref();

    ensure!(
        source.is_dir(),
        "source dataset path does not exist: '{}'",
        source.display()
    );

    let source_abs = fs::canonicalize(source)
        .with_context(|| format!("failed to resolve '{}'", source.display()))?;
    let target_abs = absolute_path(target)?;
    ensure!(
        !source_abs.starts_with(&target_abs) && !target_abs.starts_with(&source_abs),
        "source '{}' and target '{}' must not be the same directory or contain each other",
        source_abs.display(),
        target_abs.display()
    );

    fs::create_dir_all(target)
        .with_context(|| format!("failed to create '{}'", target.display()))?;

    let is_empty = fs::read_dir(target)?.next().is_none();
    if !is_empty && !confirm_overwrite(target)? {
        return Ok(SetupOutcome::Cancelled);
    }

    fs::remove_dir_all(target)
        .with_context(|| format!("failed to remove '{}'", target.display()))?;
    fs::create_dir_all(target)?;

    info!("copy '{}' to '{}'", source.display(), target.display());
    let mut options = CopyOptions::new();
    options.content_only = true;
    fs_extra::dir::copy(source, target, &options).with_context(|| {
        format!(
            "failed to copy '{}' to '{}'",
            source.display(),
            target.display()
        )
    })?;

    let stats = inspect_dataset(target)?.ok_or_else(|| {
        format_err!(
            "dataset structure incomplete, expect '{}' and '{}'",
            images_dir(target).display(),
            labels_dir(target).display()
        )
    })?;
    ensure!(
        stats.is_ready(),
        "dataset structure verification failed: {} images, {} labels",
        stats.num_images,
        stats.num_labels
    );

    Ok(SetupOutcome::Copied(stats))
}

/// Canonicalize the longest existing ancestor of `path` and append the
/// remaining components.
fn absolute_path(path: &Path) -> Result<PathBuf> {
    let path = if path.is_absolute() {
        path.to_owned()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut existing = path.as_path();
    let mut rest = vec![];
    while !existing.exists() {
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                rest.push(name.to_owned());
                existing = parent;
            }
            _ => break,
        }
    }

    let mut absolute = fs::canonicalize(existing)
        .with_context(|| format!("failed to resolve '{}'", existing.display()))?;
    absolute.extend(rest.iter().rev());
    Ok(absolute)
}
