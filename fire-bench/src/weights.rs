//! Locate trained weights under the framework's results directory.

use crate::common::*;

/// Best weights of every training run, relative to the results directory.
pub const DEFAULT_WEIGHTS_PATTERN: &str = "train*/weights/best.pt";

/// No weights file matches the search pattern.
#[derive(Debug, Clone, thiserror::Error)]
#[error("no trained weights found matching '{pattern}', train a model first")]
pub struct WeightsNotFound {
    pub pattern: String,
}

/// Find the most recently modified file matching `pattern` under `results_dir`.
pub fn locate_latest_weights(results_dir: impl AsRef<Path>, pattern: &str) -> Result<PathBuf> {
    let results_dir = results_dir.as_ref();
    let dir = results_dir
        .to_str()
        .ok_or_else(|| format_err!("non-unicode path '{}'", results_dir.display()))?;
    let full_pattern = format!("{}/{}", glob::Pattern::escape(dir), pattern);

    let paths: Vec<PathBuf> = glob::glob(&full_pattern)
        .with_context(|| format!("invalid weights pattern '{}'", pattern))?
        .try_collect()?;

    let candidates: Vec<(PathBuf, SystemTime)> = paths
        .into_iter()
        .filter(|path| path.is_file())
        .map(|path| -> Result<_> {
            let modified = fs::metadata(&path)?.modified()?;
            Ok((path, modified))
        })
        .try_collect()?;

    candidates.iter().for_each(|(path, _)| {
        debug!("found weights candidate '{}'", path.display());
    });

    let latest = candidates
        .into_iter()
        .max_by_key(|(_, modified)| *modified)
        .map(|(path, _)| path)
        .ok_or(WeightsNotFound {
            pattern: full_pattern,
        })?;

    Ok(latest)
}

/// Use `weights_file` if given, otherwise search the results directory.
pub fn resolve_weights(
    weights_file: Option<&Path>,
    results_dir: impl AsRef<Path>,
    pattern: &str,
) -> Result<PathBuf> {
    match weights_file {
        Some(file) => {
            if !file.is_file() {
                return Err(WeightsNotFound {
                    pattern: file.display().to_string(),
                }
                .into());
            }
            Ok(file.to_owned())
        }
        None => locate_latest_weights(results_dir, pattern),
    }
}
