//! Turn a split entry into the list of image files it names.

use crate::common::*;

/// Extensions recognized as images when scanning a split directory.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// The extension of autosplit list files.
pub const LIST_FILE_EXTENSION: &str = "txt";

/// The form a split entry was resolved from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitSource {
    /// A directory scanned for image files.
    Directory(PathBuf),
    /// A list file with one image path per line.
    ListFile(PathBuf),
}

/// Image files of a split, in the order they were found.
#[derive(Debug, Clone, Default)]
pub struct ResolvedImageSet {
    source: Option<SplitSource>,
    paths: Vec<PathBuf>,
    missing: Vec<PathBuf>,
}

impl ResolvedImageSet {
    /// Where the images came from, or `None` if neither the entry nor the
    /// fallback location exists.
    pub fn source(&self) -> Option<&SplitSource> {
        self.source.as_ref()
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// List file entries that exist under none of the candidate directories.
    pub fn missing(&self) -> &[PathBuf] {
        &self.missing
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(|path| path.as_path())
    }

    pub fn into_paths(self) -> Vec<PathBuf> {
        self.paths
    }
}

impl FromIterator<PathBuf> for ResolvedImageSet {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        Self {
            source: None,
            paths: iter.into_iter().collect(),
            missing: vec![],
        }
    }
}

/// Resolve a split entry to image files.
///
/// An entry ending with `.txt` names a list file, which is searched under
/// `root` and then `config_dir`. Any other entry names a directory under
/// `root`, falling back to `root/images` if it does not exist. A location
/// that cannot be found yields an empty set rather than an error.
pub fn resolve_split(
    root: impl AsRef<Path>,
    entry: &str,
    config_dir: impl AsRef<Path>,
) -> Result<ResolvedImageSet> {
    let root = root.as_ref();
    let config_dir = config_dir.as_ref();

    if is_list_file(entry) {
        resolve_list_file(root, entry, config_dir)
    } else {
        resolve_directory(root, entry)
    }
}

fn is_list_file(entry: &str) -> bool {
    Path::new(entry)
        .extension()
        .and_then(OsStr::to_str)
        .map(|ext| ext.eq_ignore_ascii_case(LIST_FILE_EXTENSION))
        .unwrap_or(false)
}

pub(crate) fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .map(|ext| extensions.iter().any(|want| ext.eq_ignore_ascii_case(want)))
        .unwrap_or(false)
}

/// Try `entry` under each base directory in order and return the first
/// regular file. An absolute entry is only checked as is.
fn find_file_under(entry: &Path, bases: &[&Path]) -> Option<PathBuf> {
    if entry.is_absolute() {
        return entry.is_file().then(|| entry.to_owned());
    }
    bases
        .iter()
        .map(|base| base.join(entry))
        .find(|candidate| candidate.is_file())
}

fn resolve_list_file(root: &Path, entry: &str, config_dir: &Path) -> Result<ResolvedImageSet> {
    let list_file = match find_file_under(Path::new(entry), &[root, config_dir]) {
        Some(path) => path,
        None => {
            warn!(
                "list file '{}' is found neither under '{}' nor under '{}'",
                entry,
                root.display(),
                config_dir.display()
            );
            return Ok(ResolvedImageSet::default());
        }
    };

    let lines: Vec<String> = {
        let file = fs::File::open(&list_file)
            .with_context(|| format!("failed to open list file '{}'", list_file.display()))?;
        BufReader::new(file)
            .lines()
            .collect::<io::Result<_>>()
            .with_context(|| format!("failed to read list file '{}'", list_file.display()))?
    };

    let mut paths = vec![];
    let mut missing = vec![];

    lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .for_each(|line| {
            let line = Path::new(line);
            match find_file_under(line, &[root, config_dir]) {
                Some(path) => paths.push(path),
                None => {
                    let unresolved = root.join(line);
                    debug!("skip missing list entry '{}'", unresolved.display());
                    missing.push(unresolved);
                }
            }
        });

    if !missing.is_empty() {
        warn!(
            "{} entries of list file '{}' do not exist and are skipped",
            missing.len(),
            list_file.display()
        );
    }

    Ok(ResolvedImageSet {
        source: Some(SplitSource::ListFile(list_file)),
        paths,
        missing,
    })
}

fn resolve_directory(root: &Path, entry: &str) -> Result<ResolvedImageSet> {
    let dir = {
        let dir = root.join(entry);
        if dir.is_dir() {
            dir
        } else {
            let fallback = root.join(crate::config::DEFAULT_SPLIT_ENTRY);
            if !fallback.is_dir() {
                warn!(
                    "neither '{}' nor '{}' is a directory",
                    dir.display(),
                    fallback.display()
                );
                return Ok(ResolvedImageSet::default());
            }
            debug!(
                "'{}' is not a directory, fall back to '{}'",
                dir.display(),
                fallback.display()
            );
            fallback
        }
    };

    let paths: Vec<_> = fs::read_dir(&dir)
        .with_context(|| format!("failed to list directory '{}'", dir.display()))?
        .map(|entry| -> Result<_> {
            let entry = entry?;
            let path = entry.path();
            let is_image = entry.file_type()?.is_file() && has_extension(&path, IMAGE_EXTENSIONS);
            Ok(is_image.then(|| path))
        })
        .filter_map(|result| result.transpose())
        .try_collect()?;

    Ok(ResolvedImageSet {
        source: Some(SplitSource::Directory(dir)),
        paths,
        missing: vec![],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_file_detection() {
        assert!(is_list_file("autosplit_val.txt"));
        assert!(is_list_file("lists/VAL.TXT"));
        assert!(!is_list_file("images/val"));
        assert!(!is_list_file("txt"));
    }

    #[test]
    fn image_extension_is_case_insensitive() {
        assert!(has_extension(Path::new("a/b.JPG"), IMAGE_EXTENSIONS));
        assert!(has_extension(Path::new("b.jpeg"), IMAGE_EXTENSIONS));
        assert!(!has_extension(Path::new("b.bmp"), IMAGE_EXTENSIONS));
        assert!(!has_extension(Path::new("jpg"), IMAGE_EXTENSIONS));
    }
}
