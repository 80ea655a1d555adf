//! The candidate files of a run

use std::path::{Path, PathBuf};

/// Ordered list of absolute file paths under consideration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSet {
    files: Vec<PathBuf>,
}

impl FileSet {
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self { files }
    }

    /// Build a file set, joining relative paths onto `root`
    pub fn resolve<I, P>(root: &Path, files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        files
            .into_iter()
            .map(|file| {
                let file = file.as_ref();
                if file.is_absolute() {
                    file.to_path_buf()
                } else {
                    root.join(file)
                }
            })
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.files.iter().any(|f| f == path)
    }

    /// Files with the given extension that exist on disk
    pub fn existing_with_extension<'a>(
        &'a self,
        extension: &'a str,
    ) -> impl Iterator<Item = &'a Path> + 'a {
        self.iter()
            .filter(move |file| has_extension(file, extension) && file.is_file())
    }
}

impl FromIterator<PathBuf> for FileSet {
    fn from_iter<T: IntoIterator<Item = PathBuf>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Exact, case-sensitive extension match
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == extension)
}
