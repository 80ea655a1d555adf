//! Project layout helpers
//!
//! Locates the project root, its bin directory and the files a full-project
//! run should look at.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::error::{GateError, Result};
use crate::fileset::{FileSet, has_extension};

/// File whose presence marks a project root
pub const PROJECT_MANIFEST: &str = "composer.json";

/// Directories never walked during project discovery
pub const EXCLUDED_DIRS: &[&str] = &["vendor", "cache", "logs"];

const BIN_DIR_CANDIDATES: &[&str] = &["bin", "vendor/bin"];

/// Walk up from `start` to the first directory holding the project manifest
pub fn project_directory(start: &Path) -> Result<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(PROJECT_MANIFEST).is_file() {
            tracing::debug!(root = %current.display(), "found project root");
            return Ok(current);
        }
        if !current.pop() {
            break;
        }
    }

    Err(GateError::config(format!(
        "Unable to determine project base directory: no {PROJECT_MANIFEST} found above {}",
        start.display()
    )))
}

/// Locate the tool bin directory: `bin/` first, then `vendor/bin/`
pub fn bin_directory(project_dir: &Path) -> Result<PathBuf> {
    BIN_DIR_CANDIDATES
        .iter()
        .map(|candidate| project_dir.join(candidate))
        .find(|dir| dir.is_dir())
        .ok_or_else(|| {
            GateError::config("Bin directory not found. Should be bin/ or vendor/bin!")
        })
}

/// Every file under `project_dir` with one of `extensions` (all files when
/// `extensions` is empty)
///
/// Hidden entries and the [`EXCLUDED_DIRS`] are skipped. Paths come back
/// absolute and sorted so repeated runs see the same order.
pub fn project_files(project_dir: &Path, extensions: &[&str]) -> Result<FileSet> {
    if !project_dir.is_dir() {
        return Err(GateError::config(format!(
            "Specified directory {} does not exist",
            project_dir.display()
        )));
    }

    let walker = WalkBuilder::new(project_dir)
        .standard_filters(false)
        .hidden(true)
        .filter_entry(|entry| {
            let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
            !(is_dir
                && entry.depth() > 0
                && entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| EXCLUDED_DIRS.contains(&name)))
        })
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| GateError::Io(std::io::Error::other(e)))?;
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        let path = entry.path();
        if extensions.is_empty() || extensions.iter().any(|ext| has_extension(path, ext)) {
            files.push(path.to_path_buf());
        }
    }
    files.sort();

    tracing::debug!(count = files.len(), root = %project_dir.display(), "discovered project files");
    Ok(FileSet::new(files))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_project_directory_walks_up() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), PROJECT_MANIFEST);
        let nested = temp.path().join("src/Domain");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(project_directory(&nested).unwrap(), temp.path());
    }

    #[test]
    fn test_project_directory_without_manifest_is_config_error() {
        let temp = TempDir::new().unwrap();
        let err = project_directory(temp.path()).unwrap_err();
        assert!(matches!(err, GateError::Config(_)));
    }

    #[test]
    fn test_bin_directory_prefers_root_bin() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("bin")).unwrap();
        fs::create_dir_all(temp.path().join("vendor/bin")).unwrap();

        assert_eq!(bin_directory(temp.path()).unwrap(), temp.path().join("bin"));
    }

    #[test]
    fn test_bin_directory_falls_back_to_vendor_bin() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("vendor/bin")).unwrap();

        assert_eq!(
            bin_directory(temp.path()).unwrap(),
            temp.path().join("vendor/bin")
        );
    }

    #[test]
    fn test_missing_bin_directory_is_config_error() {
        let temp = TempDir::new().unwrap();
        let err = bin_directory(temp.path()).unwrap_err();
        assert!(err.to_string().contains("Bin directory not found"));
    }

    #[test]
    fn test_project_files_skips_excluded_and_hidden() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "src/A.php");
        touch(temp.path(), "src/style.scss");
        touch(temp.path(), "vendor/lib/B.php");
        touch(temp.path(), "app/cache/C.php");
        touch(temp.path(), "var/logs/D.php");
        touch(temp.path(), ".hidden/E.php");
        touch(temp.path(), "web/index.php");

        let files = project_files(temp.path(), &["php"]).unwrap();
        let found: Vec<_> = files.iter().map(Path::to_path_buf).collect();
        assert_eq!(
            found,
            vec![temp.path().join("src/A.php"), temp.path().join("web/index.php")]
        );

        let styled = project_files(temp.path(), &["php", "scss"]).unwrap();
        assert_eq!(styled.len(), 3);
        assert!(styled.contains(&temp.path().join("src/style.scss")));

        let all = project_files(temp.path(), &[]).unwrap();
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_project_files_missing_root() {
        let temp = TempDir::new().unwrap();
        assert!(project_files(&temp.path().join("nope"), &[]).is_err());
    }
}
