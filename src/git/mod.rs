//! Git integration
//!
//! Opens the repository with git2, lists the files staged for the next
//! commit and manages the pre-commit hook.

use std::path::{Path, PathBuf};

use git2::{Delta, DiffOptions, Repository};

use crate::error::{GateError, Result};
use crate::fileset::FileSet;

mod hooks;

pub use hooks::{HOOK_MARKER, HookInstall, HookState, MANUAL_MARKER, PRE_COMMIT, pre_commit_script};

pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            repo: Repository::open(path)?,
        })
    }

    /// Find the repository containing `path`
    pub fn discover(path: impl AsRef<Path>) -> Result<Self> {
        let repo = Repository::discover(path.as_ref()).map_err(|e| {
            GateError::config(format!(
                "No git repository found at {}: {}",
                path.as_ref().display(),
                e.message()
            ))
        })?;
        Ok(Self { repo })
    }

    /// Working tree root
    pub fn workdir(&self) -> Result<&Path> {
        self.repo
            .workdir()
            .ok_or_else(|| GateError::config("Repository has no working directory"))
    }

    /// The `.git/hooks` directory
    pub fn hooks_dir(&self) -> PathBuf {
        self.repo.path().join("hooks")
    }

    /// Files added, copied or modified in the index relative to HEAD
    ///
    /// Deleted and renamed entries are left out since there is nothing left
    /// to check at their old path. Before the first commit every staged file
    /// counts as added.
    pub fn staged_files(&self) -> Result<FileSet> {
        let workdir = self.workdir()?;
        let head_tree = match self.repo.head() {
            Ok(head) => Some(head.peel_to_tree()?),
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => None,
            Err(e) if e.code() == git2::ErrorCode::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        let mut diff_opts = DiffOptions::new();
        diff_opts.context_lines(0);
        let diff = self
            .repo
            .diff_tree_to_index(head_tree.as_ref(), None, Some(&mut diff_opts))?;

        let mut files = Vec::new();
        for delta in diff.deltas() {
            if !matches!(delta.status(), Delta::Added | Delta::Copied | Delta::Modified) {
                continue;
            }
            if let Some(path) = delta.new_file().path() {
                files.push(workdir.join(path));
            }
        }

        tracing::debug!(count = files.len(), "collected staged files");
        Ok(FileSet::new(files))
    }
}
