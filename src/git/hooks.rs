use std::fs;
use std::path::PathBuf;

use super::GitRepo;
use crate::error::{GateError, Result};

/// Name of the hook file the gate manages
pub const PRE_COMMIT: &str = "pre-commit";

/// A file with this name in the hooks directory keeps hooks user-managed
pub const MANUAL_MARKER: &str = "manual";

/// Line identifying a hook written by this tool
pub const HOOK_MARKER: &str = "# installed by quality-gate";

/// Script run by git before each commit
pub fn pre_commit_script() -> String {
    format!(
        "#!/bin/sh\n\
         {HOOK_MARKER}\n\
         # touch .git/hooks/{MANUAL_MARKER} to manage this hook yourself\n\
         \n\
         exec quality-gate check --staged\n"
    )
}

/// What `install_pre_commit` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookInstall {
    Installed(PathBuf),
    /// Left alone because of the manual marker
    KeptManual(PathBuf),
}

/// Current state of the pre-commit hook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookState {
    Missing,
    Installed,
    /// Present but not written by this tool
    Foreign,
}

impl GitRepo {
    pub fn hook_path(&self) -> PathBuf {
        self.hooks_dir().join(PRE_COMMIT)
    }

    pub fn is_manual(&self) -> bool {
        self.hooks_dir().join(MANUAL_MARKER).exists()
    }

    /// Write the pre-commit hook and check it landed intact
    ///
    /// With the manual marker present the existing hook is kept unless
    /// `force` is set; the hook must exist either way.
    pub fn install_pre_commit(&self, force: bool) -> Result<HookInstall> {
        let hooks_dir = self.hooks_dir();
        let hook_path = self.hook_path();

        if self.is_manual() && !force {
            tracing::info!(
                dir = %hooks_dir.display(),
                "manual hooks marker found, keeping existing hooks"
            );
            if !hook_path.is_file() {
                return Err(GateError::config("Git pre-commit hook not installed!"));
            }
            return Ok(HookInstall::KeptManual(hook_path));
        }

        let script = pre_commit_script();
        fs::create_dir_all(&hooks_dir)?;
        fs::write(&hook_path, &script)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&hook_path)?.permissions();
            perms.set_mode(0o755);
            fs::set_permissions(&hook_path, perms)?;
        }

        if fs::read_to_string(&hook_path)? != script {
            return Err(GateError::config(format!(
                "Error setting up git hooks: {} does not match the expected content",
                hook_path.display()
            )));
        }

        tracing::debug!(path = %hook_path.display(), "installed pre-commit hook");
        Ok(HookInstall::Installed(hook_path))
    }

    /// Remove the pre-commit hook if this tool wrote it
    ///
    /// Returns whether a file was removed.
    pub fn remove_pre_commit(&self) -> Result<bool> {
        match self.pre_commit_state()? {
            HookState::Installed => {
                fs::remove_file(self.hook_path())?;
                Ok(true)
            }
            HookState::Foreign => Err(GateError::config(format!(
                "{} was not installed by quality-gate, leaving it in place",
                self.hook_path().display()
            ))),
            HookState::Missing => Ok(false),
        }
    }

    pub fn pre_commit_state(&self) -> Result<HookState> {
        let hook_path = self.hook_path();
        if !hook_path.is_file() {
            return Ok(HookState::Missing);
        }

        let content = fs::read_to_string(&hook_path)?;
        Ok(if content.lines().any(|line| line.trim() == HOOK_MARKER) {
            HookState::Installed
        } else {
            HookState::Foreign
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::Repository;
    use tempfile::TempDir;

    fn repo() -> (TempDir, GitRepo) {
        let temp = TempDir::new().unwrap();
        Repository::init(temp.path()).unwrap();
        let git = GitRepo::open(temp.path()).unwrap();
        (temp, git)
    }

    #[test]
    fn test_install_writes_executable_hook() {
        let (_temp, git) = repo();

        let outcome = git.install_pre_commit(false).unwrap();
        assert_eq!(outcome, HookInstall::Installed(git.hook_path()));
        assert_eq!(fs::read_to_string(git.hook_path()).unwrap(), pre_commit_script());
        assert_eq!(git.pre_commit_state().unwrap(), HookState::Installed);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(git.hook_path()).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o755);
        }
    }

    #[test]
    fn test_install_overwrites_foreign_hook() {
        let (_temp, git) = repo();
        fs::create_dir_all(git.hooks_dir()).unwrap();
        fs::write(git.hook_path(), "#!/bin/sh\nexit 0\n").unwrap();
        assert_eq!(git.pre_commit_state().unwrap(), HookState::Foreign);

        git.install_pre_commit(false).unwrap();
        assert_eq!(git.pre_commit_state().unwrap(), HookState::Installed);
    }

    #[test]
    fn test_manual_marker_keeps_existing_hook() {
        let (_temp, git) = repo();
        fs::create_dir_all(git.hooks_dir()).unwrap();
        fs::write(git.hooks_dir().join(MANUAL_MARKER), "").unwrap();
        fs::write(git.hook_path(), "#!/bin/sh\nmy-own-checks\n").unwrap();

        let outcome = git.install_pre_commit(false).unwrap();
        assert_eq!(outcome, HookInstall::KeptManual(git.hook_path()));
        assert_eq!(
            fs::read_to_string(git.hook_path()).unwrap(),
            "#!/bin/sh\nmy-own-checks\n"
        );

        git.install_pre_commit(true).unwrap();
        assert_eq!(git.pre_commit_state().unwrap(), HookState::Installed);
    }

    #[test]
    fn test_manual_marker_without_hook_is_error() {
        let (_temp, git) = repo();
        fs::create_dir_all(git.hooks_dir()).unwrap();
        fs::write(git.hooks_dir().join(MANUAL_MARKER), "").unwrap();

        let err = git.install_pre_commit(false).unwrap_err();
        assert!(err.to_string().contains("pre-commit hook not installed"));
    }

    #[test]
    fn test_remove_only_touches_own_hook() {
        let (_temp, git) = repo();
        assert!(!git.remove_pre_commit().unwrap());

        git.install_pre_commit(false).unwrap();
        assert!(git.remove_pre_commit().unwrap());
        assert_eq!(git.pre_commit_state().unwrap(), HookState::Missing);

        fs::write(git.hook_path(), "#!/bin/sh\nexit 0\n").unwrap();
        assert!(git.remove_pre_commit().is_err());
        assert!(git.hook_path().exists());
    }
}
