//! Sandboxed directory creation and restricted deletion.
//!
//! A [`Sandbox`] owns a canonical root directory (by default the process
//! working directory). Mutations are allowed only on paths whose resolved
//! absolute form lies inside that root.
//!
//! ## Containment
//!
//! Paths are compared component by component, not as strings, so with a
//! root of `/home/user/app` the sibling `/home/user/app-evil` is outside.
//! Resolution joins relative paths onto the root, removes `.` and `..`
//! lexically, then canonicalises the longest existing ancestor of the
//! parent so symlinked directories are followed. The final component itself
//! is not followed: removing a symlink removes the link.

use crate::config::ManagerConfig;
use crate::error::MfmError;
use crate::fs::resolver::PathResolver;
use crate::fs::sanitize::sanitize_component;
use crate::output::OperationResult;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

/// Operation label used on removal results.
pub const REMOVE_OPERATION: &str = "Remove";

/// A root directory that bounds every filesystem mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sandbox {
    root: PathBuf,
}

impl Sandbox {
    /// Sandbox rooted at `root`, which must be an existing directory.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, MfmError> {
        let root = root.as_ref();
        let canonical = fs::canonicalize(root).map_err(|e| MfmError::io(root, e))?;
        if !canonical.is_dir() {
            return Err(MfmError::NotFound { path: canonical });
        }
        debug!("Sandbox root: {}", canonical.display());
        Ok(Self { root: canonical })
    }

    /// Sandbox rooted at the process working directory.
    pub fn from_current_dir() -> Result<Self, MfmError> {
        let cwd = std::env::current_dir().map_err(|e| MfmError::io(".", e))?;
        Self::new(cwd)
    }

    /// Sandbox rooted at `config.root`, or the working directory if unset.
    pub fn from_config(config: &ManagerConfig) -> Result<Self, MfmError> {
        match &config.root {
            Some(root) => Self::new(root),
            None => Self::from_current_dir(),
        }
    }

    /// The canonical root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// A [`PathResolver`] whose relative paths resolve against the root.
    pub fn resolver(&self) -> PathResolver {
        PathResolver::new(&self.root)
    }

    /// Resolved absolute form of `path` (see module docs).
    pub fn absolute(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        let joined = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };
        canonicalize_parent(&normalize_lexically(&joined))
    }

    /// True if `path` resolves to the root or one of its descendants.
    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.absolute(path).starts_with(&self.root)
    }

    fn check(&self, path: &Path) -> Result<PathBuf, MfmError> {
        let abs = self.absolute(path);
        if abs.starts_with(&self.root) {
            Ok(abs)
        } else {
            Err(MfmError::RestrictionViolation {
                path: abs,
                root: self.root.clone(),
            })
        }
    }

    /// Create `path` (and any missing parents) inside the sandbox.
    ///
    /// Only the terminal component is sanitized; if nothing usable is left
    /// (empty, `.` or `..`) the parent is created instead. Returns the
    /// directory that now exists, which differs from `path` when
    /// sanitisation changed the name.
    pub fn try_make_directory(&self, path: impl AsRef<Path>) -> Result<PathBuf, MfmError> {
        let abs = self.check(path.as_ref())?;
        if abs == self.root {
            return Ok(abs);
        }

        let target = match (abs.parent(), abs.file_name()) {
            (Some(parent), Some(name)) => match sanitize_component(&name.to_string_lossy()) {
                Some(clean) => parent.join(clean),
                None => parent.to_path_buf(),
            },
            _ => abs,
        };
        // Sanitizing may have changed what the path points at.
        let target = self.check(&target)?;

        if target.is_dir() {
            debug!("Directory already exists: {}", target.display());
            return Ok(target);
        }

        fs::create_dir_all(&target).map_err(|e| MfmError::io(&target, e))?;
        info!("Created directory: {}", target.display());
        Ok(target)
    }

    /// Boolean form of [`Sandbox::try_make_directory`].
    ///
    /// `false` when the path is outside the root (nothing is created) or the
    /// directory could not be created.
    pub fn make_directory(&self, path: impl AsRef<Path>) -> bool {
        match self.try_make_directory(path.as_ref()) {
            Ok(_) => true,
            Err(e) => {
                warn!("make_directory refused: {}", e);
                false
            }
        }
    }

    /// Permanently delete a regular file inside the sandbox.
    ///
    /// Checked in order: the path must be an existing file
    /// ([`MfmError::NotFound`]), then inside the root
    /// ([`MfmError::RestrictionViolation`]). Deletion errors surface as
    /// [`MfmError::Io`].
    pub fn try_remove_file(&self, path: impl AsRef<Path>) -> Result<PathBuf, MfmError> {
        let path = path.as_ref();
        let located = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };
        if !located.is_file() {
            return Err(MfmError::NotFound { path: located });
        }
        let abs = self.check(path)?;
        fs::remove_file(&abs).map_err(|e| MfmError::io(&abs, e))?;
        info!("Removed file: {}", abs.display());
        Ok(abs)
    }

    /// [`Sandbox::try_remove_file`] folded into an [`OperationResult`].
    pub fn remove_file(&self, path: impl AsRef<Path>) -> OperationResult {
        let path = path.as_ref();
        let subject = OperationResult::subject_path(path);
        match self.try_remove_file(path) {
            Ok(_) => OperationResult::success(subject, REMOVE_OPERATION, "File removed permanently"),
            Err(e) => {
                warn!("Remove failed for {}: {}", subject, e);
                OperationResult::failure(subject, REMOVE_OPERATION, e.result_text())
            }
        }
    }
}

/// Remove `.` and resolve `..` without touching the filesystem.
///
/// `..` never climbs above the path's root.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::Prefix(_) | Component::RootDir => out.push(comp.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                if out.file_name().is_some() {
                    out.pop();
                }
            }
            Component::Normal(part) => out.push(part),
        }
    }
    out
}

/// Canonicalise the longest existing ancestor of `path`'s parent and
/// re-append the remaining components.
fn canonicalize_parent(path: &Path) -> PathBuf {
    let Some(name) = path.file_name() else {
        return fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    };
    let parent = path.parent().unwrap_or_else(|| Path::new(""));

    for ancestor in parent.ancestors() {
        if let Ok(canonical) = fs::canonicalize(ancestor) {
            let rest = parent.strip_prefix(ancestor).unwrap_or_else(|_| Path::new(""));
            return canonical.join(rest).join(name);
        }
    }
    path.to_path_buf()
}
