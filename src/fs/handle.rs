//! Lightweight path handles.
//!
//! Handles have no identity beyond their path value: the derived parts
//! (`stem`, `extension`, `basename`) are recomputed from the path every time it
//! changes, and two handles with equal paths are equal.

use crate::error::MfmError;
use std::fs;
use std::path::{Path, PathBuf};

/// Anything that lives at a filesystem path.
///
/// Implemented by [`PathHandle`] and [`DirectoryHandle`]; external image or
/// media wrappers implement it so operations can take either.
pub trait HasPath {
    fn path(&self) -> &Path;

    /// Extension without the leading dot, if any.
    fn extension(&self) -> Option<&str> {
        self.path().extension().and_then(|e| e.to_str())
    }
}

impl HasPath for Path {
    fn path(&self) -> &Path {
        self
    }
}

impl HasPath for PathBuf {
    fn path(&self) -> &Path {
        self
    }
}

/// A file path with derived `stem` and `extension`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathHandle {
    path: PathBuf,
    stem: String,
    extension: Option<String>,
}

impl PathHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (stem, extension) = split_name(&path);
        Self {
            path,
            stem,
            extension,
        }
    }

    /// Replace the path and recompute the derived parts.
    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        *self = Self::new(path);
    }

    /// File name without its extension.
    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// Full file name including the extension.
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }

    /// Directory portion of the path.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn is_file(&self) -> bool {
        self.path.is_file()
    }

    /// Size in bytes.
    pub fn size(&self) -> Result<u64, MfmError> {
        fs::metadata(&self.path)
            .map(|m| m.len())
            .map_err(|e| MfmError::io(&self.path, e))
    }

    /// True when the extension is one of `valid_types`.
    ///
    /// Comparison ignores ASCII case and a leading dot on either side, so
    /// `".PDF"` and `"pdf"` both accept `report.pdf`.
    pub fn is_valid<S: AsRef<str>>(&self, valid_types: &[S]) -> bool {
        let Some(ext) = self.extension.as_deref() else {
            return false;
        };
        valid_types
            .iter()
            .any(|t| t.as_ref().trim_start_matches('.').eq_ignore_ascii_case(ext))
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.path
    }
}

impl HasPath for PathHandle {
    fn path(&self) -> &Path {
        &self.path
    }

    fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }
}

impl AsRef<Path> for PathHandle {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Display for PathHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// A directory path with a derived `basename`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirectoryHandle {
    path: PathBuf,
    basename: String,
}

impl DirectoryHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let basename = basename_of(&path);
        Self { path, basename }
    }

    pub fn basename(&self) -> &str {
        &self.basename
    }

    /// Append `child` to this handle's own path.
    pub fn join(&mut self, child: impl AsRef<Path>) {
        self.path.push(child);
        self.basename = basename_of(&self.path);
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn is_dir(&self) -> bool {
        self.path.is_dir()
    }

    /// Names of every entry (files and sub-folders) in the directory.
    pub fn list_dir(&self) -> Result<Vec<String>, MfmError> {
        let entries = fs::read_dir(&self.path).map_err(|e| MfmError::io(&self.path, e))?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| MfmError::io(&self.path, e))?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }
}

impl HasPath for DirectoryHandle {
    fn path(&self) -> &Path {
        &self.path
    }
}

impl AsRef<Path> for DirectoryHandle {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

/// Split a path's file name into `(stem, extension)`.
///
/// Dotfiles such as `.bashrc` have no extension; the whole name is the stem.
pub(crate) fn split_name(path: &Path) -> (String, Option<String>) {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned());
    (stem, extension)
}

fn basename_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
