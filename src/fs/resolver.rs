//! Collision-free output naming.
//!
//! Given a desired output path, [`PathResolver::sanitize_and_deduplicate`]
//! strips illegal characters from the file name and, if that name is
//! already taken in the target directory, appends the smallest free
//! disambiguator: `name(1).ext`, `name(2).ext`, …
//!
//! Nothing is created. The listing is taken fresh on every call, so two
//! concurrent callers targeting the same directory may pick the same name;
//! callers that need atomicity must create the file with `create_new`.

use crate::error::MfmError;
use crate::fs::handle::{split_name, DirectoryHandle, PathHandle};
use crate::fs::sanitize::sanitize_component;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Name used when sanitisation leaves nothing behind.
pub const FALLBACK_FILE_NAME: &str = "untitled";

/// Resolves output names relative to an optional base directory.
///
/// With no base, relative paths are taken as-is (i.e. relative to the
/// process working directory).
#[derive(Debug, Clone, Default)]
pub struct PathResolver {
    base: Option<PathBuf>,
}

impl PathResolver {
    /// Resolve relative paths against `base`.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: Some(base.into()),
        }
    }

    /// Compute a sanitized, collision-free location for `path`.
    ///
    /// Only the file-name portion is sanitized; the directory portion is
    /// used verbatim. A name that sanitizes to nothing, `.` or `..` becomes
    /// [`FALLBACK_FILE_NAME`]. A missing target directory is treated as empty.
    pub fn sanitize_and_deduplicate(&self, path: impl AsRef<Path>) -> PathHandle {
        let path = path.as_ref();
        let dir = self.target_dir(path);

        let raw_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name =
            sanitize_component(&raw_name).unwrap_or_else(|| FALLBACK_FILE_NAME.to_string());

        let taken = existing_names(&dir).unwrap_or_else(|e| {
            warn!("Cannot list {}, result may collide: {}", dir.display(), e);
            HashSet::new()
        });
        let (stem, ext) = split_name(Path::new(&name));
        let suffix = ext.map(|e| format!(".{e}")).unwrap_or_default();

        let mut candidate = name.clone();
        let mut n: u64 = 1;
        while taken.contains(&candidate) {
            candidate = format!("{stem}({n}){suffix}");
            n += 1;
        }

        if candidate != raw_name {
            debug!("Resolved '{}' to '{}' in {}", raw_name, candidate, dir.display());
        }
        PathHandle::new(dir.join(candidate))
    }

    fn target_dir(&self, path: &Path) -> PathBuf {
        let parent = path.parent().unwrap_or_else(|| Path::new(""));
        match &self.base {
            Some(base) if !parent.is_absolute() => base.join(parent),
            _ => parent.to_path_buf(),
        }
    }
}

/// [`PathResolver::sanitize_and_deduplicate`] relative to the working directory.
pub fn sanitize_and_deduplicate(path: impl AsRef<Path>) -> PathHandle {
    PathResolver::default().sanitize_and_deduplicate(path)
}

/// Names already present in `dir`. A directory that does not exist yet is
/// empty; any other listing failure is an error.
fn existing_names(dir: &Path) -> Result<HashSet<String>, MfmError> {
    let listing_dir = if dir.as_os_str().is_empty() {
        Path::new(".")
    } else {
        dir
    };
    if !listing_dir.exists() {
        return Ok(HashSet::new());
    }
    let names = DirectoryHandle::new(listing_dir).list_dir()?;
    Ok(names.into_iter().collect())
}
