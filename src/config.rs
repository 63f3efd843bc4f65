//! Configuration for the media-files-manager workspace.
//!
//! All filesystem behaviour is anchored on [`ManagerConfig`], built via its
//! [`ManagerConfigBuilder`]. The config names the sandbox root, the
//! application directory inside it, where activity logs go and which
//! extensions count as supported documents and images.

use crate::error::MfmError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default application directory, relative to the sandbox root.
pub const DEFAULT_APP_DIR: &str = "Media Files Manager";

/// Output folders created under the application directory on first run.
pub const DEFAULT_OUTPUT_DIRS: &[&str] = &[
    "Extract Images",
    "PDF to Office",
    "Logs",
    "Image Convertion",
    "Extract GIFs",
    "Downloads",
    "Video Thumbnail",
    "Audio Thumbnail",
    "Temp",
    "Extracted Audio",
];

/// Configuration for sandboxed file operations.
///
/// Built via [`ManagerConfig::builder()`] or using
/// [`ManagerConfig::default()`].
///
/// # Example
/// ```rust
/// use media_files_manager::ManagerConfig;
///
/// let config = ManagerConfig::builder()
///     .root("/tmp/work")
///     .app_dir("Media")
///     .build()
///     .unwrap();
/// assert_eq!(config.log_dir(), std::path::PathBuf::from("Media/Logs"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// Sandbox root. `None` means the process working directory.
    pub root: Option<PathBuf>,

    /// Application directory, relative to the root. Default: "Media Files Manager".
    pub app_dir: PathBuf,

    /// Log directory override. If None, uses `<app_dir>/Logs`.
    pub log_dir: Option<PathBuf>,

    /// Folders created under `app_dir` by workspace initialisation.
    pub output_dirs: Vec<String>,

    /// Extensions accepted as documents (no leading dot).
    pub supported_documents: Vec<String>,

    /// Extensions accepted as images (no leading dot).
    pub supported_images: Vec<String>,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            root: None,
            app_dir: PathBuf::from(DEFAULT_APP_DIR),
            log_dir: None,
            output_dirs: DEFAULT_OUTPUT_DIRS.iter().map(|s| s.to_string()).collect(),
            supported_documents: to_strings(&["pdf"]),
            supported_images: to_strings(&[
                "png", "jpg", "jpeg", "webp", "bmp", "gif", "tiff", "ico",
            ]),
        }
    }
}

impl ManagerConfig {
    /// Create a new builder for `ManagerConfig`.
    pub fn builder() -> ManagerConfigBuilder {
        ManagerConfigBuilder {
            config: Self::default(),
        }
    }

    /// Effective log directory, relative to the root unless absolute.
    pub fn log_dir(&self) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| self.app_dir.join("Logs"))
    }

    /// Paths of every output folder, relative to the root.
    pub fn output_paths(&self) -> Vec<PathBuf> {
        self.output_dirs
            .iter()
            .map(|d| self.app_dir.join(d))
            .collect()
    }
}

/// Builder for [`ManagerConfig`].
#[derive(Debug)]
pub struct ManagerConfigBuilder {
    config: ManagerConfig,
}

impl ManagerConfigBuilder {
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.root = Some(root.into());
        self
    }

    pub fn app_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.app_dir = dir.into();
        self
    }

    pub fn log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.log_dir = Some(dir.into());
        self
    }

    pub fn output_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.output_dirs = dirs.into_iter().map(Into::into).collect();
        self
    }

    pub fn supported_documents<I, S>(mut self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.supported_documents = normalise_exts(exts);
        self
    }

    pub fn supported_images<I, S>(mut self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.supported_images = normalise_exts(exts);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ManagerConfig, MfmError> {
        let c = &self.config;
        if c.app_dir.as_os_str().is_empty() {
            return Err(MfmError::InvalidConfig(
                "Application directory must not be empty".into(),
            ));
        }
        if c.app_dir.is_absolute() {
            return Err(MfmError::InvalidConfig(format!(
                "Application directory must be relative to the root, got {}",
                c.app_dir.display()
            )));
        }
        if let Some(dir) = c.output_dirs.iter().find(|d| d.trim().is_empty()) {
            return Err(MfmError::InvalidConfig(format!(
                "Output folder names must not be blank, got {dir:?}"
            )));
        }
        Ok(self.config)
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn normalise_exts<I, S>(exts: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    exts.into_iter()
        .map(|e| e.into().trim_start_matches('.').to_ascii_lowercase())
        .collect()
}
