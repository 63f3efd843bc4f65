//! Path-safety and naming subsystem.
//!
//! Every filesystem mutation in the crate goes through this module so the
//! sandbox rule is enforced in one place.
//!
//! ```text
//! sanitize ──▶ resolver ──▶ sandbox
//! (names)      (unique)     (mkdir / remove inside root)
//! ```
//!
//! 1. [`sanitize`]: strip characters illegal in common file-name conventions
//! 2. [`handle`]  : `PathHandle` / `DirectoryHandle` and the `HasPath` trait
//! 3. [`resolver`]: pick a collision-free name inside a target directory
//! 4. [`sandbox`] : component-wise containment, directory creation and
//!    restricted deletion

pub mod handle;
pub mod resolver;
pub mod sandbox;
pub mod sanitize;

pub use handle::{DirectoryHandle, HasPath, PathHandle};
pub use resolver::{sanitize_and_deduplicate, PathResolver};
pub use sandbox::Sandbox;
pub use sanitize::{sanitize_component, sanitize_file_name, ILLEGAL_FILENAME_CHARS};
