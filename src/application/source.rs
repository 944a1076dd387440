//! Table sources
//!
//! A table can come from a URL, a file, or be passed inline. Call sites use the
//! explicit [`DataSource`] variants; [`DataSource::probe`] keeps the loose
//! "URL, else existing path, else inline text" resolution for user input.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::infrastructure::traits::FileSystem;

const URL_PREFIX: &str = "url:";
const FILE_PREFIX: &str = "file:";
const INLINE_PREFIX: &str = "inline:";

/// Where a table's text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// Fetched over HTTP(S)
    Remote(String),
    /// Read from a local file
    Path(PathBuf),
    /// The descriptor is the table text itself
    Inline(String),
}

impl DataSource {
    /// Resolve a user-supplied descriptor.
    ///
    /// `url:`, `file:` and `inline:` prefixes pick a variant directly.
    /// Otherwise: `http://` / `https://` is remote, an existing path is a
    /// file, and anything else is inline table text. Relative paths are
    /// taken relative to `base`.
    pub fn probe(descriptor: &str, base: &Path, fs: &dyn FileSystem) -> Self {
        if let Some(url) = descriptor.strip_prefix(URL_PREFIX) {
            return Self::Remote(url.to_string());
        }
        if let Some(path) = descriptor.strip_prefix(FILE_PREFIX) {
            return Self::Path(base.join(path));
        }
        if let Some(text) = descriptor.strip_prefix(INLINE_PREFIX) {
            return Self::Inline(text.to_string());
        }

        if is_remote(descriptor) {
            return Self::Remote(descriptor.to_string());
        }
        let candidate = base.join(descriptor);
        if fs.exists(&candidate) {
            Self::Path(candidate)
        } else {
            Self::Inline(descriptor.to_string())
        }
    }
}

fn is_remote(descriptor: &str) -> bool {
    descriptor.starts_with("http://") || descriptor.starts_with("https://")
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(url) => write!(f, "{url}"),
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Inline(text) => write!(f, "<inline, {} bytes>", text.len()),
        }
    }
}
