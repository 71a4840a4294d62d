//! Forward-slash normalized paths
//!
//! Artifact and state paths are compared and derived from each other, so they
//! are kept in one canonical spelling and only converted to a native
//! `PathBuf` when the filesystem is actually touched.

use std::path::{Path, PathBuf};

/// A path stored with forward slashes regardless of platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedPath {
    inner: String,
}

impl NormalizedPath {
    /// Normalize any path-like input, converting backslashes to slashes.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            inner: path.as_ref().to_string_lossy().replace('\\', "/"),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Native form for I/O calls.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Append a relative segment.
    pub fn join(&self, segment: &str) -> Self {
        let segment = segment.replace('\\', "/");
        let segment = segment.trim_start_matches('/');
        if self.inner.is_empty() {
            return Self {
                inner: segment.to_string(),
            };
        }
        if self.inner.ends_with('/') {
            Self {
                inner: format!("{}{}", self.inner, segment),
            }
        } else {
            Self {
                inner: format!("{}/{}", self.inner, segment),
            }
        }
    }

    /// The containing directory, if any.
    pub fn parent(&self) -> Option<Self> {
        let trimmed = self.inner.trim_end_matches('/');
        match trimmed.rfind('/') {
            Some(0) => Some(Self {
                inner: "/".to_string(),
            }),
            Some(idx) => Some(Self {
                inner: trimmed[..idx].to_string(),
            }),
            None => None,
        }
    }

    /// Last path component.
    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.inner.trim_end_matches('/');
        trimmed.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// File name without its final extension. Dotfiles keep their full name.
    pub fn file_stem(&self) -> Option<&str> {
        let name = self.file_name()?;
        match name.rfind('.') {
            Some(idx) if idx > 0 => Some(&name[..idx]),
            _ => Some(name),
        }
    }

    /// Final extension, without the dot.
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name()?;
        match name.rfind('.') {
            Some(idx) if idx > 0 => Some(&name[idx + 1..]),
            _ => None,
        }
    }

    /// Replace the last component, keeping the directory.
    pub fn with_file_name(&self, name: &str) -> Self {
        match self.parent() {
            Some(parent) => parent.join(name),
            None => Self::new(name),
        }
    }

    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backslashes_are_normalized() {
        let path = NormalizedPath::new("out\\db_interactive\\index.html");
        assert_eq!(path.as_str(), "out/db_interactive/index.html");
    }

    #[test]
    fn stem_and_extension() {
        let path = NormalizedPath::new("out/index.html");
        assert_eq!(path.file_stem(), Some("index"));
        assert_eq!(path.extension(), Some("html"));
    }

    #[test]
    fn dotfile_has_no_extension() {
        let path = NormalizedPath::new("out/.hidden");
        assert_eq!(path.file_stem(), Some(".hidden"));
        assert_eq!(path.extension(), None);
    }

    #[test]
    fn with_file_name_keeps_directory() {
        let path = NormalizedPath::new("out/site/index.html");
        assert_eq!(
            path.with_file_name("index.sync.json").as_str(),
            "out/site/index.sync.json"
        );
    }

    #[test]
    fn with_file_name_on_bare_name() {
        let path = NormalizedPath::new("index.html");
        assert_eq!(path.with_file_name("other.json").as_str(), "other.json");
    }

    #[test]
    fn join_handles_trailing_slash() {
        assert_eq!(NormalizedPath::new("out/").join("a.md").as_str(), "out/a.md");
        assert_eq!(NormalizedPath::new("out").join("a.md").as_str(), "out/a.md");
    }

    #[test]
    fn parent_of_root_child() {
        assert_eq!(
            NormalizedPath::new("/index.html").parent(),
            Some(NormalizedPath::new("/"))
        );
        assert_eq!(NormalizedPath::new("index.html").parent(), None);
    }
}
