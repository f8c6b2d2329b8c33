//! Remote locations inside a file share.

use std::fmt;

/// A directory or file inside a share, addressed by its path segments.
///
/// Locations are immutable; children are derived with [`RemoteLocation::child`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemoteLocation {
    share: String,
    segments: Vec<String>,
}

impl RemoteLocation {
    /// Build a location from a share name and a slash-separated path.
    ///
    /// Empty segments and `.` are dropped, so `"/a//b/"` and `"a/b"` are the same location.
    pub fn new(share: impl Into<String>, path: &str) -> Self {
        let segments = path
            .split('/')
            .filter(|s| !s.is_empty() && *s != ".")
            .map(str::to_string)
            .collect();

        Self {
            share: share.into(),
            segments,
        }
    }

    /// The share root.
    pub fn root(share: impl Into<String>) -> Self {
        Self::new(share, "")
    }

    /// Derive the location of a direct child.
    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Self {
            share: self.share.clone(),
            segments,
        }
    }

    pub fn share(&self) -> &str {
        &self.share
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Path inside the share, without a leading slash.
    pub fn path(&self) -> String {
        self.segments.join("/")
    }

    /// Last path segment (the basename), `None` for the share root.
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for RemoteLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            write!(f, "{}/", self.share)
        } else {
            write!(f, "{}/{}", self.share, self.path())
        }
    }
}
