//! Normalized path handling for cross-platform compatibility

use std::path::{Path, PathBuf};

/// A site path normalized to use forward slashes internally.
///
/// All path math in the configuration layer is lexical and
/// platform-independent; conversion to the native representation
/// happens only at I/O boundaries via [`SitePath::to_native`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SitePath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl SitePath {
    /// Create a new SitePath from any path-like input.
    ///
    /// Converts backslashes to forward slashes for internal storage.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        let normalized = path_str.replace('\\', "/");
        Self { inner: normalized }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment.
    pub fn join(&self, segment: &str) -> Self {
        let segment_normalized = segment.replace('\\', "/");
        let joined = if self.inner.ends_with('/') {
            format!("{}{}", self.inner, segment_normalized)
        } else {
            format!("{}/{}", self.inner, segment_normalized)
        };
        Self { inner: joined }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.inner.trim_end_matches('/');
        trimmed.rsplit('/').next()
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 { None } else { Some(&name[idx + 1..]) }
        })
    }

    /// Check whether the path is absolute.
    ///
    /// Recognizes POSIX roots (`/...`) and Windows drive prefixes
    /// (`C:/...`) in the normalized representation.
    pub fn is_absolute(&self) -> bool {
        if self.inner.starts_with('/') {
            return true;
        }
        let mut chars = self.inner.chars();
        matches!(
            (chars.next(), chars.next()),
            (Some(c), Some(':')) if c.is_ascii_alphabetic()
        )
    }

    /// Resolve this path to absolute form against `base`.
    ///
    /// Already-absolute paths are returned unchanged. Relative paths are
    /// lexically joined onto `base` and `.`/`..` segments are collapsed;
    /// no filesystem access happens.
    pub fn absolutize(&self, base: &SitePath) -> SitePath {
        if self.is_absolute() {
            return self.clone();
        }
        let combined = base.join(&self.inner);
        SitePath {
            inner: normalize_segments(&combined.inner),
        }
    }
}

/// Collapse `.` and `..` segments in a forward-slash path.
fn normalize_segments(path: &str) -> String {
    let absolute = path.starts_with('/');
    // A Windows drive prefix stays glued to the front
    let (prefix, rest) = match path.split_once('/') {
        Some((head, tail)) if head.ends_with(':') => (Some(head), tail),
        _ => (None, path.trim_start_matches('/')),
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in rest.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                // Leading `..` on a rooted path has nowhere to go
                if segments.last().is_some_and(|s| *s != "..") {
                    segments.pop();
                } else if !absolute && prefix.is_none() {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }

    let body = segments.join("/");
    match prefix {
        Some(drive) => format!("{}/{}", drive, body),
        None if absolute => format!("/{}", body),
        None => body,
    }
}

impl AsRef<Path> for SitePath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for SitePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for SitePath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SitePath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
