//! Normalized path handling for cross-platform compatibility

use std::path::{Path, PathBuf};

/// A path normalized to use forward slashes internally.
///
/// Provides consistent path handling across platforms by normalizing
/// all paths to forward slashes internally and converting to
/// platform-native format only at I/O boundaries. Dot segments are
/// resolved lexically, so `a/./b/../c` is stored as `a/c`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    ///
    /// Converts backslashes to forward slashes and resolves `.` and `..`
    /// segments. A relative path keeps its leading `..` segments so that
    /// escapes from a base directory stay visible.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        Self {
            inner: clean(&path_str.replace('\\', "/")),
        }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment, resolving dot segments.
    pub fn join(&self, segment: &str) -> Self {
        let segment_normalized = segment.replace('\\', "/");
        let joined = if self.inner.ends_with('/') {
            format!("{}{}", self.inner, segment_normalized)
        } else {
            format!("{}/{}", self.inner, segment_normalized)
        };
        Self {
            inner: clean(&joined),
        }
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        let trimmed = self.inner.trim_end_matches('/');
        match trimmed.rfind('/') {
            Some(idx) if idx > 0 => Some(Self {
                inner: trimmed[..idx].to_string(),
            }),
            Some(0) if trimmed.len() > 1 => Some(Self {
                inner: "/".to_string(),
            }),
            _ => None,
        }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.inner.trim_end_matches('/');
        trimmed.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Iterate over the non-empty segments of this path.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.inner.split('/').filter(|s| !s.is_empty())
    }

    /// Whether any segment of this path is exactly `name`.
    pub fn has_segment(&self, name: &str) -> bool {
        self.segments().any(|s| s == name)
    }

    /// Compute the lexical path of `self` relative to `base`.
    ///
    /// Both paths should be of the same kind (both absolute or both
    /// relative). The result starts with `..` when `self` lies outside
    /// `base`, and is `.` when the two are equal.
    pub fn relative_to(&self, base: &NormalizedPath) -> String {
        let target: Vec<&str> = self.segments().collect();
        let origin: Vec<&str> = base.segments().collect();

        let common = target
            .iter()
            .zip(origin.iter())
            .take_while(|(a, b)| a == b)
            .count();

        let mut parts: Vec<&str> = Vec::new();
        parts.extend(std::iter::repeat_n("..", origin.len() - common));
        parts.extend(&target[common..]);

        if parts.is_empty() {
            ".".to_string()
        } else {
            parts.join("/")
        }
    }

    /// Whether `self` lies at or beneath `base` (lexically).
    pub fn is_within(&self, base: &NormalizedPath) -> bool {
        let relative = self.relative_to(base);
        relative != ".." && !relative.starts_with("../")
    }

    /// Check if this path exists on the filesystem.
    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }
}

/// Whether two paths refer to the same file.
///
/// Compares canonicalized paths when both can be resolved on disk. When
/// either cannot be canonicalized, falls back to a case-insensitive
/// comparison of the normalized forms.
pub fn same_file(a: impl AsRef<Path>, b: impl AsRef<Path>) -> bool {
    match (dunce::canonicalize(a.as_ref()), dunce::canonicalize(b.as_ref())) {
        (Ok(ca), Ok(cb)) => ca == cb,
        _ => {
            let na = NormalizedPath::new(a);
            let nb = NormalizedPath::new(b);
            na.as_str().to_lowercase() == nb.as_str().to_lowercase()
        }
    }
}

/// Resolve `.`/`..` segments and collapse repeated slashes.
fn clean(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match parts.last() {
                // never pop a drive prefix such as `C:`
                Some(last) if *last != ".." && !last.ends_with(':') => {
                    parts.pop();
                }
                Some(last) if last.ends_with(':') => {}
                _ if rooted => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }

    let body = parts.join("/");
    match (rooted, body.is_empty()) {
        (true, _) => format!("/{body}"),
        (false, true) => ".".to_string(),
        (false, false) => body,
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
