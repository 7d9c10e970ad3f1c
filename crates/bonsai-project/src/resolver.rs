//! Expansion of manifest patterns into concrete project files
//!
//! Patterns are joined onto the project directory and glob-expanded
//! (`*`, `?`, `[...]`; `**` behaves like `*`). Matched directories are walked
//! recursively. The resulting set is recomputed on every call and never
//! persisted.

use std::collections::BTreeSet;

use bonsai_fs::{NormalizedPath, ProjectPath, same_file};
use glob::{MatchOptions, Pattern};
use walkdir::WalkDir;

use crate::{Error, ProjectFile, Result};

/// Suffix of compiled python bytecode, never uploaded.
const BYTECODE_SUFFIX: &str = ".pyc";

fn match_options() -> MatchOptions {
    MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: true,
    }
}

/// Collapse recursive wildcards so `**` matches a single path segment.
fn flatten_recursive_wildcards(pattern: &str) -> String {
    let mut flattened = pattern.to_string();
    while flattened.contains("**") {
        flattened = flattened.replace("**", "*");
    }
    flattened
}

/// Build the absolute glob for `pattern` under `project_dir`.
///
/// The project directory itself is escaped so metacharacters in its name
/// are matched literally.
pub(crate) fn absolute_glob(project_dir: &NormalizedPath, pattern: &str) -> String {
    let escaped_dir = Pattern::escape(project_dir.as_str());
    let joined = NormalizedPath::new(flatten_recursive_wildcards(pattern));
    if joined.as_str() == "." {
        escaped_dir
    } else if escaped_dir.ends_with('/') {
        format!("{escaped_dir}{joined}")
    } else {
        format!("{escaped_dir}/{joined}")
    }
}

/// Escape bracket characters so they match themselves.
fn escape_brackets(pattern: &str) -> String {
    let mut escaped = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        match c {
            '[' => escaped.push_str("[[]"),
            ']' => escaped.push_str("[]]"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Glob-expand `pattern` beneath `project_dir`.
///
/// A pattern with a malformed bracket expression, such as `data[v2.py`,
/// has its brackets matched literally.
pub(crate) fn expand(project_dir: &NormalizedPath, pattern: &str) -> Result<Vec<NormalizedPath>> {
    let paths = match glob::glob_with(&absolute_glob(project_dir, pattern), match_options()) {
        Ok(paths) => paths,
        Err(e) => {
            tracing::debug!(pattern, error = %e, "matching brackets literally");
            let literal = absolute_glob(project_dir, &escape_brackets(pattern));
            glob::glob_with(&literal, match_options()).map_err(|e| Error::InvalidPattern {
                pattern: pattern.to_string(),
                message: e.msg.to_string(),
            })?
        }
    };

    let mut matches = Vec::new();
    for entry in paths {
        match entry {
            Ok(path) => matches.push(NormalizedPath::new(path)),
            Err(e) => tracing::debug!(pattern, error = %e, "skipping unreadable glob entry"),
        }
    }
    Ok(matches)
}

impl ProjectFile {
    /// Resolve every declared pattern into project-relative file paths.
    ///
    /// Patterns that point outside the project directory are skipped. The
    /// manifest itself, anything under `.git`, dotfiles and `.pyc` files are
    /// excluded. Paths use forward slashes.
    pub fn list_paths(&self) -> Result<BTreeSet<String>> {
        let project_dir = self.directory();
        let mut paths = BTreeSet::new();

        for pattern in self.files() {
            let merged = project_dir.join(pattern);
            if !merged.is_within(&project_dir) {
                tracing::debug!(pattern, "ignoring pattern outside the project directory");
                continue;
            }

            for expanded in expand(&project_dir, pattern)? {
                if expanded.is_dir() {
                    self.collect_dir(&project_dir, &expanded, &mut paths);
                } else {
                    self.collect_file(&project_dir, &expanded, &mut paths);
                }
            }
        }

        tracing::debug!(count = paths.len(), "resolved project files");
        Ok(paths)
    }

    fn collect_dir(&self, project_dir: &NormalizedPath, dir: &NormalizedPath, out: &mut BTreeSet<String>) {
        for entry in WalkDir::new(dir.to_native()).min_depth(1) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!(dir = %dir, error = %e, "skipping unreadable directory entry");
                    continue;
                }
            };
            if entry.file_type().is_dir() || !entry.path().is_file() {
                continue;
            }
            self.collect_file(project_dir, &NormalizedPath::new(entry.path()), out);
        }
    }

    fn collect_file(&self, project_dir: &NormalizedPath, file: &NormalizedPath, out: &mut BTreeSet<String>) {
        if self.is_excluded(file) {
            tracing::trace!(file = %file, "excluded");
            return;
        }
        out.insert(file.relative_to(project_dir));
    }

    /// Whether `path` must never be part of the resolved file set.
    pub fn is_excluded(&self, path: &NormalizedPath) -> bool {
        if self.exists() && same_file(path, self.path()) {
            return true;
        }

        // .git/index, .git/objects/...
        if path
            .parent()
            .is_some_and(|dir| dir.has_segment(ProjectPath::GitDir.as_str()))
        {
            return true;
        }

        let Some(name) = path.file_name() else {
            return true;
        };

        // .brains, .gitignore, editor swap files
        name.starts_with('.') || name.ends_with(BYTECODE_SUFFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recursive_wildcards_collapse() {
        assert_eq!(flatten_recursive_wildcards("src/**/*.py"), "src/*/*.py");
        assert_eq!(flatten_recursive_wildcards("***"), "*");
    }

    #[test]
    fn brackets_escape_to_literal_classes() {
        assert_eq!(escape_brackets("data[v2.py"), "data[[]v2.py");
        assert_eq!(escape_brackets("*[x].py"), "*[[]x[]].py");
    }

    #[test]
    fn project_dir_metacharacters_are_escaped() {
        let dir = NormalizedPath::new("/tmp/proj[1]");
        assert_eq!(absolute_glob(&dir, "*.ink"), "/tmp/proj[[]1[]]/*.ink");
    }
}
