//! Document discovery.
//!
//! Walks the input directory and loads every markdown file into a
//! [`Document`]. Hidden entries, the includes directory and passthrough
//! paths are skipped; other files are left for passthrough to copy.

use std::path::{Path, PathBuf};

use super::document::Document;

#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    #[error("input path does not exist: {0}")]
    PathNotFound(PathBuf),

    #[error("input path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("failed to read directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read directory entry in {path}: {source}")]
    ReadEntry {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read document {path}: {source}")]
    ReadDocument {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// The input directory and the paths discovery must not descend into.
#[derive(Debug, Clone)]
pub struct Source {
    /// Absolute (or cwd-relative) input directory
    input_dir: PathBuf,
    /// Skipped paths, absolute like `input_dir`
    excluded: Vec<PathBuf>,
    excerpt_separator: String,
}

impl Source {
    pub fn new(input_dir: PathBuf, excerpt_separator: impl Into<String>) -> Self {
        Self {
            input_dir,
            excluded: Vec::new(),
            excerpt_separator: excerpt_separator.into(),
        }
    }

    /// Skip `path` (and everything below it) during discovery.
    pub fn exclude(mut self, path: PathBuf) -> Self {
        self.excluded.push(path);
        self
    }

    /// Load every markdown document under the input directory.
    ///
    /// Drafts are dropped. The result is ordered by source path so builds
    /// are reproducible.
    pub fn discover(&self) -> Result<Vec<Document>, SourceError> {
        if !self.input_dir.exists() {
            return Err(SourceError::PathNotFound(self.input_dir.clone()));
        }
        if !self.input_dir.is_dir() {
            return Err(SourceError::NotADirectory(self.input_dir.clone()));
        }

        let mut paths = Vec::new();
        self.walk_directory(&self.input_dir, Path::new(""), &mut paths)?;
        paths.sort();

        let mut documents = Vec::with_capacity(paths.len());
        for relative in paths {
            let doc = Document::load(&self.input_dir, relative.clone(), &self.excerpt_separator)
                .map_err(|e| SourceError::ReadDocument {
                    path: self.input_dir.join(&relative),
                    source: e,
                })?;

            if doc.is_draft() {
                tracing::debug!("skipping draft {}", relative.display());
                continue;
            }
            documents.push(doc);
        }

        Ok(documents)
    }

    fn walk_directory(
        &self,
        dir: &Path,
        relative_path: &Path,
        found: &mut Vec<PathBuf>,
    ) -> Result<(), SourceError> {
        let entries = std::fs::read_dir(dir).map_err(|e| SourceError::ReadDir {
            path: dir.to_path_buf(),
            source: e,
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| SourceError::ReadEntry {
                path: dir.to_path_buf(),
                source: e,
            })?;

            let path = entry.path();
            let file_name = entry.file_name();

            if file_name.to_string_lossy().starts_with('.') {
                continue;
            }
            if self.excluded.iter().any(|excluded| path.starts_with(excluded)) {
                continue;
            }

            let item_relative_path = relative_path.join(&file_name);

            if path.is_dir() {
                self.walk_directory(&path, &item_relative_path, found)?;
            } else if path.is_file() && is_markdown(&path) {
                found.push(item_relative_path);
            }
        }

        Ok(())
    }
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .is_some_and(|e| e == "md" || e == "markdown")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_discover_markdown_only() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("src");
        write(&input, "index.md", "# Home");
        write(&input, "posts/hello.markdown", "# Hello");
        write(&input, "posts/notes.txt", "not a document");
        write(&input, ".hidden/secret.md", "# Secret");
        write(&input, "_includes/partial.md", "# Partial");
        write(&input, "assets/readme.md", "# Asset readme");

        let source = Source::new(input.clone(), "<!-- excerpt -->")
            .exclude(input.join("_includes"))
            .exclude(input.join("assets"));
        let docs = source.discover().unwrap();

        let urls: Vec<_> = docs.iter().map(|d| d.url_path.as_str()).collect();
        assert_eq!(urls, vec!["/", "/posts/hello/"]);
    }

    #[test]
    fn test_discover_skips_drafts() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "draft.md", "---\ndraft: true\n---\nWIP");
        write(dir.path(), "done.md", "Done");

        let docs = Source::new(dir.path().to_path_buf(), "<!-- excerpt -->")
            .discover()
            .unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].url_path, "/done/");
    }

    #[test]
    fn test_missing_input_dir() {
        let dir = tempfile::tempdir().unwrap();
        let result = Source::new(dir.path().join("nope"), "").discover();
        assert!(matches!(result, Err(SourceError::PathNotFound(_))));
    }
}
