//! Path and URL conversion utilities.
//!
//! This module handles conversions between:
//! - Source file paths (relative paths within the input directory)
//! - URL paths (the URL at which content will be served)
//! - Output file paths (where files are written in the output directory)

use std::path::{Path, PathBuf};

/// Convert a markdown file path to a URL path.
///
/// Documents are served as directories, so URLs end with a slash.
///
/// # Examples
/// ```ignore
/// source_path_to_url("about.md") => "/about/"
/// source_path_to_url("posts/hello.md") => "/posts/hello/"
/// source_path_to_url("posts/index.md") => "/posts/"
/// source_path_to_url("index.md") => "/"
/// ```
pub fn source_path_to_url(path: &Path) -> String {
    let path_str = path.with_extension("").to_string_lossy().replace('\\', "/");

    // Index files become the directory URL
    let path_str = if path_str == "index" {
        ""
    } else {
        path_str.strip_suffix("/index").unwrap_or(&path_str)
    };

    if path_str.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", path_str)
    }
}

/// Convert a front matter `permalink` to a URL path.
///
/// A permalink with a file extension names a file (`404.html`); anything
/// else is a directory URL and gets a trailing slash.
///
/// # Examples
/// ```ignore
/// permalink_to_url("404.html") => "/404.html"
/// permalink_to_url("/feed.xml") => "/feed.xml"
/// permalink_to_url("about") => "/about/"
/// ```
pub fn permalink_to_url(permalink: &str) -> String {
    let trimmed = permalink.trim().trim_matches('/');
    if trimmed.is_empty() {
        return "/".to_string();
    }
    if has_extension(trimmed) {
        format!("/{}", trimmed)
    } else {
        format!("/{}/", trimmed)
    }
}

/// Convert a URL path to an output file path.
///
/// Directory URLs become `path/index.html`; file URLs keep their path.
///
/// # Examples
/// ```ignore
/// url_to_output_path("/posts/hello/", output_dir) => output_dir/posts/hello/index.html
/// url_to_output_path("/", output_dir) => output_dir/index.html
/// url_to_output_path("/404.html", output_dir) => output_dir/404.html
/// ```
pub fn url_to_output_path(url_path: &str, output_dir: &Path) -> PathBuf {
    let url_path = url_path.trim_matches('/');

    if url_path.is_empty() {
        output_dir.join("index.html")
    } else if has_extension(url_path) {
        output_dir.join(url_path)
    } else {
        output_dir.join(url_path).join("index.html")
    }
}

/// Get the base path from a config file path (its parent directory).
pub fn base_path_from_config(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Resolve a configured path against the project base path.
pub fn resolve_against(base_path: &Path, path: &Path) -> PathBuf {
    if path.is_relative() {
        base_path.join(path)
    } else {
        path.to_path_buf()
    }
}

fn has_extension(url_path: &str) -> bool {
    url_path
        .rsplit('/')
        .next()
        .is_some_and(|last| last.contains('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_source_path_to_url_simple() {
        assert_eq!(source_path_to_url(Path::new("about.md")), "/about/");
    }

    #[test]
    fn test_source_path_to_url_nested() {
        assert_eq!(
            source_path_to_url(Path::new("posts/hello-world.md")),
            "/posts/hello-world/"
        );
    }

    #[test]
    fn test_source_path_to_url_index() {
        assert_eq!(source_path_to_url(Path::new("index.md")), "/");
        assert_eq!(source_path_to_url(Path::new("posts/index.md")), "/posts/");
    }

    #[test]
    fn test_permalink_to_url() {
        assert_eq!(permalink_to_url("404.html"), "/404.html");
        assert_eq!(permalink_to_url("/feed.xml"), "/feed.xml");
        assert_eq!(permalink_to_url("about"), "/about/");
        assert_eq!(permalink_to_url("/blog/archive/"), "/blog/archive/");
        assert_eq!(permalink_to_url("/"), "/");
    }

    #[test]
    fn test_url_to_output_path_document() {
        let output = Path::new("/site");
        assert_eq!(
            url_to_output_path("/posts/hello/", output),
            PathBuf::from("/site/posts/hello/index.html")
        );
    }

    #[test]
    fn test_url_to_output_path_root() {
        let output = Path::new("/site");
        assert_eq!(
            url_to_output_path("/", output),
            PathBuf::from("/site/index.html")
        );
    }

    #[test]
    fn test_url_to_output_path_file() {
        let output = Path::new("/site");
        assert_eq!(
            url_to_output_path("/404.html", output),
            PathBuf::from("/site/404.html")
        );
    }

    #[test]
    fn test_dotted_directory_is_not_a_file() {
        let output = Path::new("/site");
        assert_eq!(
            url_to_output_path("/v1.2/notes/", output),
            PathBuf::from("/site/v1.2/notes/index.html")
        );
    }

    #[test]
    fn test_base_path_from_config() {
        assert_eq!(
            base_path_from_config(Path::new("/project/folio.yaml")),
            PathBuf::from("/project")
        );
        assert_eq!(
            base_path_from_config(Path::new("folio.yaml")),
            PathBuf::from("")
        );
    }

    #[test]
    fn test_resolve_against() {
        let base = Path::new("/project");
        assert_eq!(
            resolve_against(base, Path::new("src")),
            PathBuf::from("/project/src")
        );
        assert_eq!(
            resolve_against(base, Path::new("/elsewhere/out")),
            PathBuf::from("/elsewhere/out")
        );
    }
}
