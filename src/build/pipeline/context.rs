//! Pipeline context for sharing state across stages.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::build::markdown::MarkdownRenderer;
use crate::build::render::{Renderer, SiteContext};
use crate::site::Registry;

/// Shared context for pipeline stages.
///
/// Contains all resources and configuration needed by stages during processing.
pub struct PipelineContext<'a> {
    // === Locations ===
    /// Project root; registry paths are relative to it
    pub base_path: &'a Path,

    /// Input directory, relative to `base_path`
    pub input: &'a Path,

    /// Directory where output files are written
    pub output_dir: &'a Path,

    // === Site-level data ===
    pub site: &'a SiteContext,

    /// Collections computed from every document in this build; items gain
    /// their rendered `content` once the markdown stage has run
    pub collections: Map<String, Value>,

    /// Marker between a document's excerpt and the rest of its body
    pub excerpt_separator: &'a str,

    /// Output-relative path for the highlight stylesheet, if enabled
    pub highlight_css: Option<&'a Path>,

    // === Services ===
    pub registry: &'a Registry,

    pub markdown: &'a MarkdownRenderer,

    /// Template renderer (needs mutable access for render_content)
    pub renderer: &'a mut Renderer,

    // === Results ===
    /// Files written by the passthrough stage
    pub passthrough_files: Vec<PathBuf>,
}
