//! Default pipeline stages.
//!
//! Per-document stages:
//!
//! 1. **ContentStage** - Expand shortcodes, filters and page variables in markdown
//! 2. **MarkdownStage** - Split off the excerpt, convert markdown to HTML
//! 3. **CollectionsStage** - Copy rendered bodies into collection items
//! 4. **LayoutStage** - Wrap content in the layout named by front matter
//! 5. **WriteStage** - Write final HTML to output directory
//!
//! Finalize stages:
//!
//! - **PassthroughStage** - Copy registered passthrough paths verbatim
//! - **HighlightCssStage** - Write the syntax theme stylesheet

mod collections;
mod content;
mod highlight_css;
mod layout;
mod markdown;
mod passthrough;
mod write;

pub use collections::CollectionsStage;
pub use content::ContentStage;
pub use highlight_css::HighlightCssStage;
pub use layout::LayoutStage;
pub use markdown::MarkdownStage;
pub use passthrough::PassthroughStage;
pub use write::WriteStage;
