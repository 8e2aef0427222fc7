mod builder;
pub mod collections;
pub mod document;
pub mod filters;
pub mod highlight;
pub mod markdown;
mod paths;
pub mod pipeline;
mod render;
mod source;

pub use builder::{BuildError, BuildResult, Builder};
pub use paths::{base_path_from_config, resolve_against};
