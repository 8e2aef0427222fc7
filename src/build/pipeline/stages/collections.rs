//! Collection content stage.
//!
//! Collections are computed from the discovered documents, before anything
//! is rendered. Once markdown has run, this stage copies each document's
//! rendered body (and templated excerpt) into every collection item that
//! refers to it, so listing layouts can write `{{ post.content | readTime }}`.

use std::collections::HashMap;

use serde_json::Value;

use crate::build::pipeline::{PipelineContext, PipelineError, ProcessingDocument, Stage};

pub struct CollectionsStage;

impl Stage for CollectionsStage {
    fn name(&self) -> &'static str {
        "collections"
    }

    fn process(
        &self,
        docs: &mut [ProcessingDocument],
        ctx: &mut PipelineContext,
    ) -> Result<(), PipelineError> {
        let rendered: HashMap<String, &ProcessingDocument> = docs
            .iter()
            .map(|doc| (doc.doc.source_path.to_string_lossy().replace('\\', "/"), doc))
            .collect();

        for collection in ctx.collections.values_mut() {
            let Value::Array(items) = collection else {
                continue;
            };
            for item in items {
                fill_item(item, &rendered);
            }
        }

        Ok(())
    }
}

/// Fill `content` and `excerpt` on an item whose `input_path` names a document.
///
/// Items of registered collections that are not documents are left as they are.
fn fill_item(item: &mut Value, rendered: &HashMap<String, &ProcessingDocument>) {
    let Value::Object(fields) = item else {
        return;
    };
    let Some(doc) = fields
        .get("input_path")
        .and_then(Value::as_str)
        .and_then(|path| rendered.get(path))
    else {
        return;
    };

    fields.insert("content".to_string(), Value::from(doc.content.clone()));
    if let Some(excerpt) = &doc.excerpt {
        fields.insert("excerpt".to_string(), Value::from(excerpt.clone()));
    }
}
