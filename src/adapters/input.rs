use crate::domain::model::Document;
use crate::utils::error::{DomError, Result};
use std::fs;
use std::path::Path;

/// 從 JSON 檔案載入公報文件
pub fn load_documents<P: AsRef<Path>>(path: P) -> Result<Vec<Document>> {
    let raw = fs::read_to_string(path.as_ref())?;
    let docs = parse_documents(&raw)?;
    tracing::debug!("Loaded {} documents from {}", docs.len(), path.as_ref().display());
    Ok(docs)
}

/// Expects a JSON array of document objects. Errors name the offending element,
/// e.g. `documents[3].content`.
pub fn parse_documents(raw: &str) -> Result<Vec<Document>> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    let items = value
        .as_array()
        .ok_or_else(|| DomError::malformed("documents", "must be a JSON array"))?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            Document::from_json(item).map_err(|e| match e {
                DomError::MalformedInput { field, reason } => DomError::MalformedInput {
                    field: format!("documents[{}].{}", i, field),
                    reason,
                },
                other => other,
            })
        })
        .collect()
}
