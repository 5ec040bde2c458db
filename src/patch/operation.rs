use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::PatchError;

/// One JSON Patch operation. Paths are JSON Pointers such as `/name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOperation {
    Add { path: String, value: Value },
    Remove { path: String },
    Replace { path: String, value: Value },
    Move { from: String, path: String },
    Copy { from: String, path: String },
    Test { path: String, value: Value },
}

impl PatchOperation {
    pub fn name(&self) -> &'static str {
        match self {
            PatchOperation::Add { .. } => "add",
            PatchOperation::Remove { .. } => "remove",
            PatchOperation::Replace { .. } => "replace",
            PatchOperation::Move { .. } => "move",
            PatchOperation::Copy { .. } => "copy",
            PatchOperation::Test { .. } => "test",
        }
    }
}

/// Parse a request body into an ordered list of operations.
pub fn parse_document(body: Value) -> Result<Vec<PatchOperation>, PatchError> {
    if !body.is_array() {
        return Err(PatchError::Malformed(
            "a patch document must be a JSON array of operations".to_string(),
        ));
    }
    serde_json::from_value(body).map_err(|e| PatchError::Malformed(e.to_string()))
}
