use thiserror::Error;

use crate::validation::FieldErrors;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PatchError {
    #[error("Malformed patch document: {0}")]
    Malformed(String),

    #[error("Operation {index} ({op}): path '{path}' does not exist")]
    UnknownPath {
        index: usize,
        op: &'static str,
        path: String,
    },

    #[error("Operation {index} ({op}): value for '{path}' must be {expected}")]
    TypeMismatch {
        index: usize,
        op: &'static str,
        path: String,
        expected: &'static str,
    },

    #[error("Operation {index} (test): value at '{path}' does not match")]
    TestFailed { index: usize, path: String },

    #[error("The patched document is invalid")]
    Validation(FieldErrors),
}

impl PatchError {
    /// Whether the patch itself was unusable, as opposed to producing an invalid document.
    pub fn is_structural(&self) -> bool {
        !matches!(self, PatchError::Validation(_))
    }
}
