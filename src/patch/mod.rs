//! JSON Patch reconciliation.
//!
//! A patch is applied in two phases against a projection of an entity:
//! structural application (paths, types, `test` guards) on a working copy,
//! then validation of the complete result. Only a projection that passes both
//! is handed back to the caller for merging.

pub mod apply;
pub mod error;
pub mod operation;

pub use apply::{apply_operations, apply_patch, Patchable};
pub use error::PatchError;
pub use operation::{parse_document, PatchOperation};
