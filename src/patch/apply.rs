use std::fmt;

use serde_json::Value;
use validator::Validate;

use super::error::PatchError;
use super::operation::PatchOperation;
use crate::validation::validate_model;

/// A projection whose fields can be addressed by JSON Pointer.
pub trait Patchable: Clone {
    type Field: Copy + Eq + fmt::Debug;

    /// Resolve a single pointer segment (without the leading `/`).
    fn field(name: &str) -> Option<Self::Field>;

    fn get(&self, field: Self::Field) -> Value;

    /// On a type mismatch the error names the expected JSON type.
    fn set(&mut self, field: Self::Field, value: Value) -> Result<(), &'static str>;

    fn clear(&mut self, field: Self::Field);
}

fn resolve<T: Patchable>(index: usize, op: &'static str, path: &str) -> Result<T::Field, PatchError> {
    path.strip_prefix('/')
        .filter(|segment| !segment.contains('/'))
        .and_then(T::field)
        .ok_or_else(|| PatchError::UnknownPath {
            index,
            op,
            path: path.to_string(),
        })
}

fn write<T: Patchable>(
    target: &mut T,
    field: T::Field,
    value: Value,
    index: usize,
    op: &'static str,
    path: &str,
) -> Result<(), PatchError> {
    target.set(field, value).map_err(|expected| PatchError::TypeMismatch {
        index,
        op,
        path: path.to_string(),
        expected,
    })
}

/// Apply every operation, in order, to a copy of `target`.
///
/// The first failing operation aborts the patch and `target` is never touched.
/// No field constraints are checked here; see [`apply_patch`].
pub fn apply_operations<T: Patchable>(operations: &[PatchOperation], target: &T) -> Result<T, PatchError> {
    let mut working = target.clone();

    for (index, operation) in operations.iter().enumerate() {
        let op = operation.name();
        match operation {
            PatchOperation::Add { path, value } | PatchOperation::Replace { path, value } => {
                let field = resolve::<T>(index, op, path)?;
                write(&mut working, field, value.clone(), index, op, path)?;
            }
            PatchOperation::Remove { path } => {
                let field = resolve::<T>(index, op, path)?;
                working.clear(field);
            }
            PatchOperation::Move { from, path } => {
                let source = resolve::<T>(index, op, from)?;
                let destination = resolve::<T>(index, op, path)?;
                let value = working.get(source);
                working.clear(source);
                write(&mut working, destination, value, index, op, path)?;
            }
            PatchOperation::Copy { from, path } => {
                let source = resolve::<T>(index, op, from)?;
                let destination = resolve::<T>(index, op, path)?;
                let value = working.get(source);
                write(&mut working, destination, value, index, op, path)?;
            }
            PatchOperation::Test { path, value } => {
                let field = resolve::<T>(index, op, path)?;
                if working.get(field) != *value {
                    return Err(PatchError::TestFailed {
                        index,
                        path: path.clone(),
                    });
                }
            }
        }
    }

    Ok(working)
}

/// Apply the operations, then validate the resulting projection as a whole.
pub fn apply_patch<T>(operations: &[PatchOperation], target: &T) -> Result<T, PatchError>
where
    T: Patchable + Validate,
{
    let patched = apply_operations(operations, target)?;
    validate_model(&patched).map_err(PatchError::Validation)?;
    Ok(patched)
}
