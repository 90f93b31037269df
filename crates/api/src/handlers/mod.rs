pub mod agenda;
pub mod artist;
pub mod event;
pub mod organizer;
pub mod venue;

use agenda_core::error::CoreError;
use agenda_core::validation::{check_patch_nulls, Locale, Schema, Violations};
use serde::Serialize;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::middleware::validation::{merge_patch, validate_request};

/// Merge a PATCH body over the stored row and validate the result through
/// `S`, so a partial update obeys exactly the same rules as a create.
///
/// An explicit `null` on a [`Schema::NOT_NULL`] field is a field error; it
/// never silently resets the stored value to its default.
pub(crate) fn patched<S: Schema, T: Serialize>(
    stored: &T,
    patch: Value,
    locale: Locale,
) -> AppResult<S::Output> {
    let nulls = check_patch_nulls::<S>(&patch);
    if !nulls.is_empty() {
        return Err(AppError::Core(CoreError::Validation(nulls.render(locale))));
    }
    let base = serde_json::to_value(stored)
        .map_err(|e| AppError::InternalError(format!("Failed to serialize stored row: {e}")))?;
    validate_request::<S>(merge_patch(base, patch), locale)
}

/// A single-field validation error rendered in `locale`.
pub(crate) fn field_error(field: &str, code: &str, locale: Locale) -> AppError {
    let mut violations = Violations::new();
    violations.add(field, code);
    AppError::Core(CoreError::Validation(violations.render(locale)))
}
