//! Extraction helpers that keep axum's rejections inside the JSON error
//! envelope.

use axum::extract::rejection::PathRejection;
use axum::extract::Path;

use crate::error::AppError;

/// Extract path parameters, mapping axum's rejection to [`AppError::BadRequest`].
///
/// Handlers take `Result<Path<T>, PathRejection>` and call this first, so a
/// segment that is not valid UTF-8 after percent-decoding gets the same
/// `{"error": ...}` body as any other malformed parameter.
pub fn extract_path<T>(result: Result<Path<T>, PathRejection>) -> Result<T, AppError> {
    result
        .map(|Path(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}
