//! # JSON Extraction & Validation
//!
//! Handlers take `Result<Json<T>, JsonRejection>` and pass it through
//! [`extract_validated_json`], so malformed bodies become structured 400s
//! and rule violations structured 422s.

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::error::AppError;

/// Request types that check business rules serde cannot express.
pub trait Validate {
    /// The request after validation and normalization.
    type Valid;

    /// Returns the normalized request, or an error message on failure.
    fn validate(self) -> Result<Self::Valid, String>;
}

/// Extract a JSON body, mapping deserialization errors to [`AppError::BadRequest`].
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Extract a JSON body and validate it using the [`Validate`] trait.
pub fn extract_validated_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T::Valid, AppError> {
    extract_json(result)?
        .validate()
        .map_err(AppError::Validation)
}
