//! Request extraction with schema validation
//!
//! `ValidatedJson` is the decode half of the schema contract: it combines
//! JSON deserialization with the declarative `validator` constraints on
//! the request model, so a handler body only ever sees a value that fully
//! satisfies its schema.

use async_trait::async_trait;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::{AppError, ValidationError};

/// JSON extractor that rejects payloads violating the model's constraints.
///
/// A body that fails to decode (malformed JSON, missing field, wrong type)
/// or fails a declared constraint never reaches the handler; the rejection
/// is an [`AppError::Validation`] carrying every field-level problem.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| ValidationError::body(rejection.body_text()))?;

        value.validate().map_err(ValidationError::from)?;

        Ok(Self(value))
    }
}
