//! Request extractors that report failures through [`AppError`].
//!
//! axum's stock `Json` and `Path` rejections answer in plain text; these
//! wrappers keep every error response in the `{"error": ...}` shape.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::AppError;

/// A JSON object request body.
///
/// A missing body, a wrong content type, malformed JSON, or a non-object
/// value all become `400 Bad Request`.
#[derive(Debug, Clone)]
pub struct JsonBody(pub Map<String, Value>);

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| {
                AppError::BadRequest(format!("Invalid JSON body: {}", rejection.body_text()))
            })?;

        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(AppError::BadRequest(
                "Request body must be a JSON object".to_string(),
            )),
        }
    }
}

impl JsonBody {
    /// Deserialize the validated payload into a typed input.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` if a field has the wrong type.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, AppError> {
        serde_json::from_value(Value::Object(self.0))
            .map_err(|e| AppError::BadRequest(format!("Invalid field value: {e}")))
    }
}

/// A typed record ID taken from the `{id}` path segment.
#[derive(Debug, Clone, Copy)]
pub struct RecordId<T>(pub T);

impl<S, T> FromRequestParts<S> for RecordId<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::BadRequest("Invalid record identifier".to_string()))?;
        Ok(Self(id))
    }
}
