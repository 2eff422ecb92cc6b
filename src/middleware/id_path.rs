use crate::utils::types::BoxFuture;
use axum::{
    extract::{rejection::PathRejection, FromRequestParts, Path},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use log::debug;
use serde::de::DeserializeOwned;
use serde_json::json;

/// Extractor for the numeric IDs in a route path. IDs that can't be
/// parsed are treated as routes that don't exist
pub struct IdPath<T>(pub T);

impl<S, T> FromRequestParts<S> for IdPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = InvalidPath;

    fn from_request_parts<'a, 'b, 'c>(
        parts: &'a mut Parts,
        state: &'b S,
    ) -> BoxFuture<'c, Result<Self, Self::Rejection>>
    where
        'a: 'c,
        'b: 'c,
        Self: 'c,
    {
        Box::pin(async move {
            match Path::<T>::from_request_parts(parts, state).await {
                Ok(Path(value)) => Ok(Self(value)),
                Err(PathRejection::FailedToDeserializePathParams(err)) => {
                    debug!("Invalid path parameter: {}", err);
                    Err(InvalidPath::NotFound)
                }
                Err(err) => Err(InvalidPath::Other(err)),
            }
        })
    }
}

/// Path parameters were missing or invalid
pub enum InvalidPath {
    /// Parameter wasn't a valid ID
    NotFound,
    Other(PathRejection),
}

impl IntoResponse for InvalidPath {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            Self::Other(err) => (err.status(), err.body_text()),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
