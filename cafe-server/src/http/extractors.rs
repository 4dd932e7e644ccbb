//! Custom Axum extractors
//!
//! All reject with ApiError so clients always get an `{"error": ...}` body.

use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use crate::models::ValidationError;

/// Extract an integer cafe id from the path
pub struct CafeId(pub i64);

impl<S> FromRequestParts<S> for CafeId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| invalid_id())?;

        let id = id.parse::<i64>().map_err(|_| invalid_id())?;

        Ok(Self(id))
    }
}

fn invalid_id() -> ApiError {
    ApiError::Validation(ValidationError::InvalidFormat {
        field: "id",
        reason: "must be an integer",
    })
}

/// Extract the `loc` search parameter, keeping the first when repeated
pub struct SearchLocation(pub Option<String>);

impl<S> FromRequestParts<S> for SearchLocation
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs): Query<Vec<(String, String)>> = Query::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                ApiError::Validation(ValidationError::Malformed {
                    reason: rejection.body_text(),
                })
            })?;

        let loc = pairs
            .into_iter()
            .find(|(key, _)| key == "loc")
            .map(|(_, value)| value);

        Ok(Self(loc))
    }
}

/// JSON body whose decode failures become 400 validation errors
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            ApiError::Validation(ValidationError::Malformed {
                reason: rejection.body_text(),
            })
        })?;

        Ok(Self(value))
    }
}
