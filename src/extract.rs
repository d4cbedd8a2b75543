//! `Path` and `Query` extractors that reject with [`AppError`].
//!
//! axum's own extractors answer a bad id or query string with a plain text
//! body. These wrappers keep the `{"error": ..}` shape used everywhere else.

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{FromRequestParts, Path as AxumPath, Query as AxumQuery};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use activecenter_core::AppError;

use crate::validator::missing_field;

/// Path parameters, rejected with 400 when they do not parse.
#[derive(Debug, Clone, Copy, Default)]
pub struct Path<T>(pub T);

impl<T, S> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AxumPath(value) = AxumPath::<T>::from_request_parts(parts, state)
            .await
            .map_err(path_rejection_error)?;
        Ok(Path(value))
    }
}

/// Query string, rejected with 400 naming the first missing field.
#[derive(Debug, Clone, Copy, Default)]
pub struct Query<T>(pub T);

impl<T, S> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AxumQuery(value) = AxumQuery::<T>::from_request_parts(parts, state)
            .await
            .map_err(query_rejection_error)?;
        Ok(Query(value))
    }
}

fn path_rejection_error(rejection: PathRejection) -> AppError {
    match rejection {
        PathRejection::FailedToDeserializePathParams(err) => {
            AppError::bad_request(format!("Invalid path parameter: {}", err.kind()))
        }
        other => AppError::internal(anyhow::anyhow!(other.body_text())),
    }
}

fn query_rejection_error(rejection: QueryRejection) -> AppError {
    let message = rejection.body_text();
    match missing_field(&message) {
        Some(field) => AppError::bad_request(format!("{} is required", field)),
        None => AppError::bad_request("Invalid query parameters"),
    }
}
