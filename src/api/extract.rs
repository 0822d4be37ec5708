//! Extractors whose rejections render as [`ServiceError`] JSON bodies.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::error::ServiceError;

/// Numeric `:file_id` path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileId(pub i64);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for FileId {
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state).await?;
        Ok(Self(id))
    }
}
