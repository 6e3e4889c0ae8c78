//! Extractors whose rejections render as the JSON error page

use axum::{
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Form,
};

use crate::{error::AppError, forms::FormData};

/// Integer record id from the path. Anything that is not an id is a
/// missing page, like an unknown route.
pub struct RecordId(pub i32);

#[axum::async_trait]
impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::NotFound(e.body_text()))?;

        let id = raw
            .parse()
            .map_err(|_| AppError::NotFound(format!("No record with id {:?}", raw)))?;

        Ok(Self(id))
    }
}

/// Url-encoded form body
pub struct FormBody(pub FormData);

#[axum::async_trait]
impl<S> FromRequest<S> for FormBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(form) = Form::<FormData>::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        Ok(Self(form))
    }
}
