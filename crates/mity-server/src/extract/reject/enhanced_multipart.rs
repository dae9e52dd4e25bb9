//! Enhanced Multipart extractor with improved error handling.
//!
//! This module provides [`Multipart`], an enhanced version of [`axum::extract::Multipart`]
//! whose rejections and field errors render as
//! `Failed to parse multipart form: <details>`.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{FromRequest, Multipart as AxumMultipart, Request};
use axum::http::StatusCode;
use derive_more::{Deref, DerefMut, From};

use super::enhanced_json::sanitize_error_message;
use crate::handler::{Error, ErrorKind};

/// Enhanced Multipart extractor with improved error handling.
///
/// This extractor wraps the default Axum Multipart extractor and provides
/// better error messages for multipart form parsing failures.
#[must_use]
#[derive(Debug, Deref, DerefMut, From)]
pub struct Multipart(pub AxumMultipart);

impl Multipart {
    /// Returns the inner Axum Multipart extractor.
    #[inline]
    pub fn into_inner(self) -> AxumMultipart {
        self.0
    }
}

impl<S> FromRequest<S> for Multipart
where
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        AxumMultipart::from_request(req, state)
            .await
            .map(Multipart)
            .map_err(Into::into)
    }
}

impl From<MultipartRejection> for Error<'static> {
    fn from(rejection: MultipartRejection) -> Self {
        match rejection {
            MultipartRejection::InvalidBoundary(_) => ErrorKind::BadRequest
                .with_message("Failed to parse multipart form")
                .with_context("missing or invalid boundary in the Content-Type header"),
            _ => ErrorKind::BadRequest
                .with_message("Failed to parse multipart form")
                .with_context(sanitize_error_message(&rejection.body_text())),
        }
    }
}

impl From<MultipartError> for Error<'static> {
    fn from(error: MultipartError) -> Self {
        if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return ErrorKind::PayloadTooLarge.into_error();
        }

        ErrorKind::BadRequest
            .with_message("Failed to parse multipart form")
            .with_context(sanitize_error_message(&error.body_text()))
    }
}
