use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// `Json` extractor whose rejections use the API's `{"error": ...}` shape.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// `Query` extractor whose rejections use the API's `{"error": ...}` shape.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);
