//! Last-resort handling for panics in handlers and pipeline stages.

use crate::error::HttpAppError;
use axum::response::{IntoResponse, Response};
use ingesta_core::AppError;
use std::any::Any;

type Panic = Box<dyn Any + Send + 'static>;

/// Turn a caught panic into the generic 500 error body.
pub fn handle_panic(err: Panic) -> Response {
    let message = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic type");

    tracing::error!(message = %message, "Request handler panicked");

    HttpAppError::new(AppError::Internal(format!("panic: {}", message)), true).into_response()
}
