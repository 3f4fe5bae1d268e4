// Copyright (c) 2026 RAGE Research Assistant
// SPDX-License-Identifier: AGPL-3.0
//! Use-case responses and the use-case boundary.
//!
//! Nothing fails *through* a use case: validation problems, gateway errors
//! and panics inside the body all end up as [`UseCaseResponse::Error`].

use crate::domain::error::{Envelope, ErrorInfo};
use futures::FutureExt;
use serde_json::{Map, Value};
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use tracing::error;

#[derive(Debug, Clone, PartialEq)]
pub enum UseCaseResponse<T> {
    Success(T),
    Progress { message: String },
    Error(ErrorInfo),
}

impl<T> UseCaseResponse<T> {
    pub fn status(&self) -> &'static str {
        match self {
            UseCaseResponse::Success(_) => "success",
            UseCaseResponse::Progress { .. } => "progress",
            UseCaseResponse::Error(_) => "error",
        }
    }

    /// Error response tagged with `operation` and the request `context`.
    pub fn error(operation: &str, message: impl Into<String>, context: &Map<String, Value>) -> Self {
        UseCaseResponse::Error(ErrorInfo {
            operation: operation.to_string(),
            message: message.into(),
            context: (!context.is_empty()).then(|| context.clone()),
        })
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            UseCaseResponse::Success(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn error_info(&self) -> Option<&ErrorInfo> {
        match self {
            UseCaseResponse::Error(info) => Some(info),
            _ => None,
        }
    }
}

impl<T> UseCaseResponse<T> {
    /// RPC form of a response; `progress_as` decides how a progress state is
    /// reported.
    pub fn into_envelope_with(self, progress_as: impl FnOnce(String) -> Envelope<T>) -> Envelope<T> {
        match self {
            UseCaseResponse::Success(payload) => Envelope::Success(payload),
            UseCaseResponse::Error(info) => Envelope::Failure(info),
            UseCaseResponse::Progress { message } => progress_as(message),
        }
    }
}

/// Error context from a JSON object literal; anything else yields no context.
pub fn request_context(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Run a use-case body, converting a panic into an error response that
/// carries `operation` and `context`.
pub async fn guarded<T, F>(operation: &str, context: &Map<String, Value>, body: F) -> UseCaseResponse<T>
where
    F: Future<Output = UseCaseResponse<T>>,
{
    match AssertUnwindSafe(body).catch_unwind().await {
        Ok(response) => response,
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            error!(operation, "Use case failed unexpectedly: {}", message);
            UseCaseResponse::error(operation, message, context)
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "Unexpected failure".to_string()
    }
}
