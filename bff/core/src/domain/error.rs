// Copyright (c) 2026 RAGE Research Assistant
// SPDX-License-Identifier: AGPL-3.0
//! # Error Info & Result Envelope
//!
//! Every gateway call, use case and RPC procedure speaks the same error
//! shape: `{operation, message, context?}`. In-process this travels as
//! [`Dto<T>`] (`Result<T, ErrorInfo>`); on the wire it is an [`Envelope<T>`]:
//!
//! ```json
//! { "success": true,  "data": { ... } }
//! { "success": false, "data": { "operation": "usecase#list-source-data", "message": "..." } }
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Uniform error payload shared by gateways, use cases and RPC replies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Identifier of the failing operation (e.g. `usecase#list-conversations`)
    pub operation: String,

    /// Human-readable message, rendered directly by clients
    pub message: String,

    /// Identifying request fields used to correlate failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Map<String, Value>>,
}

impl ErrorInfo {
    pub fn new(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            message: message.into(),
            context: None,
        }
    }

    /// Attach a context field. Repeated keys overwrite earlier values.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// Re-tag an error under another operation, keeping message and context.
    pub fn retag(mut self, operation: impl Into<String>) -> Self {
        self.operation = operation.into();
        self
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.operation, self.message)
    }
}

impl std::error::Error for ErrorInfo {}

/// Result of one gateway call.
pub type Dto<T> = Result<T, ErrorInfo>;

/// Wire form of [`Dto<T>`].
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope<T> {
    Success(T),
    Failure(ErrorInfo),
}

impl<T> Envelope<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Envelope::Success(_))
    }

    pub fn into_result(self) -> Dto<T> {
        match self {
            Envelope::Success(data) => Ok(data),
            Envelope::Failure(error) => Err(error),
        }
    }
}

impl<T> From<Dto<T>> for Envelope<T> {
    fn from(dto: Dto<T>) -> Self {
        match dto {
            Ok(data) => Envelope::Success(data),
            Err(error) => Envelope::Failure(error),
        }
    }
}

impl<T> From<Envelope<T>> for Dto<T> {
    fn from(envelope: Envelope<T>) -> Self {
        envelope.into_result()
    }
}

#[derive(Serialize)]
struct EnvelopeRef<'a, D: Serialize> {
    success: bool,
    data: &'a D,
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Envelope::Success(data) => EnvelopeRef { success: true, data }.serialize(serializer),
            Envelope::Failure(error) => EnvelopeRef {
                success: false,
                data: error,
            }
            .serialize(serializer),
        }
    }
}

#[derive(Deserialize)]
struct RawEnvelope {
    success: bool,
    #[serde(default)]
    data: Value,
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Envelope<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawEnvelope::deserialize(deserializer)?;
        if raw.success {
            serde_json::from_value(raw.data)
                .map(Envelope::Success)
                .map_err(serde::de::Error::custom)
        } else {
            serde_json::from_value(raw.data)
                .map(Envelope::Failure)
                .map_err(serde::de::Error::custom)
        }
    }
}
