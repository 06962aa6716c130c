// ABOUTME: Normalizes the backend's two response shapes into one canonical JSON value
// ABOUTME: Unwraps {success, data} envelopes and renames document _id keys to id
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tenant Console Contributors

//! # Response Envelopes
//!
//! The backend answers either `{ "success": true, "data": ... }` or the bare payload.
//! [`ApiEnvelope`] names both shapes; [`ApiEnvelope::normalize`] is the only place
//! the distinction is handled. Everything past the data-access layer sees plain,
//! `id`-keyed documents.

use crate::errors::{AppError, AppResult, ErrorCode};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

const ID: &str = "id";
const MONGO_ID: &str = "_id";
const MONGO_OID: &str = "$oid";

/// A backend response body
#[derive(Debug, Clone, PartialEq)]
pub enum ApiEnvelope {
    /// `{ success, data?, error?, message? }`
    Wrapped {
        /// Backend success flag
        success: bool,
        /// Payload
        data: Option<Value>,
        /// Error detail, string or object
        error: Option<Value>,
        /// Human-readable message
        message: Option<String>,
    },
    /// Payload without a wrapper
    Bare(Value),
}

impl ApiEnvelope {
    /// Classify a response body
    ///
    /// An object is wrapped when `success` is a boolean and it either carries `data` or
    /// `error`, reports `success: false`, or has nothing but envelope keys. Extra metadata
    /// such as `timestamp` or `pagination` is dropped. A payload that merely has a
    /// `success` field stays bare.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        let is_envelope = value.as_object().is_some_and(|object| {
            match object.get("success").and_then(Value::as_bool) {
                None => false,
                Some(false) => true,
                Some(true) => {
                    object.contains_key("data")
                        || object.contains_key("error")
                        || object.keys().all(|key| is_envelope_key(key))
                }
            }
        });
        if !is_envelope {
            return Self::Bare(value);
        }

        let Value::Object(mut object) = value else {
            return Self::Bare(Value::Null);
        };
        Self::Wrapped {
            success: object
                .remove("success")
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
            data: object.remove("data"),
            error: object.remove("error"),
            message: object
                .remove("message")
                .and_then(|v| v.as_str().map(ToOwned::to_owned)),
        }
    }

    /// Canonical payload with `_id` mapped to `id`
    ///
    /// # Errors
    ///
    /// Returns `ExternalServiceError` for a wrapped body with `success: false`
    pub fn normalize(self) -> AppResult<Value> {
        match self {
            Self::Bare(value) => Ok(map_ids(value)),
            Self::Wrapped {
                success: true,
                data,
                ..
            } => Ok(map_ids(data.unwrap_or(Value::Null))),
            Self::Wrapped {
                success: false,
                error,
                message,
                ..
            } => Err(AppError::new(
                ErrorCode::ExternalServiceError,
                error_message(error.as_ref(), message.as_deref())
                    .unwrap_or_else(|| "Backend reported failure".to_owned()),
            )),
        }
    }

    /// Human-readable error carried by the body, if any
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        match self {
            Self::Wrapped { error, message, .. } => {
                error_message(error.as_ref(), message.as_deref())
            }
            Self::Bare(value) => error_message(
                value.get("error"),
                value.get("message").and_then(Value::as_str),
            ),
        }
    }

    /// Machine-readable error code carried by the body, if any
    #[must_use]
    pub fn error_code(&self) -> Option<String> {
        let error = match self {
            Self::Wrapped { error, .. } => error.as_ref(),
            Self::Bare(value) => value.get("error"),
        }?;
        match error {
            Value::String(code) => Some(code.clone()),
            Value::Object(object) => object
                .get("code")
                .and_then(Value::as_str)
                .map(ToOwned::to_owned),
            _ => None,
        }
    }
}

fn is_envelope_key(key: &str) -> bool {
    matches!(key, "success" | "data" | "error" | "message")
}

fn error_message(error: Option<&Value>, message: Option<&str>) -> Option<String> {
    let from_error = error.and_then(|error| match error {
        Value::String(text) => Some(text.clone()),
        Value::Object(object) => object
            .get("message")
            .or_else(|| object.get("error_description"))
            .and_then(Value::as_str)
            .map(ToOwned::to_owned),
        _ => None,
    });
    from_error.or_else(|| message.map(ToOwned::to_owned))
}

/// Recursively rename `_id` to `id`
///
/// An existing `id` wins. Extended-JSON ids (`{"$oid": "..."}`) collapse to their string.
#[must_use]
pub fn map_ids(value: Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.into_iter().map(map_ids).collect()),
        Value::Object(object) => Value::Object(map_object_ids(object)),
        other => other,
    }
}

fn map_object_ids(object: Map<String, Value>) -> Map<String, Value> {
    let mut mapped = Map::with_capacity(object.len());
    let mut backend_id = None;
    for (key, value) in object {
        if key == MONGO_ID {
            backend_id = Some(flatten_id(value));
        } else {
            mapped.insert(key, map_ids(value));
        }
    }
    if let Some(id) = backend_id {
        mapped.entry(ID).or_insert(id);
    }
    mapped
}

fn flatten_id(value: Value) -> Value {
    match value {
        Value::Object(mut object) if object.len() == 1 && object.contains_key(MONGO_OID) => {
            object.remove(MONGO_OID).unwrap_or(Value::Null)
        }
        Value::Number(number) => Value::String(number.to_string()),
        other => other,
    }
}

/// Deserialize a normalized payload into a model
///
/// # Errors
///
/// Returns `SerializationError` if the payload does not match `T`
pub fn decode<T: DeserializeOwned>(value: Value) -> AppResult<T> {
    serde_json::from_value(value).map_err(|e| {
        AppError::serialization(format!("Unexpected backend response shape: {e}")).with_source(e)
    })
}
