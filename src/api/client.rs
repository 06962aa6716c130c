// ABOUTME: HTTP transport to the REST backend with bearer token injection
// ABOUTME: Maps HTTP status codes to ErrorCode and normalizes every response body
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tenant Console Contributors

use super::envelope::{decode, ApiEnvelope};
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::utils::http_client;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Service name used in error messages
const BACKEND: &str = "backend";

/// Raw backend reply: status plus the parsed envelope
#[derive(Debug)]
pub struct BackendReply {
    /// HTTP status
    pub status: StatusCode,
    /// Parsed body
    pub envelope: ApiEnvelope,
}

/// Client for the REST backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Client with the default backend timeouts
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(http_client::api_client(), base_url)
    }

    /// Client over a preconfigured `reqwest::Client`
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }

    /// Backend base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET` a path and decode the normalized payload
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status, or an unexpected payload
    pub async fn get<T: DeserializeOwned>(&self, path: &str, token: Option<&str>) -> AppResult<T> {
        decode(self.request(Method::GET, path, None::<&()>, token).await?)
    }

    /// `POST` a JSON body and decode the normalized payload
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status, or an unexpected payload
    pub async fn post<B, T>(&self, path: &str, body: &B, token: Option<&str>) -> AppResult<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        decode(self.request(Method::POST, path, Some(body), token).await?)
    }

    /// `PUT` a JSON body and decode the normalized payload
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status, or an unexpected payload
    pub async fn put<B, T>(&self, path: &str, body: &B, token: Option<&str>) -> AppResult<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        decode(self.request(Method::PUT, path, Some(body), token).await?)
    }

    /// `DELETE` a path, ignoring any payload
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or non-2xx status
    pub async fn delete(&self, path: &str, token: Option<&str>) -> AppResult<()> {
        self.request(Method::DELETE, path, None::<&()>, token)
            .await
            .map(|_| ())
    }

    /// Send a request and return the normalized payload
    async fn request<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        token: Option<&str>,
    ) -> AppResult<Value>
    where
        B: Serialize + Sync + ?Sized,
    {
        let reply = self.send(method, path, body, token).await?;
        if reply.status.is_success() {
            reply.envelope.normalize()
        } else {
            Err(status_error(reply.status, &reply.envelope))
        }
    }

    /// Send a request without interpreting the status
    ///
    /// # Errors
    ///
    /// Returns `ExternalServiceError` if the backend cannot be reached or the body is not JSON
    pub async fn send<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        token: Option<&str>,
    ) -> AppResult<BackendReply>
    where
        B: Serialize + Sync + ?Sized,
    {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        debug!(http.method = %method, http.url = %url, "Backend request");

        let mut builder: RequestBuilder = self.client.request(method, &url);
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            warn!(http.url = %url, "Backend request failed: {e}");
            AppError::external_service(BACKEND, format!("request failed: {e}")).with_source(e)
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            AppError::external_service(BACKEND, format!("failed to read response: {e}"))
                .with_source(e)
        })?;

        let value = if text.trim().is_empty() {
            Value::Null
        } else {
            match serde_json::from_str(&text) {
                Ok(value) => value,
                Err(e) if status.is_success() => {
                    return Err(AppError::external_service(
                        BACKEND,
                        format!("response is not JSON: {e}"),
                    ));
                }
                Err(_) => Value::String(text),
            }
        };

        Ok(BackendReply {
            status,
            envelope: ApiEnvelope::from_value(value),
        })
    }
}

/// Error code for a non-2xx backend status
#[must_use]
pub fn status_to_error_code(status: StatusCode) -> ErrorCode {
    match status {
        StatusCode::UNAUTHORIZED => ErrorCode::AuthInvalid,
        StatusCode::FORBIDDEN => ErrorCode::PermissionDenied,
        StatusCode::NOT_FOUND => ErrorCode::ResourceNotFound,
        StatusCode::CONFLICT => ErrorCode::ResourceAlreadyExists,
        s if s.is_client_error() => ErrorCode::InvalidInput,
        _ => ErrorCode::ExternalServiceError,
    }
}

/// `AppError` for a non-2xx reply, keeping the backend's message when it sent one
#[must_use]
pub fn status_error(status: StatusCode, envelope: &ApiEnvelope) -> AppError {
    let message = envelope
        .error_message()
        .or_else(|| match envelope {
            ApiEnvelope::Bare(Value::String(text)) if !text.is_empty() => Some(text.clone()),
            _ => None,
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_owned()
        });
    let code = status_to_error_code(status);
    if code == ErrorCode::ExternalServiceError {
        AppError::external_service(BACKEND, format!("{status}: {message}"))
    } else {
        AppError::new(code, message)
    }
}

/// Percent-encode an identifier for use as a path segment
#[must_use]
pub fn segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_to_error_code(StatusCode::UNAUTHORIZED), ErrorCode::AuthInvalid);
        assert_eq!(status_to_error_code(StatusCode::FORBIDDEN), ErrorCode::PermissionDenied);
        assert_eq!(status_to_error_code(StatusCode::NOT_FOUND), ErrorCode::ResourceNotFound);
        assert_eq!(status_to_error_code(StatusCode::CONFLICT), ErrorCode::ResourceAlreadyExists);
        assert_eq!(
            status_to_error_code(StatusCode::UNPROCESSABLE_ENTITY),
            ErrorCode::InvalidInput
        );
        assert_eq!(
            status_to_error_code(StatusCode::BAD_GATEWAY),
            ErrorCode::ExternalServiceError
        );
    }

    #[test]
    fn test_segment_escapes_separators() {
        assert_eq!(segment("a/b c"), "a%2Fb%20c");
    }
}
