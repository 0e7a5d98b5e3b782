use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::{log_failure, log_request, log_response, RequestId};

/// Whether a request goes through the public client or the authenticated one.
///
/// Only authenticated requests carry a bearer token, and only an
/// authenticated 401 is reported as [`Error::Unauthorized`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
}

/// Anything able to supply the current access token.
pub trait BearerSource {
    fn bearer(&self) -> Option<&str>;
}

impl BearerSource for Option<String> {
    fn bearer(&self) -> Option<&str> {
        self.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub access: Access,
    pub bearer: Option<String>,
}

impl ApiRequest {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            access: Access::Public,
            bearer: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post<B: Serialize>(path: impl Into<String>, body: &B) -> Result<Self> {
        Self::new(Method::POST, path).with_body(body)
    }

    pub fn patch<B: Serialize>(path: impl Into<String>, body: &B) -> Result<Self> {
        Self::new(Method::PATCH, path).with_body(body)
    }

    fn with_body<B: Serialize>(mut self, body: &B) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    /// Route through the authenticated client, attaching the token if one is held.
    pub fn authenticated(mut self, source: &(impl BearerSource + ?Sized)) -> Self {
        self.access = Access::Authenticated;
        self.bearer = source.bearer().map(str::to_string);
        self
    }
}

/// Status and body of a completed exchange, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn json(status: u16, body: &Value) -> Self {
        Self {
            status,
            body: body.to_string().into_bytes(),
        }
    }
}

/// Carries an [`ApiRequest`] to the server.
///
/// Fails only when no response was obtained at all; every HTTP status is
/// returned as a [`RawResponse`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse>;
}

pub struct HttpTransport {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.api_base_url(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse> {
        let id = RequestId::next();
        log_request(id, &request.method, &request.path);

        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self.http_client.request(request.method, &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            log_failure(id, &request.path, &e.to_string());
            if e.is_timeout() {
                Error::Network(format!("request timed out: {e}"))
            } else if e.is_connect() {
                Error::Network(format!("connection failed: {e}"))
            } else {
                Error::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        log_response(id, status, &request.path);
        let body = response.bytes().await.map_err(|e| {
            log_failure(id, &request.path, &e.to_string());
            Error::Network(e.to_string())
        })?;

        Ok(RawResponse {
            status,
            body: body.to_vec(),
        })
    }
}

/// Turn a raw response into either the typed payload or a single [`Error`].
///
/// A 2xx body flagged `"success": false` is a rejection. Failure messages
/// come from the body's `error` field, then its `message` field, then the
/// status code.
pub fn normalize<R: DeserializeOwned>(response: RawResponse, access: Access) -> Result<R> {
    let status = response.status;

    if (200..300).contains(&status) {
        let value: Value = if response.body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&response.body)?
        };
        if value.get("success") == Some(&Value::Bool(false)) {
            return Err(Error::Rejected {
                status: Some(status),
                message: server_message(&value)
                    .unwrap_or_else(|| crate::error::GENERIC_ERROR_MESSAGE.to_string()),
            });
        }
        return Ok(serde_json::from_value(value)?);
    }

    let value = serde_json::from_slice(&response.body).unwrap_or(Value::Null);
    let message = server_message(&value)
        .unwrap_or_else(|| format!("Request failed with status code {status}"));

    if status == 401 && access == Access::Authenticated {
        Err(Error::Unauthorized(message))
    } else {
        Err(Error::Rejected {
            status: Some(status),
            message,
        })
    }
}

fn server_message(value: &Value) -> Option<String> {
    ["error", "message"]
        .iter()
        .filter_map(|key| value.get(key).and_then(Value::as_str))
        .find(|message| !message.is_empty())
        .map(str::to_string)
}
