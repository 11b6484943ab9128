//! HTTP utilities for ARM REST API calls

use crate::error::{Error, Result};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, Method};
use serde_json::Value;
use std::time::Duration;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Header carrying the polling URL of an asynchronous operation.
pub const AZURE_ASYNC_OPERATION: &str = "azure-asyncoperation";

/// Per-request correlation header understood by ARM.
pub const CLIENT_REQUEST_ID: &str = "x-ms-client-request-id";

/// Sanitize response body for logging
/// Truncates long responses and drops control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let cut = (0..=MAX_LOG_BODY_LENGTH)
            .rev()
            .find(|i| body.is_char_boundary(*i))
            .unwrap_or(0);
        format!("{}... [truncated, {} bytes total]", &body[..cut], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| c.is_control(), "")
}

/// A successful ARM response with the headers the poller cares about.
#[derive(Debug, Clone)]
pub struct ArmResponse {
    pub status: u16,
    pub body: Value,
    pub async_operation: Option<String>,
    pub location: Option<String>,
    pub retry_after: Option<Duration>,
}

impl ArmResponse {
    fn from_parts(status: u16, headers: &HeaderMap, body: Value) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string())
        };

        Self {
            status,
            body,
            async_operation: header(AZURE_ASYNC_OPERATION),
            location: header("location"),
            retry_after: headers
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(parse_retry_after),
        }
    }

    /// `properties.provisioningState` of the returned resource, if present.
    pub fn provisioning_state(&self) -> Option<&str> {
        self.body
            .get("properties")
            .and_then(|p| p.get("provisioningState"))
            .and_then(|s| s.as_str())
    }
}

/// Parse a `Retry-After` header given as delay-seconds or an HTTP-date.
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    let value = value.trim();
    if let Ok(secs) = value.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }

    let at = chrono::DateTime::parse_from_rfc2822(value).ok()?;
    let delta = at.with_timezone(&chrono::Utc) - chrono::Utc::now();
    Some(delta.to_std().unwrap_or(Duration::ZERO))
}

/// Extract `(code, message)` from the ARM error envelope.
///
/// ARM uses `{"error": {"code", "message"}}`; a few services return the
/// fields at the top level instead.
pub fn parse_error_envelope(body: &Value) -> (String, String) {
    let inner = body.get("error").unwrap_or(body);
    let field = |name: &str| {
        inner
            .get(name)
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .unwrap_or_default()
    };
    (field("code"), field("message"))
}

/// HTTP client wrapper for ARM API calls
#[derive(Debug, Clone)]
pub struct ArmHttpClient {
    client: Client,
}

impl ArmHttpClient {
    /// Create a new HTTP client
    pub fn new(request_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("azurerm-provider/", env!("CARGO_PKG_VERSION")))
            .timeout(request_timeout)
            .build()?;

        Ok(Self { client })
    }

    /// Send a request and return the decoded response.
    ///
    /// Non-2xx statuses are turned into [`Error::Api`].
    pub async fn send(
        &self,
        method: Method,
        url: &str,
        token: &str,
        body: Option<&Value>,
        extra_headers: &[(&str, &str)],
    ) -> Result<ArmResponse> {
        let request_id = uuid::Uuid::new_v4().to_string();
        tracing::debug!("{} {} ({})", method, url, request_id);

        let mut request = self
            .client
            .request(method.clone(), url)
            .bearer_auth(token)
            .header(CLIENT_REQUEST_ID, &request_id);

        for (name, value) in extra_headers {
            request = request.header(*name, *value);
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let text = response.text().await?;

        let parsed = if text.trim().is_empty() {
            Value::Null
        } else {
            match serde_json::from_str(&text) {
                Ok(value) => value,
                Err(_) if !status.is_success() => Value::String(text.clone()),
                Err(e) => {
                    return Err(Error::Deserialization {
                        message: format!("{} {}: {}", method, url, e),
                        body: sanitize_for_log(&text),
                    })
                },
            }
        };

        if !status.is_success() {
            let (code, message) = parse_error_envelope(&parsed);
            let message = if message.is_empty() {
                sanitize_for_log(&text)
            } else {
                message
            };
            if status.as_u16() == 404 {
                tracing::debug!("{} {} -> 404 {}", method, url, code);
            } else {
                tracing::error!("API error: {} - {}", status, sanitize_for_log(&text));
            }
            return Err(Error::Api {
                method: method.to_string(),
                url: url.to_string(),
                status: status.as_u16(),
                code,
                message,
            });
        }

        tracing::debug!("{} {} -> {}", method, url, status.as_u16());
        Ok(ArmResponse::from_parts(status.as_u16(), &headers, parsed))
    }
}
