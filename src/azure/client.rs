//! ARM Client
//!
//! Main client for interacting with Azure Resource Manager, combining the
//! bearer token, the HTTP transport and the polling configuration.

use super::http::{ArmHttpClient, ArmResponse};
use super::poller::{Clock, Deadline, PollTarget, Poller, SystemClock};
use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Bearer token; redacted in debug output.
#[derive(Clone)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Main ARM client
#[derive(Debug, Clone)]
pub struct ArmClient {
    http: ArmHttpClient,
    endpoint: Url,
    subscription_id: String,
    token: AccessToken,
    poll_interval: Duration,
    clock: Arc<dyn Clock>,
}

impl ArmClient {
    /// Create a client from validated provider configuration
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        config.validate()?;

        let endpoint = Url::parse(&config.effective_endpoint())
            .map_err(|e| Error::Config(format!("endpoint: {}", e)))?;
        let http = ArmHttpClient::new(Duration::from_secs(config.request_timeout_secs))?;

        Ok(Self {
            http,
            endpoint,
            subscription_id: config.subscription_id.clone().unwrap_or_default(),
            token: AccessToken::new(config.access_token.clone().unwrap_or_default()),
            poll_interval: Duration::from_secs(config.poll_interval_secs),
            clock: Arc::new(SystemClock),
        })
    }

    /// Replace the clock used for deadlines and poll delays
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Override the default delay between polls
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    /// Start a deadline for `operation` using this client's clock
    pub fn deadline(&self, timeout: Duration, operation: impl Into<String>) -> Deadline {
        Deadline::new(self.clock(), timeout, operation)
    }

    // =========================================================================
    // URL helpers
    // =========================================================================

    /// Build the request URL for a resource path such as a canonical ID.
    ///
    /// Each path segment is percent-encoded; the ID itself stays untouched.
    pub fn resource_url(&self, path: &str, api_version: &str) -> String {
        self.resource_url_with_query(path, api_version, &[])
    }

    /// Same as [`Self::resource_url`] with extra query parameters.
    pub fn resource_url_with_query(
        &self,
        path: &str,
        api_version: &str,
        query: &[(&str, &str)],
    ) -> String {
        let encoded = path
            .trim_start_matches('/')
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");

        let mut url = format!(
            "{}/{}?api-version={}",
            self.endpoint.as_str().trim_end_matches('/'),
            encoded,
            urlencoding::encode(api_version)
        );
        for (key, value) in query {
            url.push('&');
            url.push_str(&urlencoding::encode(key));
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    /// Resolve a possibly relative polling URL against the endpoint
    fn absolute_url(&self, url: &str) -> Result<String> {
        self.endpoint
            .join(url)
            .map(|u| u.to_string())
            .map_err(|e| Error::Config(format!("invalid polling URL {:?}: {}", url, e)))
    }

    // =========================================================================
    // Requests
    // =========================================================================

    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
        headers: &[(&str, &str)],
    ) -> Result<ArmResponse> {
        self.http
            .send(method, url, self.token.secret(), body, headers)
            .await
    }

    /// GET an absolute URL (used for polling)
    pub async fn get_url(&self, url: &str) -> Result<ArmResponse> {
        let url = self.absolute_url(url)?;
        self.send(Method::GET, &url, None, &[]).await
    }

    /// GET a resource and decode it
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str, api_version: &str) -> Result<T> {
        self.get_json_with_query(path, api_version, &[]).await
    }

    /// GET a resource with extra query parameters and decode it
    pub async fn get_json_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        api_version: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let url = self.resource_url_with_query(path, api_version, query);
        let response = self.send(Method::GET, &url, None, &[]).await?;
        decode(&url, response.body)
    }

    /// PUT a resource body
    pub async fn put<B: Serialize>(
        &self,
        path: &str,
        api_version: &str,
        body: &B,
    ) -> Result<ArmResponse> {
        self.put_with_headers(path, api_version, body, &[]).await
    }

    /// PUT that only succeeds when nothing exists at `path` yet
    pub async fn put_if_none_match<B: Serialize>(
        &self,
        path: &str,
        api_version: &str,
        body: &B,
    ) -> Result<ArmResponse> {
        self.put_with_headers(path, api_version, body, &[("If-None-Match", "*")])
            .await
    }

    async fn put_with_headers<B: Serialize>(
        &self,
        path: &str,
        api_version: &str,
        body: &B,
        headers: &[(&str, &str)],
    ) -> Result<ArmResponse> {
        let url = self.resource_url(path, api_version);
        let body = encode(&url, body)?;
        self.send(Method::PUT, &url, Some(&body), headers).await
    }

    /// PATCH a resource body
    pub async fn patch<B: Serialize>(
        &self,
        path: &str,
        api_version: &str,
        body: &B,
    ) -> Result<ArmResponse> {
        let url = self.resource_url(path, api_version);
        let body = encode(&url, body)?;
        self.send(Method::PATCH, &url, Some(&body), &[]).await
    }

    /// POST an action (listKeys and friends)
    pub async fn post(
        &self,
        path: &str,
        api_version: &str,
        body: Option<&Value>,
    ) -> Result<ArmResponse> {
        let url = self.resource_url(path, api_version);
        self.send(Method::POST, &url, body, &[]).await
    }

    /// DELETE a resource
    pub async fn delete(&self, path: &str, api_version: &str) -> Result<ArmResponse> {
        let url = self.resource_url(path, api_version);
        self.send(Method::DELETE, &url, None, &[]).await
    }

    // =========================================================================
    // Long-running operations
    // =========================================================================

    /// Block until the operation started by `response` finishes
    pub async fn wait_for_completion(
        &self,
        method: Method,
        path: &str,
        api_version: &str,
        response: &ArmResponse,
        deadline: &Deadline,
    ) -> Result<()> {
        let resource_url = self.resource_url(path, api_version);
        let target = PollTarget::from_response(&method, &resource_url, response);
        Poller::new(self, target).wait(deadline).await
    }

    /// PUT a resource body and wait for the operation it starts
    pub async fn put_then_poll<B: Serialize>(
        &self,
        path: &str,
        api_version: &str,
        body: &B,
        deadline: &Deadline,
    ) -> Result<()> {
        let response = self.put(path, api_version, body).await?;
        self.wait_for_completion(Method::PUT, path, api_version, &response, deadline)
            .await
    }

    /// PATCH a resource body and wait for the operation it starts
    pub async fn patch_then_poll<B: Serialize>(
        &self,
        path: &str,
        api_version: &str,
        body: &B,
        deadline: &Deadline,
    ) -> Result<()> {
        let response = self.patch(path, api_version, body).await?;
        self.wait_for_completion(Method::PATCH, path, api_version, &response, deadline)
            .await
    }

    /// DELETE a resource and wait until it is gone
    pub async fn delete_then_poll(
        &self,
        path: &str,
        api_version: &str,
        deadline: &Deadline,
    ) -> Result<()> {
        let response = self.delete(path, api_version).await?;
        self.wait_for_completion(Method::DELETE, path, api_version, &response, deadline)
            .await
    }
}

/// Decode a JSON body into a typed model
pub fn decode<T: DeserializeOwned>(url: &str, body: Value) -> Result<T> {
    serde_json::from_value(body.clone()).map_err(|e| Error::Deserialization {
        message: format!("decoding response from {}: {}", url, e),
        body: body.to_string().chars().take(200).collect(),
    })
}

fn encode<B: Serialize>(url: &str, body: &B) -> Result<Value> {
    serde_json::to_value(body).map_err(|e| Error::Deserialization {
        message: format!("encoding request for {}: {}", url, e),
        body: String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ArmClient {
        let config = ProviderConfig {
            subscription_id: Some("00000000-0000-0000-0000-000000000000".to_string()),
            access_token: Some("token".to_string()),
            endpoint: Some("https://management.azure.com/".to_string()),
            ..ProviderConfig::default()
        };
        ArmClient::new(&config).unwrap()
    }

    #[test]
    fn test_resource_url_appends_api_version() {
        let url = client().resource_url(
            "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Search/searchServices/svc",
            "2020-03-13",
        );
        assert_eq!(
            url,
            "https://management.azure.com/subscriptions/s/resourceGroups/rg/providers/Microsoft.Search/searchServices/svc?api-version=2020-03-13"
        );
    }

    #[test]
    fn test_resource_url_encodes_segments() {
        let url = client().resource_url("/subscriptions/s/resourceGroups/my rg", "2020-03-20");
        assert!(url.contains("/resourceGroups/my%20rg?"));
    }

    #[test]
    fn test_resource_url_with_query() {
        let url = client().resource_url_with_query(
            "/subscriptions/s",
            "2020-03-01-preview",
            &[("$expand", "transformation")],
        );
        assert!(url.ends_with("api-version=2020-03-01-preview&%24expand=transformation"));
    }

    #[test]
    fn test_absolute_url_keeps_absolute_and_joins_relative() {
        let c = client();
        assert_eq!(
            c.absolute_url("https://other.example/op/1?x=1").unwrap(),
            "https://other.example/op/1?x=1"
        );
        assert_eq!(
            c.absolute_url("/operations/2").unwrap(),
            "https://management.azure.com/operations/2"
        );
    }

    #[test]
    fn test_token_is_redacted() {
        let rendered = format!("{:?}", client());
        assert!(!rendered.contains("\"token\""));
        assert!(rendered.contains("AccessToken(***)"));
    }
}
