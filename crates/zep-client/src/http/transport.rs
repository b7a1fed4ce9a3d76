/*
[INPUT]:  Configured reqwest handles and plain-data requests
[OUTPUT]: Buffered responses or transport errors
[POS]:    HTTP layer - the single I/O seam shared by every client
[UPDATE]: When adding transports or changing lane routing
*/

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use tracing::debug;

use super::client::ClientConfig;
use super::error::{Result, ZepError};
use super::message::{HttpRequest, HttpResponse};

const USER_AGENT: &str = concat!("zep-client-rust/", env!("CARGO_PKG_VERSION"));

/// Which of the two handles a request travels on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lane {
    /// Interactive request/response calls
    Primary,
    /// Bulk uploads and searches, usually with a longer timeout
    Alternate,
}

/// The pair of shared HTTP client handles.
///
/// Both are created once by the application and shared by reference with
/// every client built from them.
#[derive(Debug, Clone)]
pub struct HttpHandles {
    pub primary: Arc<Client>,
    pub alternate: Arc<Client>,
}

impl HttpHandles {
    pub fn new(primary: Arc<Client>, alternate: Arc<Client>) -> Self {
        Self { primary, alternate }
    }

    /// Use one handle for both lanes.
    pub fn shared(client: Arc<Client>) -> Self {
        Self {
            alternate: Arc::clone(&client),
            primary: client,
        }
    }

    /// Build both handles from configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let headers = default_headers(config)?;
        let primary = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers.clone())
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| ZepError::Config(format!("failed to build primary client: {e}")))?;
        let alternate = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(config.alternate_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| ZepError::Config(format!("failed to build alternate client: {e}")))?;

        Ok(Self::new(Arc::new(primary), Arc::new(alternate)))
    }

    pub fn for_lane(&self, lane: Lane) -> &Client {
        match lane {
            Lane::Primary => &self.primary,
            Lane::Alternate => &self.alternate,
        }
    }
}

fn default_headers(config: &ClientConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    if let Some(api_key) = &config.api_key {
        let mut value = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| ZepError::Config("api key contains invalid header characters".into()))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }
    Ok(headers)
}

/// Executes HTTP requests on behalf of the clients.
///
/// Implementations must be safe to call concurrently. Errors from the
/// underlying HTTP stack are returned unchanged; status codes are never
/// inspected here.
#[async_trait]
pub trait Transport: fmt::Debug + Send + Sync {
    async fn send(&self, lane: Lane, request: HttpRequest) -> Result<HttpResponse>;

    /// The reqwest handles behind this transport, when there are any.
    fn handles(&self) -> Option<&HttpHandles> {
        None
    }
}

/// [`Transport`] backed by a pair of reqwest clients.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    handles: HttpHandles,
}

impl ReqwestTransport {
    pub fn new(handles: HttpHandles) -> Self {
        Self { handles }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, lane: Lane, request: HttpRequest) -> Result<HttpResponse> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let mut builder = self.handles.for_lane(lane).request(method, url).headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;
        debug!(?lane, status = status.as_u16(), bytes = body.len(), "zep response received");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }

    fn handles(&self) -> Option<&HttpHandles> {
        Some(&self.handles)
    }
}
