/*
[INPUT]:  HTTP configuration (base URL, timeouts, api key) or explicit handles
[OUTPUT]: Root client, shared request context and resource clients
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::document::DocumentClient;
use super::error::{Result, ZepError};
use super::memory::MemoryClient;
use super::message::{HttpRequest, HttpResponse};
use super::message_client::MessageClient;
use super::options::RequestOptions;
use super::response::ResponseHandler;
use super::transport::{HttpHandles, Lane, ReqwestTransport, Transport};
use super::user::UserClient;

/// Default Zep server address
const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Path prefix every endpoint lives under
const API_BASE_PATH: [&str; 2] = ["api", "v1"];

/// HTTP client configuration
#[derive(Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// Timeout for the alternate handle (bulk uploads, searches)
    pub alternate_timeout: Duration,
    pub accepted_statuses: Vec<StatusCode>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            alternate_timeout: Duration::from_secs(120),
            accepted_statuses: vec![StatusCode::OK],
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("alternate_timeout", &self.alternate_timeout)
            .field("accepted_statuses", &self.accepted_statuses)
            .finish()
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    fn response_handler(&self) -> Result<ResponseHandler> {
        if self.accepted_statuses.is_empty() {
            return Err(ZepError::Config(
                "accepted_statuses must contain at least one status".into(),
            ));
        }
        Ok(ResponseHandler::with_accepted(
            self.accepted_statuses.iter().copied(),
        ))
    }
}

/// Everything a resource client needs to talk to the server.
///
/// Cheap to clone; every clone shares the same transport.
#[derive(Debug, Clone)]
pub struct ApiContext {
    api_url: Url,
    transport: Arc<dyn Transport>,
    handler: ResponseHandler,
}

impl ApiContext {
    pub fn new(
        base_url: &str,
        transport: Arc<dyn Transport>,
        handler: ResponseHandler,
    ) -> Result<Self> {
        let mut api_url = Url::parse(base_url)?;
        api_url
            .path_segments_mut()
            .map_err(|_| ZepError::Config(format!("base url cannot carry a path: {base_url}")))?
            .pop_if_empty()
            .extend(API_BASE_PATH);

        Ok(Self {
            api_url,
            transport,
            handler,
        })
    }

    /// Root of the versioned API, e.g. `http://localhost:8000/api/v1`
    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    pub fn handler(&self) -> &ResponseHandler {
        &self.handler
    }

    /// Build an endpoint URL; each segment is percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| ZepError::Config("api url cannot carry a path".into()))?
            .extend(segments);
        Ok(url)
    }

    pub fn request(&self, method: Method, segments: &[&str]) -> Result<HttpRequest> {
        Ok(HttpRequest::new(method, self.endpoint(segments)?))
    }

    /// Send without inspecting the status.
    pub async fn execute(
        &self,
        lane: Lane,
        request: HttpRequest,
        options: &RequestOptions,
    ) -> Result<HttpResponse> {
        debug!(method = %request.method, url = %request.url, ?lane, "zep request");
        options.run(self.transport.send(lane, request)).await
    }

    /// Send and reject statuses outside the accepted set.
    pub async fn execute_checked(
        &self,
        lane: Lane,
        request: HttpRequest,
        options: &RequestOptions,
    ) -> Result<HttpResponse> {
        let response = self.execute(lane, request, options).await?;
        self.handler.check(&response)?;
        Ok(response)
    }

    pub async fn send_json<T: DeserializeOwned>(
        &self,
        lane: Lane,
        request: HttpRequest,
        options: &RequestOptions,
    ) -> Result<T> {
        self.execute_checked(lane, request, options).await?.json()
    }
}

/// Append the pairs whose value is present.
pub(crate) fn append_query(url: &mut Url, pairs: &[(&str, Option<String>)]) {
    if pairs.iter().all(|(_, value)| value.is_none()) {
        return;
    }
    let mut query = url.query_pairs_mut();
    for (key, value) in pairs {
        if let Some(value) = value {
            query.append_pair(key, value);
        }
    }
}

/// Reject identifiers that are blank or that URL normalization would drop.
///
/// `.` and `..` segments are removed by the URL parser, so they would address a
/// different endpoint.
pub(crate) fn require_non_empty(value: &str, name: &str) -> Result<()> {
    match value.trim() {
        "" => Err(ZepError::InvalidArgument(format!("{name} must be provided"))),
        "." | ".." => Err(ZepError::InvalidArgument(format!(
            "{name} cannot be a relative path segment: {value:?}"
        ))),
        _ => Ok(()),
    }
}

/// Main HTTP client for the Zep API
///
/// Holds the shared transport and hands out resource clients that reuse it.
#[derive(Debug, Clone)]
pub struct ZepClient {
    context: ApiContext,
}

impl ZepClient {
    /// Create a client over caller-owned handles.
    pub fn new(handles: HttpHandles, config: ClientConfig) -> Result<Self> {
        Self::with_transport(config, Arc::new(ReqwestTransport::new(handles)))
    }

    /// Create a client, building both handles from `config`.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let handles = HttpHandles::from_config(&config)?;
        Self::new(handles, config)
    }

    /// Create a client over any [`Transport`].
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let handler = config.response_handler()?;
        let context = ApiContext::new(&config.base_url, transport, handler)?;
        Ok(Self { context })
    }

    /// The handles behind the transport, if it is reqwest-backed.
    pub fn handles(&self) -> Option<&HttpHandles> {
        self.context.transport.handles()
    }

    pub fn context(&self) -> &ApiContext {
        &self.context
    }

    pub fn documents(&self) -> DocumentClient {
        DocumentClient::new(self.context.clone())
    }

    pub fn memory(&self) -> MemoryClient {
        MemoryClient::new(self.context.clone())
    }

    pub fn messages(&self) -> MessageClient {
        MessageClient::new(self.context.clone())
    }

    pub fn users(&self) -> UserClient {
        UserClient::new(self.context.clone())
    }

    /// GET an absolute URL on the primary handle. The status is not inspected.
    pub async fn get(&self, url: &str, options: &RequestOptions) -> Result<HttpResponse> {
        let request = HttpRequest::new(Method::GET, Url::parse(url)?);
        self.context.execute(Lane::Primary, request, options).await
    }

    /// POST `body` verbatim to an absolute URL on the primary handle.
    /// The status is not inspected.
    pub async fn post(
        &self,
        url: &str,
        content_type: &str,
        body: impl Into<Bytes>,
        options: &RequestOptions,
    ) -> Result<HttpResponse> {
        let request =
            HttpRequest::new(Method::POST, Url::parse(url)?).with_body(content_type, body)?;
        self.context.execute(Lane::Primary, request, options).await
    }

    /// Classify `response` with this client's accepted status set.
    pub fn handle_response(&self, response: &HttpResponse) -> Result<()> {
        self.context.handler.check(response)
    }
}
