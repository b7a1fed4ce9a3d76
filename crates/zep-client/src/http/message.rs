/*
[INPUT]:  Request parts from clients, raw responses from a transport
[OUTPUT]: Plain-data HTTP request/response values
[POS]:    HTTP layer - values crossing the transport boundary
[UPDATE]: When transports need more request or response detail
*/

use std::borrow::Cow;

use bytes::Bytes;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::{Result, ZepError};

/// An HTTP request described as plain data.
///
/// Built by the clients and handed to a [`Transport`](super::Transport), which
/// owns the actual I/O.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

impl HttpRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Attach a raw body with the given content type.
    pub fn with_body(mut self, content_type: &str, body: impl Into<Bytes>) -> Result<Self> {
        let value = HeaderValue::from_str(content_type).map_err(|_| {
            ZepError::InvalidArgument(format!("invalid content type: {content_type:?}"))
        })?;
        self.headers.insert(CONTENT_TYPE, value);
        self.body = Some(body.into());
        Ok(self)
    }

    /// Attach `payload` serialized as JSON.
    pub fn with_json<T: Serialize + ?Sized>(self, payload: &T) -> Result<Self> {
        let body = serde_json::to_vec(payload)?;
        self.with_body("application/json", body)
    }
}

/// A fully received HTTP response.
///
/// The body is buffered, so inspecting the status never consumes it.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Body decoded as UTF-8, lossy.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Body decoded as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}
