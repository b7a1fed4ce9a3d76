/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and fake transports
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for zep-client tests

use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;
use wiremock::MockServer;
use zep_client::{ClientConfig, HttpRequest, HttpResponse, Lane, Result, Transport, ZepClient};

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Client pointed at a mock server
#[allow(dead_code)]
pub fn client_for(server: &MockServer) -> ZepClient {
    ZepClient::with_config(ClientConfig::new(server.uri())).expect("client init")
}

/// Transport that records every request and answers with a canned response
#[derive(Debug)]
#[allow(dead_code)]
pub struct RecordingTransport {
    status: StatusCode,
    body: String,
    pub requests: Mutex<Vec<(Lane, HttpRequest)>>,
}

#[allow(dead_code)]
impl RecordingTransport {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn recorded(&self) -> Vec<(Lane, HttpRequest)> {
        self.requests.lock().expect("requests lock").clone()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, lane: Lane, request: HttpRequest) -> Result<HttpResponse> {
        self.requests
            .lock()
            .expect("requests lock")
            .push((lane, request));
        Ok(HttpResponse::new(self.status, self.body.clone()))
    }
}
