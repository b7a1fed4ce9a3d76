/*
[INPUT]:  Received HTTP responses
[OUTPUT]: Ok or an API error carrying the rejected status
[POS]:    HTTP layer - status classification
[UPDATE]: When changing which status codes count as success
*/

use std::collections::BTreeSet;

use reqwest::StatusCode;
use tracing::warn;

use super::error::{Result, ZepError};
use super::message::HttpResponse;

/// Classifies responses by status code.
///
/// Only the codes in the accepted set pass; the default set is exactly
/// `200 OK`, so `201` and `204` are errors unless added explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHandler {
    accepted: BTreeSet<u16>,
}

impl Default for ResponseHandler {
    fn default() -> Self {
        Self {
            accepted: BTreeSet::from([StatusCode::OK.as_u16()]),
        }
    }
}

impl ResponseHandler {
    pub fn with_accepted(codes: impl IntoIterator<Item = StatusCode>) -> Self {
        Self {
            accepted: codes.into_iter().map(|s| s.as_u16()).collect(),
        }
    }

    pub fn accepted(&self) -> impl Iterator<Item = u16> + '_ {
        self.accepted.iter().copied()
    }

    pub fn is_accepted(&self, status: StatusCode) -> bool {
        self.accepted.contains(&status.as_u16())
    }

    /// Classify `response`; the body is left untouched.
    pub fn check(&self, response: &HttpResponse) -> Result<()> {
        if self.is_accepted(response.status) {
            return Ok(());
        }
        warn!(status = response.status.as_u16(), "zep request returned unexpected status");
        Err(ZepError::unexpected_status(response.status, &response.body))
    }
}

/// Classify `response` with the default policy (only `200` passes).
pub fn handle_response(response: &HttpResponse) -> Result<()> {
    ResponseHandler::default().check(response)
}
