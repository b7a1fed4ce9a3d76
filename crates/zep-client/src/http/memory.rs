/*
[INPUT]:  Session ids, memory payloads and search queries
[OUTPUT]: Sessions, memory and memory search results
[POS]:    HTTP layer - session and memory endpoints
[UPDATE]: When adding memory endpoints or changing query parameters
*/

use async_trait::async_trait;
use futures_util::stream::{self, BoxStream, StreamExt};
use reqwest::Method;

use crate::http::client::{ApiContext, append_query, require_non_empty};
use crate::http::{HttpHandles, Lane, RequestOptions, Result, ZepError};
use crate::types::{Memory, MemorySearchPayload, MemorySearchResult, Session};

/// Session and memory operations
#[async_trait]
pub trait MemoryOperations: Send + Sync {
    async fn add_session(&self, session: &Session, options: &RequestOptions) -> Result<Session>;

    async fn get_session(&self, session_id: &str, options: &RequestOptions) -> Result<Session>;

    async fn update_session(
        &self,
        session: &Session,
        options: &RequestOptions,
    ) -> Result<Session>;

    async fn list_sessions(
        &self,
        limit: Option<u32>,
        cursor: Option<u64>,
        options: &RequestOptions,
    ) -> Result<Vec<Session>>;

    async fn get_memory(
        &self,
        session_id: &str,
        lastn: Option<u32>,
        options: &RequestOptions,
    ) -> Result<Memory>;

    async fn add_memory(
        &self,
        session_id: &str,
        memory: &Memory,
        options: &RequestOptions,
    ) -> Result<String>;

    async fn delete_memory(&self, session_id: &str, options: &RequestOptions) -> Result<String>;

    async fn search_memory(
        &self,
        session_id: &str,
        payload: &MemorySearchPayload,
        limit: Option<u32>,
        options: &RequestOptions,
    ) -> Result<Vec<MemorySearchResult>>;
}

/// Client for `/sessions` endpoints
#[derive(Debug, Clone)]
pub struct MemoryClient {
    context: ApiContext,
}

impl MemoryClient {
    pub fn new(context: ApiContext) -> Self {
        Self { context }
    }

    pub fn handles(&self) -> Option<&HttpHandles> {
        self.context.transport().handles()
    }

    /// Page through every session, `chunk_size` at a time.
    ///
    /// Ends after the first empty page or the first error.
    pub fn list_all_sessions(
        &self,
        chunk_size: u32,
        options: RequestOptions,
    ) -> BoxStream<'_, Result<Vec<Session>>> {
        if chunk_size == 0 {
            return stream::once(async {
                Err::<Vec<_>, _>(ZepError::InvalidArgument("chunk_size must be positive".into()))
            })
            .boxed();
        }

        stream::try_unfold(None::<u64>, move |cursor| {
            let options = options.clone();
            async move {
                let page = self.list_sessions(Some(chunk_size), cursor, &options).await?;
                if page.is_empty() {
                    return Ok(None);
                }
                let next = cursor.unwrap_or(0) + u64::from(chunk_size);
                Ok(Some((page, Some(next))))
            }
        })
        .boxed()
    }
}

#[async_trait]
impl MemoryOperations for MemoryClient {
    /// POST /sessions
    async fn add_session(&self, session: &Session, options: &RequestOptions) -> Result<Session> {
        require_non_empty(&session.session_id, "session_id")?;
        let request = self
            .context
            .request(Method::POST, &["sessions"])?
            .with_json(session)?;
        self.context.send_json(Lane::Primary, request, options).await
    }

    /// GET /sessions/{session_id}
    async fn get_session(&self, session_id: &str, options: &RequestOptions) -> Result<Session> {
        require_non_empty(session_id, "session_id")?;
        let request = self.context.request(Method::GET, &["sessions", session_id])?;
        self.context
            .send_json(Lane::Primary, request, options)
            .await
            .map_err(|e| e.or_not_found(format!("No session found for session {session_id}")))
    }

    /// PATCH /sessions/{session_id}
    async fn update_session(
        &self,
        session: &Session,
        options: &RequestOptions,
    ) -> Result<Session> {
        require_non_empty(&session.session_id, "session_id")?;
        let request = self
            .context
            .request(Method::PATCH, &["sessions", &session.session_id])?
            .with_json(session)?;
        self.context
            .send_json(Lane::Primary, request, options)
            .await
            .map_err(|e| {
                e.or_not_found(format!("No session found for session {}", session.session_id))
            })
    }

    /// GET /sessions?limit={limit}&cursor={cursor}
    async fn list_sessions(
        &self,
        limit: Option<u32>,
        cursor: Option<u64>,
        options: &RequestOptions,
    ) -> Result<Vec<Session>> {
        let mut request = self.context.request(Method::GET, &["sessions"])?;
        append_query(
            &mut request.url,
            &[
                ("limit", limit.map(|l| l.to_string())),
                ("cursor", cursor.map(|c| c.to_string())),
            ],
        );
        self.context.send_json(Lane::Primary, request, options).await
    }

    /// GET /sessions/{session_id}/memory?lastn={lastn}
    async fn get_memory(
        &self,
        session_id: &str,
        lastn: Option<u32>,
        options: &RequestOptions,
    ) -> Result<Memory> {
        require_non_empty(session_id, "session_id")?;
        let mut request = self
            .context
            .request(Method::GET, &["sessions", session_id, "memory"])?;
        append_query(&mut request.url, &[("lastn", lastn.map(|n| n.to_string()))]);

        let memory: Memory = self
            .context
            .send_json(Lane::Primary, request, options)
            .await
            .map_err(|e| e.or_not_found(format!("No memory found for session {session_id}")))?;

        if memory.messages.is_empty() {
            return Err(ZepError::UnexpectedResponse(format!(
                "memory for session {session_id} has no messages"
            )));
        }
        Ok(memory)
    }

    /// POST /sessions/{session_id}/memory
    async fn add_memory(
        &self,
        session_id: &str,
        memory: &Memory,
        options: &RequestOptions,
    ) -> Result<String> {
        require_non_empty(session_id, "session_id")?;
        let request = self
            .context
            .request(Method::POST, &["sessions", session_id, "memory"])?
            .with_json(memory)?;
        let response = self
            .context
            .execute_checked(Lane::Primary, request, options)
            .await?;
        Ok(response.text().into_owned())
    }

    /// DELETE /sessions/{session_id}/memory
    async fn delete_memory(&self, session_id: &str, options: &RequestOptions) -> Result<String> {
        require_non_empty(session_id, "session_id")?;
        let request = self
            .context
            .request(Method::DELETE, &["sessions", session_id, "memory"])?;
        let response = self
            .context
            .execute_checked(Lane::Primary, request, options)
            .await
            .map_err(|e| e.or_not_found(format!("No memory found for session {session_id}")))?;
        Ok(response.text().into_owned())
    }

    /// POST /sessions/{session_id}/search?limit={limit}
    async fn search_memory(
        &self,
        session_id: &str,
        payload: &MemorySearchPayload,
        limit: Option<u32>,
        options: &RequestOptions,
    ) -> Result<Vec<MemorySearchResult>> {
        require_non_empty(session_id, "session_id")?;
        let mut request = self
            .context
            .request(Method::POST, &["sessions", session_id, "search"])?
            .with_json(payload)?;
        append_query(&mut request.url, &[("limit", limit.map(|l| l.to_string()))]);
        self.context
            .send_json(Lane::Alternate, request, options)
            .await
            .map_err(|e| e.or_not_found(format!("No session found for session {session_id}")))
    }
}
