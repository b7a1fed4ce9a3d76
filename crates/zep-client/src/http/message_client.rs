/*
[INPUT]:  Session ids, message uuids and message metadata
[OUTPUT]: Stored session messages
[POS]:    HTTP layer - session message endpoints
[UPDATE]: When adding message endpoints or changing metadata updates
*/

use async_trait::async_trait;
use reqwest::Method;

use crate::http::client::{ApiContext, require_non_empty};
use crate::http::{HttpHandles, Lane, RequestOptions, Result};
use crate::types::{Message, MessageListResponse, Metadata, UpdateMessageMetadataRequest};

/// Session message operations
#[async_trait]
pub trait MessageOperations: Send + Sync {
    async fn get_session_messages(
        &self,
        session_id: &str,
        options: &RequestOptions,
    ) -> Result<Vec<Message>>;

    async fn get_session_message(
        &self,
        session_id: &str,
        message_id: &str,
        options: &RequestOptions,
    ) -> Result<Message>;

    async fn update_message_metadata(
        &self,
        session_id: &str,
        message_id: &str,
        metadata: &Metadata,
        options: &RequestOptions,
    ) -> Result<Message>;
}

/// Client for `/sessions/{session_id}/messages` endpoints
#[derive(Debug, Clone)]
pub struct MessageClient {
    context: ApiContext,
}

impl MessageClient {
    pub fn new(context: ApiContext) -> Self {
        Self { context }
    }

    pub fn handles(&self) -> Option<&HttpHandles> {
        self.context.transport().handles()
    }
}

#[async_trait]
impl MessageOperations for MessageClient {
    /// GET /sessions/{session_id}/messages
    async fn get_session_messages(
        &self,
        session_id: &str,
        options: &RequestOptions,
    ) -> Result<Vec<Message>> {
        require_non_empty(session_id, "session_id")?;
        let request = self
            .context
            .request(Method::GET, &["sessions", session_id, "messages"])?;
        let list: MessageListResponse = self
            .context
            .send_json(Lane::Primary, request, options)
            .await
            .map_err(|e| e.or_not_found(format!("No session found for session {session_id}")))?;
        Ok(list.messages)
    }

    /// GET /sessions/{session_id}/messages/{message_id}
    async fn get_session_message(
        &self,
        session_id: &str,
        message_id: &str,
        options: &RequestOptions,
    ) -> Result<Message> {
        require_non_empty(session_id, "session_id")?;
        require_non_empty(message_id, "message_id")?;
        let request = self.context.request(
            Method::GET,
            &["sessions", session_id, "messages", message_id],
        )?;
        self.context
            .send_json(Lane::Primary, request, options)
            .await
            .map_err(|e| {
                e.or_not_found(format!(
                    "Message {message_id} not found in session {session_id}"
                ))
            })
    }

    /// PATCH /sessions/{session_id}/messages/{message_id}
    async fn update_message_metadata(
        &self,
        session_id: &str,
        message_id: &str,
        metadata: &Metadata,
        options: &RequestOptions,
    ) -> Result<Message> {
        require_non_empty(session_id, "session_id")?;
        require_non_empty(message_id, "message_id")?;
        let body = UpdateMessageMetadataRequest {
            uuid: message_id.to_string(),
            session_id: session_id.to_string(),
            metadata: metadata.clone(),
        };
        let request = self
            .context
            .request(
                Method::PATCH,
                &["sessions", session_id, "messages", message_id],
            )?
            .with_json(&body)?;
        self.context
            .send_json(Lane::Primary, request, options)
            .await
            .map_err(|e| {
                e.or_not_found(format!(
                    "Message {message_id} not found in session {session_id}"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{ClientConfig, ZepClient, ZepError};
    use crate::types::RoleType;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> MessageClient {
        ZepClient::with_config(ClientConfig::new(server.uri()))
            .expect("client init")
            .messages()
    }

    #[tokio::test]
    async fn test_get_session_messages() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/sessions/abc/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "messages": [
                    {"uuid": "m1", "role": "human", "role_type": "user", "content": "hello"},
                    {"uuid": "m2", "role": "ai", "role_type": "assistant", "content": "hi there"}
                ],
                "total_count": 2
            })))
            .expect(1)
            .mount(&server)
            .await;

        let messages = client(&server)
            .get_session_messages("abc", &RequestOptions::default())
            .await
            .expect("get_session_messages failed");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].role_type, Some(RoleType::Assistant));
        assert_eq!(messages[1].content, "hi there");
    }

    #[tokio::test]
    async fn test_get_session_messages_missing_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/sessions/gone/messages"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client(&server)
            .get_session_messages("gone", &RequestOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ZepError::NotFound(ref m) if m.contains("gone")));
    }

    #[tokio::test]
    async fn test_get_session_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/sessions/abc/messages/m1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "uuid": "m1",
                "role": "human",
                "role_type": "user",
                "content": "hello",
                "token_count": 2
            })))
            .expect(1)
            .mount(&server)
            .await;

        let message = client(&server)
            .get_session_message("abc", "m1", &RequestOptions::default())
            .await
            .expect("get_session_message failed");
        assert_eq!(message.uuid.as_deref(), Some("m1"));
        assert_eq!(message.token_count, Some(2));
    }

    #[tokio::test]
    async fn test_update_message_metadata() {
        let server = MockServer::start().await;
        let mut metadata = Metadata::new();
        metadata.insert("foo".into(), serde_json::json!("bar"));

        Mock::given(method("PATCH"))
            .and(path("/api/v1/sessions/abc/messages/m1"))
            .and(body_json(serde_json::json!({
                "uuid": "m1",
                "session_id": "abc",
                "metadata": {"foo": "bar"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "uuid": "m1",
                "role": "human",
                "content": "hello",
                "metadata": {"foo": "bar"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let message = client(&server)
            .update_message_metadata("abc", "m1", &metadata, &RequestOptions::default())
            .await
            .expect("update_message_metadata failed");
        assert_eq!(message.metadata, Some(metadata));
    }

    #[tokio::test]
    async fn test_blank_ids_rejected_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let messages = client(&server);
        let options = RequestOptions::default();

        let err = messages
            .get_session_messages(" ", &options)
            .await
            .unwrap_err();
        assert!(matches!(err, ZepError::InvalidArgument(_)));

        let err = messages
            .get_session_message("abc", "", &options)
            .await
            .unwrap_err();
        assert!(matches!(err, ZepError::InvalidArgument(_)));

        let err = messages
            .update_message_metadata("", "m1", &Metadata::new(), &options)
            .await
            .unwrap_err();
        assert!(matches!(err, ZepError::InvalidArgument(_)));
    }
}
