/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{CollectionStatus, RoleType};

/// Free-form metadata attached to most Zep records
pub type Metadata = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_type: Option<RoleType>,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl Message {
    /// New message; the role type is derived from `role`.
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        let role = role.into();
        Self {
            uuid: None,
            created_at: None,
            role_type: Some(RoleType::from_role(&role)),
            role,
            content: content.into(),
            token_count: None,
            metadata: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub uuid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recent_message_uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_count: Option<u32>,
}

/// Messages, summary and facts for one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<Summary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facts: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_instruction: Option<String>,
}

impl Memory {
    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self {
            messages,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facts: Option<Vec<String>>,
}

impl Session {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            uuid: None,
            id: None,
            created_at: None,
            updated_at: None,
            deleted_at: None,
            session_id: session_id.into(),
            user_id: None,
            metadata: None,
            facts: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<Uuid>,
    /// Server-side sequence id, used as the pagination cursor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_embedded: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
    /// Search distance, only set on search results
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dist: Option<f64>,
}

impl Document {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            uuid: None,
            created_at: None,
            updated_at: None,
            document_id: None,
            content: content.into(),
            metadata: None,
            is_embedded: None,
            embedding: None,
            dist: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentCollection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding_dimensions: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_auto_embedded: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_indexed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_embedded_count: Option<u64>,
}

impl DocumentCollection {
    /// `Ready` once at least one document exists and all of them are embedded.
    pub fn status(&self) -> CollectionStatus {
        match (self.document_count, self.document_embedded_count) {
            (Some(total), Some(embedded)) if total > 0 && embedded == total => {
                CollectionStatus::Ready
            }
            _ => CollectionStatus::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_new_derives_role_type() {
        let message = Message::new("human", "hello");
        assert_eq!(message.role_type, Some(RoleType::User));

        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"role": "human", "role_type": "user", "content": "hello"})
        );
    }

    #[test]
    fn test_session_deserializes_server_payload() {
        let session: Session = serde_json::from_str(
            r#"{
                "uuid": "1b3c",
                "id": 4,
                "created_at": "2024-01-01T00:00:00Z",
                "updated_at": "2024-01-02T00:00:00.123456Z",
                "session_id": "abc",
                "user_id": "u1",
                "metadata": {"topic": "travel"}
            }"#,
        )
        .unwrap();
        assert_eq!(session.session_id, "abc");
        assert_eq!(session.id, Some(4));
        assert_eq!(session.deleted_at, None);
        assert_eq!(session.metadata.unwrap()["topic"], "travel");
    }

    #[test]
    fn test_memory_without_messages_defaults_empty() {
        let memory: Memory = serde_json::from_str(r#"{"summary": null}"#).unwrap();
        assert!(memory.messages.is_empty());
        assert!(memory.summary.is_none());
    }

    #[test]
    fn test_collection_status() {
        let mut collection: DocumentCollection =
            serde_json::from_str(r#"{"name": "docs"}"#).unwrap();
        assert_eq!(collection.status(), CollectionStatus::Pending);

        collection.document_count = Some(0);
        collection.document_embedded_count = Some(0);
        assert_eq!(collection.status(), CollectionStatus::Pending);

        collection.document_count = Some(3);
        collection.document_embedded_count = Some(2);
        assert_eq!(collection.status(), CollectionStatus::Pending);

        collection.document_embedded_count = Some(3);
        assert_eq!(collection.status(), CollectionStatus::Ready);
        assert_eq!(collection.status().as_str(), "ready");
    }
}
