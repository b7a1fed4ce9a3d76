/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust response structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};

use super::models::{Document, Message, Metadata, Summary};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemorySearchResult {
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub summary: Option<Summary>,
    #[serde(default)]
    pub metadata: Option<Metadata>,
    #[serde(default, alias = "dist")]
    pub score: Option<f64>,
}

/// Body of `GET /sessions/{session_id}/messages`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageListResponse {
    #[serde(default)]
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentSearchResponse {
    #[serde(default)]
    pub results: Vec<Document>,
    #[serde(default)]
    pub query_vector: Vec<f32>,
}
