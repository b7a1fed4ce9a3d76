/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust enums with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleType {
    User,
    Assistant,
    System,
    Function,
    Tool,
}

impl RoleType {
    /// Map a conversational role name ("human", "ai", ...) to a role type.
    /// Unknown roles map to `System`.
    pub fn from_role(role: &str) -> Self {
        match role {
            "human" | "user" => RoleType::User,
            "ai" | "assistant" => RoleType::Assistant,
            "function" => RoleType::Function,
            "tool" => RoleType::Tool,
            _ => RoleType::System,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    #[default]
    Similarity,
    Mmr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchScope {
    #[default]
    Messages,
    Summary,
}

/// Embedding progress of a document collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionStatus {
    /// Every document is embedded and the collection can be searched
    Ready,
    Pending,
}

impl CollectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionStatus::Ready => "ready",
            CollectionStatus::Pending => "pending",
        }
    }
}
