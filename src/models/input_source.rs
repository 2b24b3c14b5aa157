//! Input source domain models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::input_source;

/// Kind of artifact an input source holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    /// Free-form user story text.
    #[serde(alias = "user story", alias = "user-story")]
    UserStory,
    /// Swagger/OpenAPI JSON document.
    #[serde(alias = "openapi")]
    Swagger,
    /// Any other plain text prompt.
    #[serde(alias = "user_prompt", alias = "text")]
    PlainText,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserStory => "user_story",
            Self::Swagger => "swagger",
            Self::PlainText => "plain_text",
        }
    }

    /// Human-readable label used in prompts and sample content.
    pub fn label(&self) -> &'static str {
        match self {
            Self::UserStory => "user story",
            Self::Swagger => "swagger",
            Self::PlainText => "plain text",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "user_story" | "user story" | "user-story" => Some(Self::UserStory),
            "swagger" | "openapi" => Some(Self::Swagger),
            "plain_text" | "plain text" | "user_prompt" | "text" => Some(Self::PlainText),
            _ => None,
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Request to create an input source from typed text.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateUserPromptRequest {
    pub name: String,
    #[serde(default = "default_prompt_source_type")]
    pub source_type: SourceType,
    pub content: String,
}

fn default_prompt_source_type() -> SourceType {
    SourceType::PlainText
}

/// Partial update of an input source.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateInputSourceRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub source_type: Option<SourceType>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Full input source representation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InputSourceResponse {
    pub id: Uuid,
    pub name: String,
    pub source_type: SourceType,
    pub content: String,
    /// URL the document was fetched from (Swagger by URL only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<input_source::Model> for InputSourceResponse {
    fn from(m: input_source::Model) -> Self {
        InputSourceResponse {
            id: m.id,
            source_type: SourceType::parse(&m.source_type).unwrap_or(SourceType::PlainText),
            name: m.name,
            content: m.content,
            source_url: m.source_url,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Compact reference embedded in other responses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InputSourceSummary {
    pub id: Uuid,
    pub name: String,
    pub source_type: SourceType,
}

impl From<&input_source::Model> for InputSourceSummary {
    fn from(m: &input_source::Model) -> Self {
        InputSourceSummary {
            id: m.id,
            name: m.name.clone(),
            source_type: SourceType::parse(&m.source_type).unwrap_or(SourceType::PlainText),
        }
    }
}
