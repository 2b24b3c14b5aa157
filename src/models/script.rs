//! Automation script domain models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::ContentOrigin;
use crate::entity::script;

/// Automation script flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ScriptType {
    PlaywrightPython,
    PlaywrightSelenium,
}

impl ScriptType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PlaywrightPython => "playwright_python",
            Self::PlaywrightSelenium => "playwright_selenium",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "playwright_python" => Some(Self::PlaywrightPython),
            "playwright_selenium" => Some(Self::PlaywrightSelenium),
            _ => None,
        }
    }

    /// Resolve a requested flavor; anything unrecognized becomes Playwright/Python.
    pub fn parse_or_default(s: &str) -> Self {
        Self::parse(s.trim()).unwrap_or(Self::PlaywrightPython)
    }

    /// Framework name used in prompts.
    pub fn framework_name(&self) -> &'static str {
        match self {
            Self::PlaywrightPython => "Playwright with Python",
            Self::PlaywrightSelenium => "Playwright with Selenium",
        }
    }

    pub fn file_extension(&self) -> &'static str {
        "py"
    }
}

impl std::fmt::Display for ScriptType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Query parameters for script generation.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct GenerateScriptQuery {
    #[serde(default)]
    pub script_type: Option<String>,
}

/// Response after generating a script.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GenerateScriptResponse {
    pub message: String,
    pub script_id: Uuid,
    pub script_type: ScriptType,
    pub origin: ContentOrigin,
    pub content: String,
}

/// Script list entry.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScriptSummary {
    pub id: Uuid,
    pub input_source_id: Uuid,
    pub name: String,
    pub script_type: ScriptType,
    pub created_at: DateTime<Utc>,
    pub download_url: String,
}

impl From<script::Model> for ScriptSummary {
    fn from(m: script::Model) -> Self {
        ScriptSummary {
            download_url: format!("/api/script-output/download/{}", m.id),
            id: m.id,
            input_source_id: m.input_source_id,
            script_type: ScriptType::parse_or_default(&m.script_type),
            name: m.name,
            created_at: m.created_at,
        }
    }
}

/// Outcome of a simulated script run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ScriptExecutionStatus {
    Completed,
    Failed,
}

/// Result of a simulated script run.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScriptExecutionResult {
    pub status: ScriptExecutionStatus,
    /// Reported run time in seconds.
    pub execution_time: f64,
    pub output: String,
    pub error: Option<String>,
}

/// Response after executing a script.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExecuteScriptResponse {
    pub script_id: Uuid,
    pub execution_result: ScriptExecutionResult,
}
