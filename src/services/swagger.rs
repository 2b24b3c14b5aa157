//! Swagger/OpenAPI document handling.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};
use utoipa::ToSchema;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);
const HTTP_METHODS: [&str; 5] = ["GET", "POST", "PUT", "DELETE", "PATCH"];

/// Swagger document errors.
#[derive(Debug, thiserror::Error)]
pub enum SwaggerError {
    #[error("Failed to fetch Swagger from URL: {0}")]
    Fetch(String),

    #[error("Invalid JSON in Swagger document: {0}")]
    InvalidJson(String),

    #[error("Invalid Swagger/OpenAPI specification")]
    NotASpecification,

    #[error("Swagger document exceeds the {0} byte limit")]
    TooLarge(usize),
}

/// A validated Swagger/OpenAPI document.
#[derive(Debug, Clone)]
pub struct SwaggerDocument {
    /// Text as received; stored as the input source content.
    pub raw: String,
    pub value: Value,
}

impl SwaggerDocument {
    /// Parse and validate a document.
    pub fn parse(raw: impl Into<String>) -> Result<Self, SwaggerError> {
        let raw = raw.into();
        let value: Value =
            serde_json::from_str(&raw).map_err(|e| SwaggerError::InvalidJson(e.to_string()))?;

        if !is_specification(&value) {
            return Err(SwaggerError::NotASpecification);
        }

        Ok(Self { raw, value })
    }

    pub fn endpoints(&self) -> Vec<Endpoint> {
        extract_endpoints(&self.value)
    }
}

/// One operation listed under `paths`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Endpoint {
    pub path: String,
    pub method: String,
    pub summary: String,
    pub description: String,
}

/// Accepts documents with `openapi`, `swagger`, or both `info` and `paths`.
pub fn is_specification(value: &Value) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };

    obj.contains_key("openapi")
        || obj.contains_key("swagger")
        || (obj.contains_key("info") && obj.contains_key("paths"))
}

/// List operations for the standard HTTP methods; other keys are ignored.
pub fn extract_endpoints(value: &Value) -> Vec<Endpoint> {
    let Some(paths) = value.get("paths").and_then(Value::as_object) else {
        return Vec::new();
    };

    let mut endpoints = Vec::new();
    for (path, operations) in paths {
        let Some(operations) = operations.as_object() else {
            continue;
        };
        for (method, details) in operations {
            let method = method.to_uppercase();
            if !HTTP_METHODS.contains(&method.as_str()) {
                continue;
            }
            let text = |key: &str| {
                details
                    .get(key)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string()
            };
            endpoints.push(Endpoint {
                path: path.clone(),
                summary: text("summary"),
                description: text("description"),
                method,
            });
        }
    }

    endpoints
}

/// Downloads Swagger documents by URL.
#[derive(Clone)]
pub struct SwaggerFetcher {
    http: Client,
}

impl SwaggerFetcher {
    pub fn new() -> Result<Self, reqwest::Error> {
        Ok(Self {
            http: Client::builder().timeout(FETCH_TIMEOUT).build()?,
        })
    }

    /// Fetch, parse and validate the document at `url`.
    ///
    /// Bodies larger than `limit` bytes are rejected without being buffered in full.
    pub async fn fetch(&self, url: &str, limit: usize) -> Result<SwaggerDocument, SwaggerError> {
        let url = Url::parse(url.trim()).map_err(|e| SwaggerError::Fetch(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SwaggerError::Fetch(format!(
                "unsupported URL scheme '{}'",
                url.scheme()
            )));
        }

        let mut response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| SwaggerError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "Swagger fetch returned an error");
            return Err(SwaggerError::Fetch(format!("server returned {}", status)));
        }

        if response
            .content_length()
            .is_some_and(|len| len > limit as u64)
        {
            return Err(SwaggerError::TooLarge(limit));
        }

        let mut data = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| SwaggerError::Fetch(e.to_string()))?
        {
            if data.len() + chunk.len() > limit {
                return Err(SwaggerError::TooLarge(limit));
            }
            data.extend_from_slice(&chunk);
        }

        let body = String::from_utf8(data)
            .map_err(|_| SwaggerError::InvalidJson("document is not valid UTF-8".to_string()))?;
        let document = SwaggerDocument::parse(body)?;
        info!(
            url = %url,
            endpoints = document.endpoints().len(),
            "Fetched Swagger document"
        );
        Ok(document)
    }
}
