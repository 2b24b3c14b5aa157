//! Test case and script generation pipeline.
//!
//! [`TestGenerator`] decides once, from whether a usable API key was
//! configured, if it serves live model output or built-in samples. Live calls
//! go through a [`CompletionClient`]; their answers are interpreted by
//! [`interpreter`].

pub mod client;
pub mod interpreter;
pub mod prompt;
pub mod samples;

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use secrecy::SecretString;
use tracing::{info, warn};

use crate::config::AiSettings;
use crate::error::{AppError, AppResult};
use crate::models::{ContentOrigin, GeneratedTestCase, ScriptType, SourceType};

pub use client::{CompletionClient, CompletionError, OpenRouterClient};
pub use interpreter::Interpretation;

/// Why a live generation request failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Unauthenticated,
    UpstreamUnavailable,
    UpstreamProtocolError,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "completion provider rejected credentials"),
            Self::UpstreamUnavailable => write!(f, "completion provider unavailable"),
            Self::UpstreamProtocolError => write!(f, "completion provider sent an invalid response"),
        }
    }
}

impl From<&CompletionError> for FailureKind {
    fn from(err: &CompletionError) -> Self {
        match err {
            CompletionError::Unauthenticated => Self::Unauthenticated,
            CompletionError::UpstreamUnavailable(_) => Self::UpstreamUnavailable,
            CompletionError::UpstreamProtocolError(_) => Self::UpstreamProtocolError,
        }
    }
}

/// Result of one generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome<T> {
    /// No API key configured; built-in sample content.
    DegradedMode(T),
    /// The model answered.
    Completed(T),
    /// The completion call failed.
    Failed(FailureKind, String),
}

impl GenerationOutcome<Interpretation> {
    /// Records and their origin, or an upstream error.
    pub fn into_records(self) -> AppResult<(ContentOrigin, Vec<GeneratedTestCase>)> {
        match self {
            Self::DegradedMode(i) => Ok((ContentOrigin::Sample, i.into_records())),
            Self::Completed(Interpretation::Parsed(records)) => {
                Ok((ContentOrigin::Generated, records))
            }
            Self::Completed(Interpretation::Placeholder(records)) => {
                Ok((ContentOrigin::Placeholder, records))
            }
            Self::Failed(kind, detail) => Err(AppError::generation(kind, &detail)),
        }
    }
}

impl GenerationOutcome<String> {
    /// Script text and its origin, or an upstream error.
    pub fn into_script(self) -> AppResult<(ContentOrigin, String)> {
        match self {
            Self::DegradedMode(text) => Ok((ContentOrigin::Sample, text)),
            Self::Completed(text) => Ok((ContentOrigin::Generated, text)),
            Self::Failed(kind, detail) => Err(AppError::generation(kind, &detail)),
        }
    }
}

/// Generates test cases and scripts through a completion client.
pub struct TestGenerator {
    client: Arc<dyn CompletionClient>,
    credential: Option<SecretString>,
}

impl TestGenerator {
    /// Build a generator around `client`.
    ///
    /// `credential` must already be filtered for usability; `None` puts the
    /// generator in degraded mode for its whole lifetime.
    pub fn new(client: Arc<dyn CompletionClient>, credential: Option<SecretString>) -> Self {
        Self { client, credential }
    }

    /// Build a generator backed by [`OpenRouterClient`].
    pub fn from_settings(settings: &AiSettings) -> AppResult<Self> {
        let client = OpenRouterClient::new(settings)
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        let generator = Self::new(Arc::new(client), settings.credential().cloned());
        if generator.is_degraded() {
            warn!("No usable OPENROUTER_API_KEY configured; serving sample test cases and scripts");
        } else {
            info!(model = %settings.model, "Completion provider configured");
        }

        Ok(generator)
    }

    /// True when no API key is configured.
    pub fn is_degraded(&self) -> bool {
        self.credential.is_none()
    }

    fn mode(&self) -> &'static str {
        if self.is_degraded() { "degraded" } else { "live" }
    }

    /// Generate test cases for `content` of the given source type.
    pub async fn generate_test_cases(
        &self,
        content: &str,
        source_type: SourceType,
    ) -> GenerationOutcome<Interpretation> {
        let label = source_type.label();

        if self.is_degraded() {
            let records = samples::sample_test_cases(label);
            info!(
                source_type = %source_type,
                mode = self.mode(),
                records = records.len(),
                "Served sample test cases"
            );
            return GenerationOutcome::DegradedMode(Interpretation::Parsed(records));
        }

        let started = Instant::now();
        let prompt = prompt::test_case_prompt(content, label);

        match self.client.complete(&prompt, self.credential.as_ref()).await {
            Ok(text) => {
                let interpretation = interpreter::interpret_test_cases(&text);
                info!(
                    source_type = %source_type,
                    mode = self.mode(),
                    records = interpretation.records().len(),
                    fallback = interpretation.is_placeholder(),
                    duration_ms = started.elapsed().as_millis() as u64,
                    "Generated test cases"
                );
                GenerationOutcome::Completed(interpretation)
            }
            Err(e) => {
                warn!(
                    source_type = %source_type,
                    duration_ms = started.elapsed().as_millis() as u64,
                    "Test case generation failed: {}",
                    e
                );
                GenerationOutcome::Failed(FailureKind::from(&e), e.to_string())
            }
        }
    }

    /// Generate an automation script covering `test_cases`.
    pub async fn generate_script(
        &self,
        test_cases: &[GeneratedTestCase],
        script_type: ScriptType,
    ) -> GenerationOutcome<String> {
        if self.is_degraded() {
            info!(script_type = %script_type, mode = self.mode(), "Served sample script");
            return GenerationOutcome::DegradedMode(samples::sample_script(script_type).to_string());
        }

        let started = Instant::now();
        let prompt = prompt::script_prompt(test_cases, script_type);

        match self.client.complete(&prompt, self.credential.as_ref()).await {
            Ok(text) => {
                info!(
                    script_type = %script_type,
                    mode = self.mode(),
                    test_cases = test_cases.len(),
                    duration_ms = started.elapsed().as_millis() as u64,
                    "Generated script"
                );
                GenerationOutcome::Completed(interpreter::interpret_script(text))
            }
            Err(e) => {
                warn!(
                    script_type = %script_type,
                    duration_ms = started.elapsed().as_millis() as u64,
                    "Script generation failed: {}",
                    e
                );
                GenerationOutcome::Failed(FailureKind::from(&e), e.to_string())
            }
        }
    }
}
