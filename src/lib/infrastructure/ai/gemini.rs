//! Gemini `generateContent` client

use std::fmt;

use anyhow::Context;
use async_trait::async_trait;
use clap::Parser;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::content::{
    EmailContentGenerator, GeneratedContent, GenerationError, HtmlOptimizer, OptimizationError,
    OptimizedHtml,
};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini configuration
#[derive(Clone, Debug, Parser)]
pub struct GeminiConfig {
    /// The Gemini API key
    #[arg(
        id = "gemini_api_key",
        long = "gemini-api-key",
        env = "GEMINI_API_KEY",
        hide_env_values = true
    )]
    pub api_key: Option<String>,

    /// The model used for generation and optimization
    #[arg(
        id = "gemini_model",
        long = "gemini-model",
        env = "GEMINI_MODEL",
        default_value = "gemini-2.0-flash"
    )]
    pub model: String,

    /// The API base URL
    #[arg(
        id = "gemini_base_url",
        long = "gemini-base-url",
        env = "GEMINI_BASE_URL",
        default_value = "https://generativelanguage.googleapis.com/v1beta"
    )]
    pub base_url: String,
}

#[derive(Debug, Error)]
enum GeminiError {
    #[error("GEMINI_API_KEY is not set")]
    NotConfigured,

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Gemini returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("{0}")]
    MalformedResponse(String),
}

impl From<GeminiError> for GenerationError {
    fn from(err: GeminiError) -> Self {
        debug!("GeminiError -> GenerationError");

        match err {
            GeminiError::NotConfigured => GenerationError::NotConfigured(err.to_string()),
            GeminiError::MalformedResponse(reason) => GenerationError::MalformedResponse(reason),
            err => GenerationError::Backend(err.to_string()),
        }
    }
}

impl From<GeminiError> for OptimizationError {
    fn from(err: GeminiError) -> Self {
        debug!("GeminiError -> OptimizationError");

        match err {
            GeminiError::NotConfigured => OptimizationError::NotConfigured(err.to_string()),
            GeminiError::MalformedResponse(reason) => OptimizationError::MalformedResponse(reason),
            err => OptimizationError::Backend(err.to_string()),
        }
    }
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

#[derive(Deserialize)]
struct EmailContentOutput {
    subject: String,
    #[serde(default)]
    title: String,
    body: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OptimizeHtmlOutput {
    optimized_html: String,
    optimization_summary: String,
}

fn email_content_prompt(prompt: &str) -> String {
    format!(
        "You are an email copywriter. Write the subject, a short title and the plain text \
         body of an email based on the following idea.\n\nIdea: {prompt}"
    )
}

fn email_content_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "subject": { "type": "STRING", "description": "The subject of the email." },
            "title": { "type": "STRING", "description": "The title of the email." },
            "body": { "type": "STRING", "description": "The plain text body of the email." }
        },
        "required": ["subject", "title", "body"]
    })
}

fn optimize_html_prompt(html: &str) -> String {
    format!(
        "You optimize HTML email templates so they render consistently across email clients.\n\
         Inline CSS styles, remove or replace elements known to break in email clients, keep \
         the layout responsive and minify the markup without changing what it displays.\n\
         Return the optimized HTML and a short summary of the changes you made.\n\n\
         HTML:\n{html}"
    )
}

fn optimize_html_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "optimizedHtml": {
                "type": "STRING",
                "description": "The optimized HTML document."
            },
            "optimizationSummary": {
                "type": "STRING",
                "description": "A summary of the optimizations performed."
            }
        },
        "required": ["optimizedHtml", "optimizationSummary"]
    })
}

/// Gemini API client.
///
/// A missing API key is not an error at construction: every call then fails with a
/// not-configured error instead.
#[derive(Clone)]
pub struct GeminiClient {
    http_client: reqwest::Client,
    api_key: Option<String>,
    endpoint: String,
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("endpoint", &self.endpoint)
            .field("configured", &self.api_key.is_some())
            .finish()
    }
}

impl GeminiClient {
    /// Create a new Gemini client
    pub fn new(config: GeminiConfig) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build the Gemini HTTP client")?;

        let api_key = config
            .api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        if api_key.is_none() {
            warn!("GEMINI_API_KEY is not set. Content generation and AI optimization will be disabled.");
        }

        let endpoint = format!(
            "{}/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            config.model
        );

        Ok(Self {
            http_client,
            api_key,
            endpoint,
        })
    }

    /// Whether an API key is available
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn generate_json<T>(&self, prompt: String, schema: Value) -> Result<T, GeminiError>
    where
        T: DeserializeOwned,
    {
        let api_key = self.api_key.as_deref().ok_or(GeminiError::NotConfigured)?;

        let request = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": schema
            }
        });

        let response = self
            .http_client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);

            return Err(GeminiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let response = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| GeminiError::MalformedResponse(e.to_string()))?;

        let text = response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<String>()
            })
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| GeminiError::MalformedResponse("the response had no content".to_string()))?;

        serde_json::from_str(&text).map_err(|e| GeminiError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl EmailContentGenerator for GeminiClient {
    async fn generate_email_content(
        &self,
        prompt: &str,
    ) -> Result<GeneratedContent, GenerationError> {
        let output: EmailContentOutput = self
            .generate_json(email_content_prompt(prompt), email_content_schema())
            .await?;

        if output.subject.trim().is_empty() || output.body.trim().is_empty() {
            return Err(GenerationError::MalformedResponse(
                "the subject or body was empty".to_string(),
            ));
        }

        Ok(GeneratedContent {
            subject: output.subject,
            title: output.title,
            body: output.body,
        })
    }
}

#[async_trait]
impl HtmlOptimizer for GeminiClient {
    async fn optimize_html(&self, html: &str) -> Result<OptimizedHtml, OptimizationError> {
        let output: OptimizeHtmlOutput = self
            .generate_json(optimize_html_prompt(html), optimize_html_schema())
            .await?;

        if output.optimized_html.trim().is_empty() {
            return Err(OptimizationError::MalformedResponse(
                "the optimized HTML was empty".to_string(),
            ));
        }

        Ok(OptimizedHtml {
            optimized_html: output.optimized_html,
            optimization_summary: output.optimization_summary,
        })
    }
}
