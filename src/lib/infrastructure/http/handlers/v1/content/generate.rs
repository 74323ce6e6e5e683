//! Generate email content handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    domain::{
        communication::dispatch::DispatchService,
        content::{EmailContentGenerator, GeneratedContent, HtmlOptimizer},
        pipeline::require_prompt,
    },
    infrastructure::http::{errors::ApiError, state::AppState},
};

/// Generate content request body
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct GenerateContentBody {
    /// A short description of the email to write
    #[schema(example = "launch announcement")]
    pub prompt: String,
}

/// Generated content response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GeneratedContentResponse {
    /// The email subject
    #[schema(example = "Big News")]
    pub subject: String,

    /// A headline for the email
    #[schema(example = "We have launched")]
    pub title: String,

    /// The plain text body
    #[schema(example = "Our new product is available today.")]
    pub body: String,
}

impl From<GeneratedContent> for GeneratedContentResponse {
    fn from(content: GeneratedContent) -> Self {
        Self {
            subject: content.subject,
            title: content.title,
            body: content.body,
        }
    }
}

/// Generate an email subject, title and body from a prompt
#[utoipa::path(
    post,
    operation_id = "generate_content",
    tag = "Content",
    path = "/api/v1/content/generate",
    request_body = GenerateContentBody,
    responses(
        (status = StatusCode::OK, description = "Content generated", body = GeneratedContentResponse),
        (status = StatusCode::UNPROCESSABLE_ENTITY, description = "Empty prompt", body = ErrorResponse),
        (status = StatusCode::BAD_GATEWAY, description = "The AI backend failed", body = ErrorResponse),
        (status = StatusCode::SERVICE_UNAVAILABLE, description = "The AI backend is not configured", body = ErrorResponse),
    )
)]
pub async fn handler<D, G, O>(
    State(state): State<AppState<D, G, O>>,
    request: Result<Json<GenerateContentBody>, JsonRejection>,
) -> Result<Json<GeneratedContentResponse>, ApiError>
where
    D: DispatchService,
    G: EmailContentGenerator,
    O: HtmlOptimizer,
{
    let Json(request) = request?;

    let prompt = require_prompt(&request.prompt)?;

    let content = state.generator.generate_email_content(prompt).await?;

    Ok(Json(content.into()))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use testresult::TestResult;

    use crate::{
        domain::content::{tests::MockEmailContentGenerator, GenerationError},
        infrastructure::http::{errors::ErrorResponse, router, state::tests::test_state},
    };

    use super::*;

    fn body(prompt: &str) -> GenerateContentBody {
        GenerateContentBody {
            prompt: prompt.to_string(),
        }
    }

    #[tokio::test]
    async fn test_generate_content() -> TestResult {
        let mut generator = MockEmailContentGenerator::new();

        generator
            .expect_generate_email_content()
            .times(1)
            .withf(|prompt| prompt == "launch announcement")
            .returning(|_| {
                Ok(GeneratedContent {
                    subject: "Big News".to_string(),
                    title: "Launch".to_string(),
                    body: "We launched.".to_string(),
                })
            });

        let state = test_state(None, Some(generator), None);

        let response = TestServer::new(router(state))?
            .post("/api/v1/content/generate")
            .json(&body("launch announcement"))
            .await;

        response.assert_status_ok();

        let json = response.json::<GeneratedContentResponse>();

        assert_eq!(json.subject, "Big News");
        assert_eq!(json.title, "Launch");
        assert_eq!(json.body, "We launched.");

        Ok(())
    }

    #[tokio::test]
    async fn test_generate_with_empty_prompt() -> TestResult {
        let mut generator = MockEmailContentGenerator::new();
        generator.expect_generate_email_content().never();

        let state = test_state(None, Some(generator), None);

        let response = TestServer::new(router(state))?
            .post("/api/v1/content/generate")
            .json(&body("   "))
            .await;

        let json = response.json::<ErrorResponse>();

        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json.error, "Please enter a prompt to generate content from.");

        Ok(())
    }

    #[tokio::test]
    async fn test_generate_backend_failure() -> TestResult {
        let mut generator = MockEmailContentGenerator::new();

        generator
            .expect_generate_email_content()
            .returning(|_| Err(GenerationError::Backend("quota exceeded".to_string())));

        let state = test_state(None, Some(generator), None);

        let response = TestServer::new(router(state))?
            .post("/api/v1/content/generate")
            .json(&body("hello"))
            .await;

        let json = response.json::<ErrorResponse>();

        assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(json.error, "Failed to generate email content: quota exceeded");

        Ok(())
    }

    #[tokio::test]
    async fn test_generate_not_configured() -> TestResult {
        let mut generator = MockEmailContentGenerator::new();

        generator.expect_generate_email_content().returning(|_| {
            Err(GenerationError::NotConfigured(
                "GEMINI_API_KEY is not set".to_string(),
            ))
        });

        let state = test_state(None, Some(generator), None);

        let response = TestServer::new(router(state))?
            .post("/api/v1/content/generate")
            .json(&body("hello"))
            .await;

        assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);

        Ok(())
    }

    #[tokio::test]
    async fn test_generate_with_malformed_body() -> TestResult {
        let state = test_state(None, None, None);

        let response = TestServer::new(router(state))?
            .post("/api/v1/content/generate")
            .json(&serde_json::json!({ "topic": "hello" }))
            .await;

        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        Ok(())
    }
}
