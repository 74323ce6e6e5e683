//! Upload HTML handler

use axum::{
    extract::{multipart::MultipartRejection, Multipart},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::{
    domain::{content::HtmlDocument, pipeline::ValidationError},
    infrastructure::http::errors::ApiError,
};

const FILE_FIELD: &str = "file";

/// Upload form
#[derive(Debug, ToSchema)]
pub struct UploadHtmlForm {
    /// The HTML file, sent with content type `text/html`
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

/// Uploaded HTML response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadedHtmlResponse {
    /// The uploaded file name, if the client sent one
    #[schema(example = "welcome.html")]
    pub file_name: Option<String>,

    /// The file content
    #[schema(example = "<h1>Welcome</h1>")]
    pub html: String,
}

/// Upload an HTML email template
#[utoipa::path(
    post,
    operation_id = "upload_html",
    tag = "HTML",
    path = "/api/v1/html/upload",
    request_body(content = UploadHtmlForm, content_type = "multipart/form-data"),
    responses(
        (status = StatusCode::OK, description = "HTML accepted", body = UploadedHtmlResponse),
        (status = StatusCode::UNPROCESSABLE_ENTITY, description = "Missing or non-HTML file", body = ErrorResponse),
    )
)]
pub async fn handler(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadedHtmlResponse>, ApiError> {
    let mut multipart = multipart?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            debug!(name = ?field.name(), "skipping multipart field");
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await?;

        let document =
            HtmlDocument::from_upload(file_name.as_deref(), content_type.as_deref(), &bytes)?;

        let (file_name, html) = document.into_parts();

        return Ok(Json(UploadedHtmlResponse { file_name, html }));
    }

    Err(ValidationError::NoHtmlContent.into())
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::{
        multipart::{MultipartForm, Part},
        TestServer,
    };
    use testresult::TestResult;

    use crate::infrastructure::http::{errors::ErrorResponse, router, state::tests::test_state};

    use super::*;

    fn file(content: &str, file_name: &str, mime_type: &str) -> MultipartForm {
        let part = Part::bytes(content.as_bytes().to_vec())
            .file_name(file_name)
            .mime_type(mime_type);

        MultipartForm::new().add_part(FILE_FIELD, part)
    }

    #[tokio::test]
    async fn test_upload_html() -> TestResult {
        let response = TestServer::new(router(test_state(None, None, None)))?
            .post("/api/v1/html/upload")
            .multipart(file("<h1>Welcome</h1>", "welcome.html", "text/html"))
            .await;

        response.assert_status_ok();

        let json = response.json::<UploadedHtmlResponse>();

        assert_eq!(json.file_name.as_deref(), Some("welcome.html"));
        assert_eq!(json.html, "<h1>Welcome</h1>");

        Ok(())
    }

    #[tokio::test]
    async fn test_upload_plain_text_is_rejected() -> TestResult {
        let response = TestServer::new(router(test_state(None, None, None)))?
            .post("/api/v1/html/upload")
            .multipart(file("hello", "notes.txt", "text/plain"))
            .await;

        let json = response.json::<ErrorResponse>();

        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(json.error.contains("must be HTML"));

        Ok(())
    }

    #[tokio::test]
    async fn test_upload_without_file_field() -> TestResult {
        let form = MultipartForm::new().add_text("subject", "Welcome");

        let response = TestServer::new(router(test_state(None, None, None)))?
            .post("/api/v1/html/upload")
            .multipart(form)
            .await;

        let json = response.json::<ErrorResponse>();

        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json.error, "Please upload an HTML file first.");

        Ok(())
    }

    #[tokio::test]
    async fn test_upload_without_multipart_body() -> TestResult {
        let response = TestServer::new(router(test_state(None, None, None)))?
            .post("/api/v1/html/upload")
            .text("<h1>Welcome</h1>")
            .await;

        let json = response.json::<ErrorResponse>();

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert!(json.error.contains("boundary"));

        Ok(())
    }
}
