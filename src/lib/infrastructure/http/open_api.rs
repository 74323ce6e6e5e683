//! OpenAPI module

use utoipa::OpenApi;

use crate::infrastructure::http::{errors::ErrorResponse, handlers::v1::*};

#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "Email Composer"),
    paths(
        content::generate::handler,
        html::optimize::handler,
        html::upload::handler,
        emails::send::handler,
        uptime::handler
    ),
    components(schemas(
        content::generate::GenerateContentBody,
        content::generate::GeneratedContentResponse,
        html::optimize::OptimizeHtmlBody,
        html::optimize::OptimizedHtmlResponse,
        html::upload::UploadHtmlForm,
        html::upload::UploadedHtmlResponse,
        emails::send::SendEmailBody,
        emails::send::SendEmailResponse,
        emails::send::RecipientResult,
        uptime::UptimeResponse,
        ErrorResponse,
    ))
)]
pub struct ApiDocs;
