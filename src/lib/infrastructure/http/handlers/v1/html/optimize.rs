//! Optimize HTML handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    domain::{
        communication::dispatch::DispatchService,
        content::{EmailContentGenerator, HtmlOptimizer, OptimizedHtml},
        pipeline::require_html,
    },
    infrastructure::http::{errors::ApiError, state::AppState},
};

/// Optimize HTML request body
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct OptimizeHtmlBody {
    /// The HTML to optimize, possibly the output of a previous optimization
    #[schema(example = "<style>h1 { color: blue; }</style><h1>Welcome</h1>")]
    pub html: String,
}

/// Optimized HTML response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OptimizedHtmlResponse {
    /// The optimized HTML
    #[schema(example = "<h1 style=\"color: blue;\">Welcome</h1>")]
    pub optimized_html: String,

    /// What was changed
    #[schema(example = "Inlined 1 <style> block into style attributes.")]
    pub optimization_summary: String,
}

impl From<OptimizedHtml> for OptimizedHtmlResponse {
    fn from(optimized: OptimizedHtml) -> Self {
        Self {
            optimized_html: optimized.optimized_html,
            optimization_summary: optimized.optimization_summary,
        }
    }
}

/// Optimize an HTML email template for email clients
#[utoipa::path(
    post,
    operation_id = "optimize_html",
    tag = "HTML",
    path = "/api/v1/html/optimize",
    request_body = OptimizeHtmlBody,
    responses(
        (status = StatusCode::OK, description = "HTML optimized", body = OptimizedHtmlResponse),
        (status = StatusCode::UNPROCESSABLE_ENTITY, description = "No HTML given", body = ErrorResponse),
        (status = StatusCode::BAD_GATEWAY, description = "The optimizer failed", body = ErrorResponse),
        (status = StatusCode::SERVICE_UNAVAILABLE, description = "The optimizer is not configured", body = ErrorResponse),
    )
)]
pub async fn handler<D, G, O>(
    State(state): State<AppState<D, G, O>>,
    request: Result<Json<OptimizeHtmlBody>, JsonRejection>,
) -> Result<Json<OptimizedHtmlResponse>, ApiError>
where
    D: DispatchService,
    G: EmailContentGenerator,
    O: HtmlOptimizer,
{
    let Json(request) = request?;

    let html = require_html(Some(request.html.as_str()))?;

    let optimized = state.optimizer.optimize_html(html).await?;

    Ok(Json(optimized.into()))
}
