//! Version 1 of the API

use axum::{
    routing::{get, post},
    Json, Router,
};
use utoipa::OpenApi;

use crate::{
    domain::{
        communication::dispatch::DispatchService,
        content::{EmailContentGenerator, HtmlOptimizer},
    },
    infrastructure::http::{open_api::ApiDocs, state::AppState},
};

pub mod content;
pub mod emails;
pub mod html;
pub mod stoplight;
pub mod uptime;

/// Routes mounted under `/api/v1`
pub fn router<D, G, O>() -> Router<AppState<D, G, O>>
where
    D: DispatchService,
    G: EmailContentGenerator,
    O: HtmlOptimizer,
{
    Router::new()
        .route("/", get(stoplight::handler))
        .route("/openapi.json", get(Json(ApiDocs::openapi())))
        .route("/uptime", get(uptime::handler::<D, G, O>))
        .route(
            "/content/generate",
            post(content::generate::handler::<D, G, O>),
        )
        .route("/html/optimize", post(html::optimize::handler::<D, G, O>))
        .route("/html/upload", post(html::upload::handler))
        .route("/emails", post(emails::send::handler::<D, G, O>))
}
