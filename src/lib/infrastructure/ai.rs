//! Content backends: the Gemini API and a local CSS inliner

use async_trait::async_trait;
use clap::ValueEnum;

use crate::domain::content::{HtmlOptimizer, OptimizationError, OptimizedHtml};

pub mod gemini;
pub mod inline;

use gemini::GeminiClient;
use inline::CssInlineOptimizer;

/// Which backend rewrites uploaded HTML
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OptimizerKind {
    /// Ask the AI model
    #[default]
    Ai,

    /// Inline `<style>` blocks locally, no network involved
    Inline,
}

/// The HTML optimizer selected at start-up
#[derive(Clone, Debug)]
pub enum ConfiguredOptimizer {
    /// Gemini backed optimizer
    Gemini(GeminiClient),

    /// Local CSS inliner
    Inline(CssInlineOptimizer),
}

impl ConfiguredOptimizer {
    /// Pick the optimizer for `kind`, reusing the Gemini client when the AI backend is chosen
    pub fn select(kind: OptimizerKind, gemini: &GeminiClient) -> Self {
        match kind {
            OptimizerKind::Ai => Self::Gemini(gemini.clone()),
            OptimizerKind::Inline => Self::Inline(CssInlineOptimizer::new()),
        }
    }
}

#[async_trait]
impl HtmlOptimizer for ConfiguredOptimizer {
    async fn optimize_html(&self, html: &str) -> Result<OptimizedHtml, OptimizationError> {
        match self {
            Self::Gemini(client) => client.optimize_html(html).await,
            Self::Inline(inliner) => inliner.optimize_html(html).await,
        }
    }
}
