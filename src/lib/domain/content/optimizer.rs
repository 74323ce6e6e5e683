//! HTML optimizer port

use async_trait::async_trait;

#[cfg(test)]
use mockall::mock;

use super::OptimizationError;

/// Rewritten HTML and a description of what changed
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptimizedHtml {
    /// The HTML to use from now on
    pub optimized_html: String,

    /// Display-only summary of the changes
    pub optimization_summary: String,
}

/// Rewrites HTML email templates so they render consistently across email clients
#[async_trait]
pub trait HtmlOptimizer: Clone + Send + Sync + 'static {
    /// Optimizes an HTML document. The input may itself be a previous output.
    async fn optimize_html(&self, html: &str) -> Result<OptimizedHtml, OptimizationError>;
}

#[cfg(test)]
mock! {
    /// An optimizer with scripted results
    pub HtmlOptimizer {}

    impl Clone for HtmlOptimizer {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl HtmlOptimizer for HtmlOptimizer {
        async fn optimize_html(&self, html: &str) -> Result<OptimizedHtml, OptimizationError>;
    }
}
