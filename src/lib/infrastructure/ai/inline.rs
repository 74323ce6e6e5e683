//! Local HTML optimizer that inlines `<style>` blocks

use async_trait::async_trait;
use css_inline::CSSInliner;
use tracing::debug;

use crate::domain::content::{HtmlOptimizer, OptimizationError, OptimizedHtml};

/// Inlines CSS with css-inline. Remote stylesheets are never fetched.
#[derive(Clone, Copy, Debug, Default)]
pub struct CssInlineOptimizer;

impl CssInlineOptimizer {
    /// Create a new inliner
    pub fn new() -> Self {
        Self
    }
}

fn count_style_blocks(html: &str) -> usize {
    html.to_ascii_lowercase().matches("<style").count()
}

fn summarize(before: &str, after: &str) -> String {
    let inlined = count_style_blocks(before).saturating_sub(count_style_blocks(after));

    let styles = match inlined {
        0 => "No <style> blocks needed inlining".to_string(),
        1 => "Inlined 1 <style> block into style attributes".to_string(),
        n => format!("Inlined {n} <style> blocks into style attributes"),
    };

    format!(
        "{styles}. Size changed from {} to {} bytes.",
        before.len(),
        after.len()
    )
}

#[async_trait]
impl HtmlOptimizer for CssInlineOptimizer {
    async fn optimize_html(&self, html: &str) -> Result<OptimizedHtml, OptimizationError> {
        let source = html.to_string();

        let inlined = tokio::task::spawn_blocking(move || {
            CSSInliner::options()
                .load_remote_stylesheets(false)
                .build()
                .inline(&source)
        })
        .await
        .map_err(|e| OptimizationError::Backend(e.to_string()))?
        .map_err(|e| OptimizationError::Backend(e.to_string()))?;

        let optimization_summary = summarize(html, &inlined);

        debug!("{optimization_summary}");

        Ok(OptimizedHtml {
            optimized_html: inlined,
            optimization_summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    const TEMPLATE: &str = "<html><head><style>h1 { color: blue; }</style></head>\
        <body><h1>Welcome</h1><p>Thanks for signing up.</p></body></html>";

    #[tokio::test]
    async fn test_inlines_style_blocks() -> TestResult {
        let optimized = CssInlineOptimizer::new().optimize_html(TEMPLATE).await?;

        assert!(optimized.optimized_html.contains("<h1 style=\"color: blue"));
        assert!(!optimized.optimized_html.contains("<style"));
        assert!(optimized
            .optimization_summary
            .starts_with("Inlined 1 <style> block"));

        Ok(())
    }

    #[tokio::test]
    async fn test_optimizing_twice_succeeds() -> TestResult {
        let optimizer = CssInlineOptimizer::new();

        let first = optimizer.optimize_html(TEMPLATE).await?;
        let second = optimizer.optimize_html(&first.optimized_html).await?;

        assert!(second.optimized_html.contains("color: blue"));
        assert!(second
            .optimization_summary
            .starts_with("No <style> blocks needed inlining"));

        Ok(())
    }

    #[test]
    fn test_summary_reports_sizes() {
        let summary = summarize("<style>a{}</style><a>x</a>", "<a>x</a>");

        assert_eq!(
            summary,
            "Inlined 1 <style> block into style attributes. Size changed from 26 to 8 bytes."
        );
    }
}
