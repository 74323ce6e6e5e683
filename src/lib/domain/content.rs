//! Content ports: AI generation, HTML optimization and uploaded templates

mod errors;
mod generator;
mod html_document;
mod optimizer;

pub use errors::{GenerationError, OptimizationError};
pub use generator::{EmailContentGenerator, GeneratedContent};
pub use html_document::{HtmlDocument, UploadError};
pub use optimizer::{HtmlOptimizer, OptimizedHtml};

#[cfg(test)]
pub mod tests {
    //! Mock content backends

    pub use super::generator::MockEmailContentGenerator;
    pub use super::optimizer::MockHtmlOptimizer;
}
