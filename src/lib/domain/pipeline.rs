//! Content pipelines that gate sending on the user's confirmation.
//!
//! Both pipelines split every long-running action into a `begin_*` half that validates
//! and marks the action as in flight, and a `finish_*` half that applies the result.
//! A client can therefore await the collaborator without holding the pipeline, while
//! conflicting actions (a send and a content change) can never overlap.

mod compose;
mod errors;
mod in_flight;
mod upload;
mod validation;

pub use compose::{ComposePhase, ComposePipeline};
pub use errors::{Action, PipelineError, ValidationError};
pub use upload::{UploadPhase, UploadPipeline};
pub use validation::{require_html, require_prompt};
